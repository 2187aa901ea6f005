use chrono::{Duration, Utc};
use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

use crate::assessment::session::AssessmentSession;

/// In-memory home of every live assessment. Sessions are process-local and
/// never persisted, a background sweep drops the ones nobody touched within
/// the configured TTL.
pub struct SessionRegistry {
    sessions: DashMap<Uuid, AssessmentSession>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.insert(id, AssessmentSession::new());
        id
    }

    /// Runs `f` against the session behind `id` while holding its shard lock.
    /// Returns `None` for unknown ids.
    pub fn with_session<T>(
        &self,
        id: &Uuid,
        f: impl FnOnce(&mut AssessmentSession) -> T,
    ) -> Option<T> {
        self.sessions.get_mut(id).map(|mut entry| f(entry.value_mut()))
    }

    pub fn remove(&self, id: &Uuid) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drops every session idle for longer than `ttl`. Returns the number of
    /// sessions removed. The count is taken inside `retain` itself, so
    /// sessions created concurrently with a sweep cannot skew it.
    pub fn sweep(&self, ttl: Duration) -> usize {
        let cutoff = Utc::now() - ttl;
        let mut removed = 0;
        self.sessions.retain(|_, session| {
            let keep = session.touched_at() > cutoff;
            if !keep {
                removed += 1;
            }
            keep
        });

        if removed > 0 {
            info!("Swept {} idle assessment session(s)", removed);
        }
        removed
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
