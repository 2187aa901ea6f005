use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assessment::models::{Difficulty, Question, ReviewEntry, Scorecard, Topic};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Setup,
    InProgress,
    Completed,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Operation requires phase {expected:?}, session is in {actual:?}")]
    InvalidTransition { expected: Phase, actual: Phase },

    #[error("No option was selected")]
    EmptyChoice,

    #[error("Cannot start an assessment without questions")]
    NoQuestions,

    #[error("Evaluation has already been recorded for this session")]
    EvaluationAlreadySet,
}

/// Progress of one user through one assessment. Linear lifecycle
/// `Setup -> InProgress -> Completed`, with `reset` as the only way back.
///
/// Invariants held between every operation:
/// - `answers.len() == current_index`
/// - `current_index <= questions.len()`
/// - `phase == Completed` exactly when every question is answered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentSession {
    phase: Phase,
    topic: Option<Topic>,
    difficulty: Option<Difficulty>,
    questions: Vec<Question>,
    current_index: usize,
    answers: Vec<String>,
    evaluation: Option<String>,
    created_at: DateTime<Utc>,
    touched_at: DateTime<Utc>,
}

impl AssessmentSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            phase: Phase::Setup,
            topic: None,
            difficulty: None,
            questions: Vec::new(),
            current_index: 0,
            answers: Vec::new(),
            evaluation: None,
            created_at: now,
            touched_at: now,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn topic(&self) -> Option<Topic> {
        self.topic
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn evaluation(&self) -> Option<&str> {
        self.evaluation.as_deref()
    }

    pub fn touched_at(&self) -> DateTime<Utc> {
        self.touched_at
    }

    fn require_phase(&self, expected: Phase) -> Result<(), SessionError> {
        if self.phase != expected {
            return Err(SessionError::InvalidTransition {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.touched_at = Utc::now();
    }

    /// Moves the session into `InProgress` with a fixed question set. The
    /// topic and difficulty are pinned here; changing them later means
    /// resetting and starting over.
    pub fn start(
        &mut self,
        topic: Topic,
        difficulty: Difficulty,
        questions: Vec<Question>,
    ) -> Result<(), SessionError> {
        self.require_phase(Phase::Setup)?;
        if questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }

        self.topic = Some(topic);
        self.difficulty = Some(difficulty);
        self.questions = questions;
        self.current_index = 0;
        self.answers = Vec::new();
        self.phase = Phase::InProgress;
        self.touch();
        Ok(())
    }

    /// Records one answer and advances. Completes the session when the last
    /// question is answered. An empty selection is rejected before any state
    /// is touched.
    pub fn submit_answer(&mut self, choice: &str) -> Result<(), SessionError> {
        self.require_phase(Phase::InProgress)?;
        if choice.trim().is_empty() {
            return Err(SessionError::EmptyChoice);
        }

        self.answers.push(choice.to_string());
        self.current_index += 1;
        if self.current_index == self.questions.len() {
            self.phase = Phase::Completed;
        }
        self.touch();
        Ok(())
    }

    pub fn current_question(&self) -> Result<&Question, SessionError> {
        self.require_phase(Phase::InProgress)?;
        Ok(&self.questions[self.current_index])
    }

    pub fn score(&self) -> Result<Scorecard, SessionError> {
        self.require_phase(Phase::Completed)?;
        let correct = self
            .questions
            .iter()
            .zip(&self.answers)
            .filter(|(question, answer)| question.answer() == answer.as_str())
            .count();

        Ok(Scorecard::new(correct, self.questions.len()))
    }

    pub fn review(&self) -> Result<Vec<ReviewEntry>, SessionError> {
        self.require_phase(Phase::Completed)?;
        let entries = self
            .questions
            .iter()
            .zip(&self.answers)
            .map(|(question, answer)| ReviewEntry {
                question: question.text().to_string(),
                user_answer: answer.clone(),
                correct_answer: question.answer().to_string(),
                correct: question.answer() == answer.as_str(),
            })
            .collect();

        Ok(entries)
    }

    /// Caches the narrative evaluation. Recorded exactly once per completed
    /// session, a second call fails instead of overwriting.
    pub fn set_evaluation(&mut self, text: String) -> Result<(), SessionError> {
        self.require_phase(Phase::Completed)?;
        if self.evaluation.is_some() {
            return Err(SessionError::EvaluationAlreadySet);
        }

        self.evaluation = Some(text);
        self.touch();
        Ok(())
    }

    /// Valid from any phase. Afterwards the session is indistinguishable from
    /// a freshly constructed one, apart from its creation timestamp.
    pub fn reset(&mut self) {
        self.phase = Phase::Setup;
        self.topic = None;
        self.difficulty = None;
        self.questions = Vec::new();
        self.current_index = 0;
        self.answers = Vec::new();
        self.evaluation = None;
        self.touch();
    }
}

impl Default for AssessmentSession {
    fn default() -> Self {
        Self::new()
    }
}
