use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    assessment::{
        models::{Difficulty, QuestionView, ReviewEntry, Scorecard, Topic},
        session::{AssessmentSession, Phase, SessionError},
    },
    config::config::CONFIG,
    server::{app_state::AppState, error::ServerError},
};

pub fn assessment_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(create_session))
        .route("/{id}", get(get_session).delete(discard_session))
        .route("/{id}/start", post(start_assessment))
        .route("/{id}/answer", post(submit_answer))
        .route("/{id}/results", get(get_results))
        .route("/{id}/reset", post(reset_session))
        .with_state(state)
}

/* Request and response shapes */

#[derive(Debug, Serialize, Deserialize)]
pub struct StartRequest {
    pub topic: Topic,
    pub difficulty: Difficulty,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub choice: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub phase: Phase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<Topic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scorecard: Option<Scorecard>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scorecard: Option<Scorecard>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResultsResponse {
    pub session_id: Uuid,
    pub topic: Option<Topic>,
    pub difficulty: Option<Difficulty>,
    pub scorecard: Scorecard,
    pub evaluation: String,
    pub review: Vec<ReviewEntry>,
}

fn session_view(id: Uuid, session: &AssessmentSession) -> Result<SessionView, SessionError> {
    let question = match session.phase() {
        Phase::InProgress => Some(QuestionView::from_question(
            session.current_question()?,
            session.current_index(),
            session.questions().len(),
        )),
        _ => None,
    };
    let scorecard = match session.phase() {
        Phase::Completed => Some(session.score()?),
        _ => None,
    };

    Ok(SessionView {
        session_id: id,
        phase: session.phase(),
        topic: session.topic(),
        difficulty: session.difficulty(),
        question,
        scorecard,
    })
}

/* Assessment handlers */

async fn create_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let id = state.get_registry().create();
    (
        StatusCode::CREATED,
        Json(serde_json::json!({ "session_id": id, "phase": Phase::Setup })),
    )
}

/// Fetches a question set from the generator and only then moves the session
/// out of `Setup`. A failed or malformed generation leaves the session
/// untouched so the user can retry.
async fn start_assessment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<StartRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let registry = state.get_registry();
    let phase = registry
        .with_session(&id, |session| session.phase())
        .ok_or(ServerError::SessionNotFound(id))?;
    if phase != Phase::Setup {
        return Err(SessionError::InvalidTransition {
            expected: Phase::Setup,
            actual: phase,
        }
        .into());
    }

    let questions = state
        .get_generator()
        .generate_questions(
            state.get_client(),
            request.topic,
            request.difficulty,
            CONFIG.session.question_count,
        )
        .await?;

    let view = registry
        .with_session(&id, |session| {
            session.start(request.topic, request.difficulty, questions)?;
            session_view(id, session)
        })
        .ok_or(ServerError::SessionNotFound(id))??;

    Ok((StatusCode::OK, Json(view)))
}

async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let view = state
        .get_registry()
        .with_session(&id, |session| session_view(id, session))
        .ok_or(ServerError::SessionNotFound(id))??;

    Ok((StatusCode::OK, Json(view)))
}

async fn submit_answer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<AnswerRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let response = state
        .get_registry()
        .with_session(&id, |session| -> Result<AnswerResponse, SessionError> {
            session.submit_answer(&request.choice)?;

            match session.phase() {
                Phase::Completed => Ok(AnswerResponse {
                    completed: true,
                    question: None,
                    scorecard: Some(session.score()?),
                }),
                _ => Ok(AnswerResponse {
                    completed: false,
                    question: Some(QuestionView::from_question(
                        session.current_question()?,
                        session.current_index(),
                        session.questions().len(),
                    )),
                    scorecard: None,
                }),
            }
        })
        .ok_or(ServerError::SessionNotFound(id))??;

    Ok((StatusCode::OK, Json(response)))
}

/// Serves the scorecard, per-question review and narrative evaluation. The
/// evaluation is generated on first request and cached on the session, so the
/// generator is hit exactly once per completed assessment.
async fn get_results(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let registry = state.get_registry();
    let (scorecard, review, topic, difficulty, cached) = registry
        .with_session(&id, |session| {
            Ok::<_, SessionError>((
                session.score()?,
                session.review()?,
                session.topic(),
                session.difficulty(),
                session.evaluation().map(str::to_string),
            ))
        })
        .ok_or(ServerError::SessionNotFound(id))??;

    let evaluation = match cached {
        Some(text) => text,
        None => {
            let text = state
                .get_generator()
                .evaluate(state.get_client(), &review)
                .await?;

            registry
                .with_session(&id, |session| match session.set_evaluation(text.clone()) {
                    Ok(()) => Ok(text.clone()),
                    // Lost a race with a parallel results request, keep the
                    // text that made it in first.
                    Err(SessionError::EvaluationAlreadySet) => Ok(session
                        .evaluation()
                        .unwrap_or(text.as_str())
                        .to_string()),
                    Err(e) => Err(e),
                })
                .ok_or(ServerError::SessionNotFound(id))??
        }
    };

    let response = ResultsResponse {
        session_id: id,
        topic,
        difficulty,
        scorecard,
        evaluation,
        review,
    };

    Ok((StatusCode::OK, Json(response)))
}

async fn reset_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let view = state
        .get_registry()
        .with_session(&id, |session| {
            session.reset();
            session_view(id, session)
        })
        .ok_or(ServerError::SessionNotFound(id))??;

    Ok((StatusCode::OK, Json(view)))
}

async fn discard_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    if !state.get_registry().remove(&id) {
        return Err(ServerError::SessionNotFound(id));
    }

    Ok(StatusCode::NO_CONTENT)
}
