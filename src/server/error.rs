use axum::{
    Json,
    response::{IntoResponse, Response},
};
use reqwest::StatusCode;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{assessment::session::SessionError, client::generator_error::GeneratorError};

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("No session with id {0}")]
    SessionNotFound(Uuid),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error("Http request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            ServerError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Session(e) => match e {
                SessionError::EmptyChoice | SessionError::NoQuestions => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                SessionError::InvalidTransition { .. } | SessionError::EvaluationAlreadySet => {
                    StatusCode::CONFLICT
                }
            },
            ServerError::Generator(e) => {
                if e.is_unavailable() {
                    StatusCode::SERVICE_UNAVAILABLE
                } else {
                    StatusCode::BAD_GATEWAY
                }
            }
            ServerError::Http(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
