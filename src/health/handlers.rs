use std::sync::Arc;

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use reqwest::StatusCode;
use serde_json::json;
use tracing::error;

use crate::server::{app_state::AppState, error::ServerError};

pub fn health_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/detailed", get(health_detailed))
        .with_state(state.clone())
}

async fn health() -> impl IntoResponse {
    "OK".into_response()
}

async fn health_detailed(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServerError> {
    let platform = true;

    let generator_status = match state
        .get_generator()
        .health_check(state.get_client())
        .await
    {
        Ok(_) => true,
        Err(e) => {
            error!("Failed generator health check: {}", e);
            false
        }
    };

    let json = json!({
        "platform": platform,
        "generator": generator_status,
        "live_sessions": state.get_registry().len(),
    });

    Ok((StatusCode::OK, Json(json)))
}
