//! Health and backend status endpoints.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::probe::BackendState;
use crate::state::AppState;

/// Liveness check. Does not touch the remote store.
///
/// GET /health
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness check.
///
/// GET /health/ready
///
/// 503 only when the backend is configured but failing. Running without a
/// backend, or against one that is not provisioned yet, is a supported mode
/// (bundled menu, mock orders) and reports ready.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.probe().backend_state().await.needs_attention() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    }
}

/// Backend status for the status banner.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    pub state: BackendState,
    pub configured: bool,
    /// Show a warning to customers.
    pub needs_attention: bool,
}

/// GET /api/connection
pub async fn connection(State(state): State<AppState>) -> Json<ConnectionStatus> {
    let backend = state.probe().backend_state().await;
    Json(ConnectionStatus {
        state: backend,
        configured: state.probe().is_configured(),
        needs_attention: backend.needs_attention(),
    })
}
