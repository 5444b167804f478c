//! Menu route handlers.

use axum::{Json, extract::State};
use corner_cafe_core::CategorySummary;
use tracing::instrument;

use crate::error::Result;
use crate::services::ResolvedMenu;
use crate::state::AppState;

/// GET /api/menu
///
/// # Errors
///
/// Fails only when no menu source is available.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Json<ResolvedMenu>> {
    Ok(Json(state.menu().load_menu().await?))
}

/// GET /api/categories
///
/// # Errors
///
/// Fails when the remote store is not ready or the query fails.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<CategorySummary>>> {
    Ok(Json(state.menu().list_categories().await?))
}
