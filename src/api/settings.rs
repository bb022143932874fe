//! Settings API endpoints.

use axum::{extract::State, http::HeaderMap, Json};

use crate::auth;
use crate::errors::AppError;
use crate::models::Settings;
use crate::validation;
use crate::AppState;

/// GET /api/settings - Fetch the settings singleton. Public; 404 until the
/// singleton has been saved once.
pub async fn get_settings(State(state): State<AppState>) -> Result<Json<Settings>, AppError> {
    Ok(Json(state.repo.get_settings().await?))
}

/// PUT /api/settings - Replace the settings singleton atomically.
pub async fn update_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<Settings>,
) -> Result<Json<Settings>, AppError> {
    auth::require_admin(&headers, &state.config)?;
    auth::require_csrf(&headers)?;
    validation::validate_settings(&request)?;

    Ok(Json(state.repo.replace_settings(&request).await?))
}
