//! News API endpoints.

use axum::{extract::State, http::HeaderMap, Json};

use super::SuccessResponse;
use crate::auth;
use crate::errors::AppError;
use crate::models::{CreateNewsRequest, DeleteRequest, NewsItem, UpdateNewsRequest};
use crate::validation;
use crate::AppState;

/// GET /api/news - List news posts, most recent date first. Public.
pub async fn list_news(State(state): State<AppState>) -> Result<Json<Vec<NewsItem>>, AppError> {
    Ok(Json(state.repo.list_news().await?))
}

/// POST /api/news - Create a news post.
pub async fn create_news(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateNewsRequest>,
) -> Result<Json<NewsItem>, AppError> {
    auth::require_admin(&headers, &state.config)?;
    auth::require_csrf(&headers)?;
    validation::validate_news(&request.date, &request.title, &request.body)?;

    Ok(Json(state.repo.create_news(&request).await?))
}

/// PUT /api/news - Update a news post (full field set, id in body).
pub async fn update_news(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<UpdateNewsRequest>,
) -> Result<Json<NewsItem>, AppError> {
    auth::require_admin(&headers, &state.config)?;
    auth::require_csrf(&headers)?;
    validation::validate_news(&request.date, &request.title, &request.body)?;

    Ok(Json(state.repo.update_news(&request).await?))
}

/// DELETE /api/news - Delete a news post by id.
pub async fn delete_news(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<DeleteRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    auth::require_admin(&headers, &state.config)?;
    auth::require_csrf(&headers)?;

    state.repo.delete_news(&request.id).await?;
    Ok(Json(SuccessResponse::ok()))
}
