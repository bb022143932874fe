//! Document link API endpoints.

use axum::{extract::State, http::HeaderMap, Json};

use super::SuccessResponse;
use crate::auth;
use crate::errors::AppError;
use crate::models::{CreateDocumentRequest, DeleteRequest, Document, UpdateDocumentRequest};
use crate::validation;
use crate::AppState;

/// GET /api/documents - List document links by display order. Public.
pub async fn list_documents(
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, AppError> {
    Ok(Json(state.repo.list_documents().await?))
}

/// POST /api/documents - Create a document link at the end of the order.
pub async fn create_document(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateDocumentRequest>,
) -> Result<Json<Document>, AppError> {
    auth::require_admin(&headers, &state.config)?;
    auth::require_csrf(&headers)?;
    validation::validate_document(
        &request.category,
        &request.name,
        &request.description,
        &request.url,
    )?;

    Ok(Json(state.repo.create_document(&request).await?))
}

/// PUT /api/documents - Update a document link (id in body, order untouched).
pub async fn update_document(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<UpdateDocumentRequest>,
) -> Result<Json<Document>, AppError> {
    auth::require_admin(&headers, &state.config)?;
    auth::require_csrf(&headers)?;
    validation::validate_document(
        &request.category,
        &request.name,
        &request.description,
        &request.url,
    )?;

    Ok(Json(state.repo.update_document(&request).await?))
}

/// DELETE /api/documents - Delete a document link by id.
pub async fn delete_document(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<DeleteRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    auth::require_admin(&headers, &state.config)?;
    auth::require_csrf(&headers)?;

    state.repo.delete_document(&request.id).await?;
    Ok(Json(SuccessResponse::ok()))
}
