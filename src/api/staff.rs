//! Staff API endpoints.
//!
//! Create and update arrive as multipart form data because of the optional
//! photo attachment; delete is JSON like the other entities.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::HeaderMap,
    Json,
};

use super::SuccessResponse;
use crate::assets::PhotoUpload;
use crate::auth;
use crate::errors::AppError;
use crate::models::{CreateStaffRequest, DeleteRequest, StaffMember, UpdateStaffRequest};
use crate::validation;
use crate::AppState;

/// GET /api/staff - List staff members in storage order. Public.
pub async fn list_staff(State(state): State<AppState>) -> Result<Json<Vec<StaffMember>>, AppError> {
    Ok(Json(state.repo.list_staff().await?))
}

/// POST /api/staff - Create a staff member (multipart, optional photo).
pub async fn create_staff(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<StaffMember>, AppError> {
    auth::require_admin(&headers, &state.config)?;
    auth::require_csrf(&headers)?;

    let form = StaffForm::parse(multipart).await?;
    let years = form.years()?;
    validation::validate_staff(&form.name, years, &form.message)?;

    let request = CreateStaffRequest {
        name: form.name.clone(),
        years,
        message: form.message.clone(),
    };
    Ok(Json(
        state.repo.create_staff(&request, form.photo.as_ref()).await?,
    ))
}

/// PUT /api/staff - Update a staff member (multipart, optional new photo).
pub async fn update_staff(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<StaffMember>, AppError> {
    auth::require_admin(&headers, &state.config)?;
    auth::require_csrf(&headers)?;

    let form = StaffForm::parse(multipart).await?;
    let Some(id) = form.id.clone() else {
        return Err(AppError::Validation("Id is required".to_string()));
    };
    let years = form.years()?;
    validation::validate_staff(&form.name, years, &form.message)?;

    let request = UpdateStaffRequest {
        id,
        name: form.name.clone(),
        years,
        message: form.message.clone(),
    };
    Ok(Json(
        state.repo.update_staff(&request, form.photo.as_ref()).await?,
    ))
}

/// DELETE /api/staff - Delete a staff member and, best-effort, their photo.
pub async fn delete_staff(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<DeleteRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    auth::require_admin(&headers, &state.config)?;
    auth::require_csrf(&headers)?;

    state.repo.delete_staff(&request.id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// Accumulated fields of the staff multipart form.
#[derive(Default)]
struct StaffForm {
    id: Option<String>,
    name: String,
    years_raw: Option<String>,
    message: String,
    photo: Option<PhotoUpload>,
}

impl StaffForm {
    async fn parse(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = StaffForm::default();

        while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            match name.as_str() {
                "id" => form.id = Some(field.text().await.map_err(bad_form)?),
                "name" => form.name = field.text().await.map_err(bad_form)?,
                "years" => form.years_raw = Some(field.text().await.map_err(bad_form)?),
                "message" => form.message = field.text().await.map_err(bad_form)?,
                "photo" => {
                    let mime = field.content_type().map(str::to_string).unwrap_or_default();
                    let bytes = field.bytes().await.map_err(bad_form)?;
                    // Browsers send an empty part when no file was chosen
                    if !bytes.is_empty() {
                        form.photo = Some(PhotoUpload {
                            bytes: bytes.to_vec(),
                            mime,
                        });
                    }
                }
                _ => {}
            }
        }
        Ok(form)
    }

    fn years(&self) -> Result<i64, AppError> {
        self.years_raw
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .ok_or_else(|| AppError::Validation("Years must be a number".to_string()))
    }
}

fn bad_form(err: MultipartError) -> AppError {
    AppError::BadRequest(format!("Invalid form data: {}", err))
}
