//! Session API endpoints: admin login and logout.
//!
//! Login verifies the shared admin credential, then issues the session JWT
//! and CSRF token as cookies. Logout requires a live session and expires both.

use axum::{
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use serde::Deserialize;

use super::SuccessResponse;
use crate::auth;
use crate::errors::AppError;
use crate::AppState;

/// Request body for POST /api/login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /api/login - Verify the admin credential and start a session.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<SuccessResponse>), AppError> {
    let config = &state.config;
    let (Some(pass_hash), Some(secret)) = (&config.admin_pass_hash, &config.session_secret)
    else {
        tracing::error!("Login attempted but ADMIN_PASS_HASH/SESSION_SECRET are not configured");
        return Err(AppError::Internal("Login is not configured".to_string()));
    };

    // Evaluate both checks before branching
    let user_ok = auth::constant_time_compare(&request.username, &config.admin_user);
    let pass_ok = auth::verify_password(&request.password, pass_hash);
    if !user_ok || !pass_ok {
        tracing::warn!("Failed admin login attempt");
        return Err(AppError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    let session = auth::create_session_token(secret)?;
    let csrf = auth::generate_csrf_token()?;

    let mut headers = HeaderMap::new();
    headers.append(
        header::SET_COOKIE,
        auth::session_cookie(&session, config.cookie_secure)?,
    );
    headers.append(
        header::SET_COOKIE,
        auth::csrf_cookie(&csrf, config.cookie_secure)?,
    );

    tracing::info!("Admin logged in");
    Ok((headers, Json(SuccessResponse::ok())))
}

/// POST /api/logout - End the session and expire both cookies.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<(HeaderMap, Json<SuccessResponse>), AppError> {
    auth::require_admin(&headers, &state.config)?;
    auth::require_csrf(&headers)?;

    let secure = state.config.cookie_secure;
    let mut out = HeaderMap::new();
    out.append(
        header::SET_COOKIE,
        auth::clear_cookie(auth::SESSION_COOKIE, secure)?,
    );
    out.append(
        header::SET_COOKIE,
        auth::clear_cookie(auth::CSRF_COOKIE, secure)?,
    );

    Ok((out, Json(SuccessResponse::ok())))
}
