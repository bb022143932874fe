//! Session and anti-forgery handling for the admin panel.
//!
//! Sessions are stateless HS256 JWTs carried in an HttpOnly cookie; CSRF
//! protection is a double-submit token compared in constant time. Reads are
//! public, so guards are applied per handler rather than as router middleware.

use argon2::Argon2;
use axum::http::{header, HeaderMap, HeaderValue};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use password_hash::{PasswordHash, PasswordVerifier};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::config::Config;
use crate::errors::AppError;

/// Cookie carrying the session JWT (HttpOnly).
pub const SESSION_COOKIE: &str = "session";

/// Cookie carrying the CSRF token (readable by the admin frontend).
pub const CSRF_COOKIE: &str = "csrf_token";

/// Header the frontend echoes the CSRF cookie into.
pub const CSRF_HEADER: &str = "x-csrf-token";

/// The only authorized principal.
pub const ADMIN_SUBJECT: &str = "admin";

/// Session lifetime: 8 hours.
const SESSION_TTL_SECS: i64 = 8 * 60 * 60;

/// JWT claims of an admin session.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Mint a session token for the admin subject.
pub fn create_session_token(secret: &str) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: ADMIN_SUBJECT.to_string(),
        iat: now,
        exp: now + SESSION_TTL_SECS,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign session token: {}", e)))
}

/// Verify a session token's signature and expiry; returns the subject.
pub fn verify_session_token(secret: &str, token: &str) -> Option<String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()
    .map(|data| data.claims.sub)
}

/// Subject of the current session, if the request carries a valid one.
pub fn current_session(headers: &HeaderMap, config: &Config) -> Option<String> {
    let secret = config.session_secret.as_deref()?;
    let token = cookie_value(headers, SESSION_COOKIE)?;
    verify_session_token(secret, &token)
}

/// Require an authenticated admin session.
pub fn require_admin(headers: &HeaderMap, config: &Config) -> Result<(), AppError> {
    match current_session(headers, config) {
        Some(subject) if subject == ADMIN_SUBJECT => Ok(()),
        _ => Err(AppError::Unauthorized(
            "Authentication required".to_string(),
        )),
    }
}

/// Double-submit check: the x-csrf-token header must match the CSRF cookie.
pub fn require_csrf(headers: &HeaderMap) -> Result<(), AppError> {
    let cookie = cookie_value(headers, CSRF_COOKIE);
    let header = headers.get(CSRF_HEADER).and_then(|v| v.to_str().ok());

    match (cookie, header) {
        (Some(cookie), Some(header)) if constant_time_compare(&cookie, header) => Ok(()),
        _ => Err(AppError::ForbiddenCsrf(
            "CSRF token missing or invalid".to_string(),
        )),
    }
}

/// Generate a fresh CSRF token: 32 random bytes, hex-encoded.
pub fn generate_csrf_token() -> Result<String, AppError> {
    let mut bytes = [0u8; 32];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| AppError::Internal(format!("Random generator unavailable: {}", e)))?;
    Ok(to_hex(&bytes))
}

/// Verify a password against the configured argon2 PHC hash.
pub fn verify_password(password: &str, phc_hash: &str) -> bool {
    match PasswordHash::new(phc_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Perform constant-time string comparison.
pub(crate) fn constant_time_compare(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    // Constant-time comparison
    a_bytes.ct_eq(b_bytes).into()
}

/// Read one cookie's value from the Cookie header.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    for part in cookies.split(';') {
        if let Some((key, value)) = part.trim().split_once('=') {
            if key == name {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Session cookie header value (HttpOnly).
pub fn session_cookie(token: &str, secure: bool) -> Result<HeaderValue, AppError> {
    build_cookie(SESSION_COOKIE, token, true, secure, SESSION_TTL_SECS)
}

/// CSRF cookie header value (readable by frontend scripts).
pub fn csrf_cookie(token: &str, secure: bool) -> Result<HeaderValue, AppError> {
    build_cookie(CSRF_COOKIE, token, false, secure, SESSION_TTL_SECS)
}

/// Expire a cookie immediately.
pub fn clear_cookie(name: &str, secure: bool) -> Result<HeaderValue, AppError> {
    build_cookie(name, "", true, secure, 0)
}

fn build_cookie(
    name: &str,
    value: &str,
    http_only: bool,
    secure: bool,
    max_age: i64,
) -> Result<HeaderValue, AppError> {
    let mut cookie = format!(
        "{}={}; Path=/; SameSite=Lax; Max-Age={}",
        name, value, max_age
    );
    if http_only {
        cookie.push_str("; HttpOnly");
    }
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
        .map_err(|e| AppError::Internal(format!("Invalid cookie value: {}", e)))
}

fn to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{:02x}", b);
    }
    out
}

/// Hash a password into a PHC string; test fixtures provision the admin
/// credential with this.
#[cfg(test)]
pub fn hash_password(password: &str) -> String {
    use argon2::PasswordHasher;
    use password_hash::SaltString;

    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).expect("getrandom failed");
    let salt = SaltString::encode_b64(&salt_bytes).expect("salt encoding failed");
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .expect("hashing failed")
        .to_string()
}
