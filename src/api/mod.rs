//! REST API module.
//!
//! Contains all API routes and handlers following the admin frontend contract.
//! Reads are public; every mutating handler requires an admin session and a
//! CSRF token before it touches the repository.

mod documents;
mod news;
mod session;
mod settings;
mod staff;

pub use documents::*;
pub use news::*;
pub use session::*;
pub use settings::*;
pub use staff::*;

use serde::Serialize;

/// Body returned by DELETE and session endpoints.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
