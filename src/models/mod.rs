//! Data models for the Himawari site content.
//!
//! These models match the admin frontend TypeScript interfaces exactly, and double
//! as the storage schema: every read from the content store decodes through them.

mod document;
mod news;
mod settings;
mod staff;

pub use document::*;
pub use news::*;
pub use settings::*;
pub use staff::*;

use serde::Deserialize;

/// Request body shared by all DELETE endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteRequest {
    pub id: String,
}
