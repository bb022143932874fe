//! Staff member model matching the admin frontend Staff interface.

use serde::{Deserialize, Serialize};

/// A staff member presented on the public site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub id: String,
    pub name: String,
    /// Years of experience
    pub years: i64,
    #[serde(default)]
    pub message: String,
    /// Store path of the photo blob, or the placeholder sentinel
    pub photo: String,
}

/// Fields of the staff create form (arrives as multipart, not JSON).
#[derive(Debug, Clone)]
pub struct CreateStaffRequest {
    pub name: String,
    pub years: i64,
    pub message: String,
}

/// Fields of the staff update form (arrives as multipart, not JSON).
#[derive(Debug, Clone)]
pub struct UpdateStaffRequest {
    pub id: String,
    pub name: String,
    pub years: i64,
    pub message: String,
}
