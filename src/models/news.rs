//! News post model matching the admin frontend News interface.

use serde::{Deserialize, Serialize};

/// A dated news post shown on the public site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: String,
    /// ISO calendar date (YYYY-MM-DD), descending sort key on fetch
    pub date: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
}

/// Request body for creating a news post.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNewsRequest {
    pub date: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
}

/// Request body for updating a news post (full field replace, id kept).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNewsRequest {
    pub id: String,
    pub date: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
}
