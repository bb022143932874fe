//! Downloadable document link model matching the admin frontend Document interface.

use serde::{Deserialize, Serialize};

/// An external document link, grouped by free-text category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub category: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    /// Display position, assigned max+1 on creation and never reassigned
    pub order: i64,
}

/// Storage wrapper: documents.json holds an object, not a bare array.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentCollection {
    pub documents: Vec<Document>,
}

/// Request body for creating a document link.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    pub category: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
}

/// Request body for updating a document link (`order` is preserved).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentRequest {
    pub id: String,
    pub category: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
}
