//! Content repository over the remote store.
//!
//! The GitHub repository is the source of truth for all site content: one
//! JSON file per entity collection, mutated read-modify-write with the read's
//! version token conditioning the write.

mod repository;

pub use repository::*;

/// Fixed store paths, one JSON file per collection or singleton.
pub const NEWS_PATH: &str = "data/news.json";
pub const STAFF_PATH: &str = "data/staff.json";
pub const DOCUMENTS_PATH: &str = "data/documents.json";
pub const SETTINGS_PATH: &str = "data/settings.json";
