//! Remote content store abstraction.
//!
//! The site's content lives as files in a GitHub repository; this module wraps
//! the GitHub Contents API behind a trait so the repository layer and tests can
//! run against any conforming store.

use async_trait::async_trait;

use crate::errors::AppError;

#[cfg(test)]
pub mod fake;
mod github;

pub use github::GitHubContentStore;

/// One version-controlled file fetched from the store.
#[derive(Debug, Clone)]
pub struct RemoteFile {
    /// Decoded text content
    pub content: String,
    /// Version token required for conditional writes
    pub sha: String,
}

/// Versioned file operations against the remote content store.
///
/// Writes are compare-and-swap: supplying a version token that no longer
/// matches the store's current one fails with [`AppError::VersionConflict`],
/// and omitting the token only succeeds when the path is free. Every
/// successful write or delete produces one durable commit whose message is
/// the system's only audit trail. There is no cache and no automatic retry:
/// every read hits the store directly so tokens are fresh at the moment of
/// read, and conflicts propagate to the caller.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch content and version token; `Ok(None)` when the path does not exist.
    async fn read(&self, path: &str) -> Result<Option<RemoteFile>, AppError>;

    /// Create (`sha` = `None`) or conditionally update a text file.
    async fn write(
        &self,
        path: &str,
        content: &str,
        message: &str,
        sha: Option<&str>,
    ) -> Result<(), AppError>;

    /// Same semantics as `write` for binary content, already base64-encoded.
    async fn write_binary(
        &self,
        path: &str,
        content_b64: &str,
        message: &str,
        sha: Option<&str>,
    ) -> Result<(), AppError>;

    /// Delete a file, conditioned on its current version token.
    async fn delete(&self, path: &str, message: &str, sha: &str) -> Result<(), AppError>;

    /// Look up only the version token; `Ok(None)` when the path does not exist.
    ///
    /// Binary-safe existence check: unlike `read` it never decodes content, so
    /// it works for image blobs as well as JSON files.
    async fn token(&self, path: &str) -> Result<Option<String>, AppError>;
}
