//! In-memory content store used by the integration tests.
//!
//! Enforces the same compare-and-swap rules as the real store so conflict
//! behavior can be exercised without network access.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ContentStore, RemoteFile};
use crate::errors::AppError;

#[derive(Debug, Clone)]
struct StoredFile {
    content: String,
    sha: String,
}

/// Fake store over a mutex-guarded map of path to (content, sha).
#[derive(Default)]
pub struct FakeContentStore {
    files: Mutex<HashMap<String, StoredFile>>,
    /// Paths whose writes/deletes fail with a store error
    broken_paths: Mutex<HashSet<String>>,
    /// Paths whose next read reports a stale version token
    stale_reads: Mutex<HashSet<String>>,
    /// Commit messages in execution order, the audit trail
    commits: Mutex<Vec<String>>,
    next_sha: AtomicU64,
}

impl FakeContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file directly, bypassing compare-and-swap.
    pub fn seed(&self, path: &str, content: &str) {
        let sha = self.fresh_sha();
        self.files.lock().unwrap().insert(
            path.to_string(),
            StoredFile {
                content: content.to_string(),
                sha,
            },
        );
    }

    /// Raw stored content, if any.
    pub fn content(&self, path: &str) -> Option<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .map(|f| f.content.clone())
    }

    /// Current version token, if any.
    pub fn sha(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(path).map(|f| f.sha.clone())
    }

    pub fn exists(&self, path: &str) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    /// All commit messages recorded so far.
    pub fn commit_messages(&self) -> Vec<String> {
        self.commits.lock().unwrap().clone()
    }

    /// Make every write/delete on `path` fail with a store error.
    pub fn break_path(&self, path: &str) {
        self.broken_paths.lock().unwrap().insert(path.to_string());
    }

    /// Hand out a stale version token on the next read or token lookup of
    /// `path`. A write conditioned on that token then fails, the same shape
    /// a race with another editor produces.
    pub fn serve_stale_token_once(&self, path: &str) {
        self.stale_reads.lock().unwrap().insert(path.to_string());
    }

    fn fresh_sha(&self) -> String {
        let n = self.next_sha.fetch_add(1, Ordering::SeqCst);
        format!("fake-sha-{}", n)
    }

    fn check_broken(&self, path: &str) -> Result<(), AppError> {
        if self.broken_paths.lock().unwrap().contains(path) {
            return Err(AppError::Store(format!("Injected failure for {}", path)));
        }
        Ok(())
    }

    fn store(
        &self,
        path: &str,
        content: &str,
        message: &str,
        sha: Option<&str>,
    ) -> Result<(), AppError> {
        self.check_broken(path)?;
        let mut files = self.files.lock().unwrap();

        match (files.get(path), sha) {
            // Create: path must be free
            (Some(_), None) => {
                return Err(AppError::VersionConflict(
                    "The content was modified by another editor. Please reload and try again."
                        .to_string(),
                ));
            }
            // Conditional update: token must match
            (Some(existing), Some(given)) if existing.sha != given => {
                return Err(AppError::VersionConflict(
                    "The content was modified by another editor. Please reload and try again."
                        .to_string(),
                ));
            }
            // Token refers to a version that no longer exists
            (None, Some(_)) => {
                return Err(AppError::VersionConflict(
                    "The content was modified by another editor. Please reload and try again."
                        .to_string(),
                ));
            }
            _ => {}
        }

        let sha = self.fresh_sha();
        files.insert(
            path.to_string(),
            StoredFile {
                content: content.to_string(),
                sha,
            },
        );
        drop(files);
        self.commits.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

#[async_trait]
impl ContentStore for FakeContentStore {
    async fn read(&self, path: &str) -> Result<Option<RemoteFile>, AppError> {
        let stale = self.stale_reads.lock().unwrap().remove(path);
        Ok(self.files.lock().unwrap().get(path).map(|f| RemoteFile {
            content: f.content.clone(),
            sha: if stale {
                format!("stale-{}", f.sha)
            } else {
                f.sha.clone()
            },
        }))
    }

    async fn write(
        &self,
        path: &str,
        content: &str,
        message: &str,
        sha: Option<&str>,
    ) -> Result<(), AppError> {
        self.store(path, content, message, sha)
    }

    async fn write_binary(
        &self,
        path: &str,
        content_b64: &str,
        message: &str,
        sha: Option<&str>,
    ) -> Result<(), AppError> {
        self.store(path, content_b64, message, sha)
    }

    async fn delete(&self, path: &str, message: &str, sha: &str) -> Result<(), AppError> {
        self.check_broken(path)?;
        let mut files = self.files.lock().unwrap();

        let Some(existing) = files.get(path) else {
            return Err(AppError::NotFound(format!("File {} not found", path)));
        };
        if existing.sha != sha {
            return Err(AppError::VersionConflict(
                "The content was modified by another editor. Please reload and try again."
                    .to_string(),
            ));
        }

        files.remove(path);
        drop(files);
        self.commits.lock().unwrap().push(message.to_string());
        Ok(())
    }

    async fn token(&self, path: &str) -> Result<Option<String>, AppError> {
        let stale = self.stale_reads.lock().unwrap().remove(path);
        Ok(self.files.lock().unwrap().get(path).map(|f| {
            if stale {
                format!("stale-{}", f.sha)
            } else {
                f.sha.clone()
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stale_token_rejected() {
        let store = FakeContentStore::new();
        store.write("a.json", "[]", "init", None).await.unwrap();
        let sha = store.sha("a.json").unwrap();

        // First writer with the current token wins
        store
            .write("a.json", "[1]", "first", Some(&sha))
            .await
            .unwrap();

        // Second writer still holding the old token loses
        let err = store
            .write("a.json", "[2]", "second", Some(&sha))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::VersionConflict(_)));
        assert_eq!(store.content("a.json").unwrap(), "[1]");
    }

    #[tokio::test]
    async fn test_create_requires_free_path() {
        let store = FakeContentStore::new();
        store.seed("a.json", "[]");

        let err = store.write("a.json", "[]", "dup", None).await.unwrap_err();
        assert!(matches!(err, AppError::VersionConflict(_)));
    }

    #[tokio::test]
    async fn test_delete_semantics() {
        let store = FakeContentStore::new();
        store.seed("a.json", "[]");
        let sha = store.sha("a.json").unwrap();

        let err = store.delete("a.json", "del", "wrong-sha").await.unwrap_err();
        assert!(matches!(err, AppError::VersionConflict(_)));

        store.delete("a.json", "del", &sha).await.unwrap();
        assert!(!store.exists("a.json"));

        let err = store.delete("a.json", "del", &sha).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_stale_injection_reaches_token_lookup() {
        let store = FakeContentStore::new();
        store.seed("a.json", "[]");
        store.serve_stale_token_once("a.json");

        // The poisoned token loses the conditional write
        let stale = store.token("a.json").await.unwrap().unwrap();
        let err = store
            .write("a.json", "[1]", "update", Some(&stale))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::VersionConflict(_)));
        assert_eq!(store.content("a.json").unwrap(), "[]");

        // One-shot: the next lookup hands out the real token again
        let fresh = store.token("a.json").await.unwrap().unwrap();
        store
            .write("a.json", "[1]", "update", Some(&fresh))
            .await
            .unwrap();
    }
}
