//! Staff photo lifecycle.
//!
//! Photos are binary blobs in the same content store as the JSON collections,
//! named by the owning staff member's id. Record and blob are independently
//! versioned: record writes are authoritative, blob deletion is best-effort.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::errors::AppError;
use crate::store::ContentStore;

/// Sentinel photo path meaning "no custom photo uploaded".
pub const PHOTO_PLACEHOLDER: &str = "images/staff/placeholder.jpg";

/// Directory staff photo blobs live under.
const PHOTO_DIR: &str = "images/staff";

/// Largest accepted upload (2 MiB).
pub const MAX_PHOTO_BYTES: usize = 2 * 1024 * 1024;

/// One photo file received through the multipart form.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub bytes: Vec<u8>,
    pub mime: String,
}

/// Uploads, replaces, and deletes staff photo blobs.
pub struct PhotoStore {
    store: Arc<dyn ContentStore>,
}

impl PhotoStore {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Upload a photo for a newly created staff member.
    ///
    /// Validates mime type and size before touching the store. No version
    /// token is supplied: the path must be free.
    pub async fn upload(&self, id: &str, upload: &PhotoUpload) -> Result<String, AppError> {
        let path = photo_path(id, &upload.mime)?;
        check_size(upload)?;

        let encoded = BASE64.encode(&upload.bytes);
        self.store
            .write_binary(&path, &encoded, &format!("Add staff photo: {}", id), None)
            .await?;
        Ok(path)
    }

    /// Replace the photo of an existing staff member.
    ///
    /// Looks up the current blob version first and conditions the write on
    /// it; when no blob exists at the target path this is a fresh upload.
    pub async fn replace(&self, id: &str, upload: &PhotoUpload) -> Result<String, AppError> {
        let path = photo_path(id, &upload.mime)?;
        check_size(upload)?;

        let existing = self.store.token(&path).await?;
        let encoded = BASE64.encode(&upload.bytes);
        self.store
            .write_binary(
                &path,
                &encoded,
                &format!("Update staff photo: {}", id),
                existing.as_deref(),
            )
            .await?;
        Ok(path)
    }

    /// Best-effort blob deletion after the owning record is gone.
    ///
    /// Failures are logged and swallowed: an orphaned blob is a lesser
    /// problem than blocking the record deletion that already committed.
    pub async fn delete_best_effort(&self, path: &str) {
        match self.store.token(path).await {
            Ok(Some(sha)) => {
                let message = format!("Delete staff photo: {}", path);
                if let Err(e) = self.store.delete(path, &message, &sha).await {
                    tracing::warn!("Failed to delete staff photo {}: {}", path, e);
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Failed to look up staff photo {}: {}", path, e);
            }
        }
    }
}

/// Derive the blob path for a staff id from the upload's mime type.
fn photo_path(id: &str, mime: &str) -> Result<String, AppError> {
    let ext = match mime {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        _ => {
            return Err(AppError::Validation(
                "Photo must be a JPEG or PNG image".to_string(),
            ))
        }
    };
    Ok(format!("{}/{}.{}", PHOTO_DIR, id, ext))
}

fn check_size(upload: &PhotoUpload) -> Result<(), AppError> {
    if upload.bytes.len() > MAX_PHOTO_BYTES {
        return Err(AppError::Validation(
            "Photo must be 2MB or smaller".to_string(),
        ));
    }
    Ok(())
}
