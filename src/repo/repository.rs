//! Read-modify-write operations over the JSON collections.
//!
//! No rollback and no auto-retry: a failed write discards the in-memory
//! mutation and the store keeps its previous state. Concurrent editors are
//! resolved last-writer-wins, the loser receiving a version conflict.

use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{DOCUMENTS_PATH, NEWS_PATH, SETTINGS_PATH, STAFF_PATH};
use crate::assets::{PhotoStore, PhotoUpload, PHOTO_PLACEHOLDER};
use crate::errors::AppError;
use crate::models::{
    CreateDocumentRequest, CreateNewsRequest, CreateStaffRequest, Document, DocumentCollection,
    NewsItem, Settings, StaffMember, UpdateDocumentRequest, UpdateNewsRequest, UpdateStaffRequest,
};
use crate::store::ContentStore;

/// Repository for all content operations.
pub struct ContentRepository {
    store: Arc<dyn ContentStore>,
    photos: PhotoStore,
}

impl ContentRepository {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        let photos = PhotoStore::new(store.clone());
        Self { store, photos }
    }

    /// Load and decode one JSON file; `None` when the file does not exist.
    async fn load_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<(T, String)>, AppError> {
        match self.store.read(path).await? {
            Some(file) => {
                let value = serde_json::from_str(&file.content).map_err(|e| {
                    tracing::error!("Corrupt content in {}: {}", path, e);
                    AppError::Internal(format!("Corrupt content in {}: {}", path, e))
                })?;
                Ok(Some((value, file.sha)))
            }
            None => Ok(None),
        }
    }

    /// Serialize deterministically and write conditioned on the loaded token.
    async fn save_json<T: Serialize>(
        &self,
        path: &str,
        value: &T,
        message: &str,
        sha: Option<&str>,
    ) -> Result<(), AppError> {
        let content = serde_json::to_string_pretty(value)?;
        self.store.write(path, &content, message, sha).await
    }

    // ==================== NEWS OPERATIONS ====================

    async fn load_news(&self) -> Result<(Vec<NewsItem>, Option<String>), AppError> {
        Ok(match self.load_json::<Vec<NewsItem>>(NEWS_PATH).await? {
            Some((items, sha)) => (items, Some(sha)),
            None => (Vec::new(), None),
        })
    }

    /// List all news posts, most recent date first.
    pub async fn list_news(&self) -> Result<Vec<NewsItem>, AppError> {
        let (mut items, _) = self.load_news().await?;
        // ISO dates sort lexicographically; stable sort keeps insertion
        // order (newest first) within a date
        items.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(items)
    }

    /// Create a news post.
    pub async fn create_news(&self, request: &CreateNewsRequest) -> Result<NewsItem, AppError> {
        let (mut items, sha) = self.load_news().await?;

        let id = unique_id(format!("{}-{}", request.date, now_base36()), |candidate| {
            items.iter().any(|n| n.id == candidate)
        });
        let item = NewsItem {
            id,
            date: request.date.clone(),
            title: request.title.clone(),
            body: request.body.clone(),
        };

        items.insert(0, item.clone());
        self.save_json(
            NEWS_PATH,
            &items,
            &format!("Add news: {}", item.title),
            sha.as_deref(),
        )
        .await?;
        Ok(item)
    }

    /// Update a news post, replacing every field except the id.
    pub async fn update_news(&self, request: &UpdateNewsRequest) -> Result<NewsItem, AppError> {
        let (mut items, sha) = self.load_news().await?;

        let Some(item) = items.iter_mut().find(|n| n.id == request.id) else {
            return Err(AppError::NotFound(format!(
                "News {} not found",
                request.id
            )));
        };
        item.date = request.date.clone();
        item.title = request.title.clone();
        item.body = request.body.clone();
        let updated = item.clone();

        self.save_json(
            NEWS_PATH,
            &items,
            &format!("Update news: {}", updated.title),
            sha.as_deref(),
        )
        .await?;
        Ok(updated)
    }

    /// Delete a news post.
    pub async fn delete_news(&self, id: &str) -> Result<(), AppError> {
        let (mut items, sha) = self.load_news().await?;

        let Some(pos) = items.iter().position(|n| n.id == id) else {
            return Err(AppError::NotFound(format!("News {} not found", id)));
        };
        let removed = items.remove(pos);

        self.save_json(
            NEWS_PATH,
            &items,
            &format!("Delete news: {}", removed.title),
            sha.as_deref(),
        )
        .await
    }

    // ==================== STAFF OPERATIONS ====================

    async fn load_staff(&self) -> Result<(Vec<StaffMember>, Option<String>), AppError> {
        Ok(match self.load_json::<Vec<StaffMember>>(STAFF_PATH).await? {
            Some((members, sha)) => (members, Some(sha)),
            None => (Vec::new(), None),
        })
    }

    /// List all staff members in storage order.
    pub async fn list_staff(&self) -> Result<Vec<StaffMember>, AppError> {
        Ok(self.load_staff().await?.0)
    }

    /// Create a staff member, uploading the photo blob before the record.
    pub async fn create_staff(
        &self,
        request: &CreateStaffRequest,
        photo: Option<&PhotoUpload>,
    ) -> Result<StaffMember, AppError> {
        let (mut members, sha) = self.load_staff().await?;

        let id = unique_id(format!("staff-{}", now_base36()), |candidate| {
            members.iter().any(|m| m.id == candidate)
        });
        let photo_path = match photo {
            Some(upload) => self.photos.upload(&id, upload).await?,
            None => PHOTO_PLACEHOLDER.to_string(),
        };
        let member = StaffMember {
            id,
            name: request.name.clone(),
            years: request.years,
            message: request.message.clone(),
            photo: photo_path,
        };

        members.push(member.clone());
        self.save_json(
            STAFF_PATH,
            &members,
            &format!("Add staff: {}", member.name),
            sha.as_deref(),
        )
        .await?;
        Ok(member)
    }

    /// Update a staff member; a new photo replaces the blob under the same id.
    pub async fn update_staff(
        &self,
        request: &UpdateStaffRequest,
        photo: Option<&PhotoUpload>,
    ) -> Result<StaffMember, AppError> {
        let (mut members, sha) = self.load_staff().await?;

        let Some(pos) = members.iter().position(|m| m.id == request.id) else {
            return Err(AppError::NotFound(format!(
                "Staff {} not found",
                request.id
            )));
        };
        let photo_path = match photo {
            Some(upload) => self.photos.replace(&request.id, upload).await?,
            None => members[pos].photo.clone(),
        };
        let member = StaffMember {
            id: request.id.clone(),
            name: request.name.clone(),
            years: request.years,
            message: request.message.clone(),
            photo: photo_path,
        };

        members[pos] = member.clone();
        self.save_json(
            STAFF_PATH,
            &members,
            &format!("Update staff: {}", member.name),
            sha.as_deref(),
        )
        .await?;
        Ok(member)
    }

    /// Delete a staff member record, then its photo blob best-effort.
    ///
    /// The record write is authoritative; a failed blob deletion leaves an
    /// orphan and nothing else.
    pub async fn delete_staff(&self, id: &str) -> Result<(), AppError> {
        let (mut members, sha) = self.load_staff().await?;

        let Some(pos) = members.iter().position(|m| m.id == id) else {
            return Err(AppError::NotFound(format!("Staff {} not found", id)));
        };
        let removed = members.remove(pos);

        self.save_json(
            STAFF_PATH,
            &members,
            &format!("Delete staff: {}", removed.name),
            sha.as_deref(),
        )
        .await?;

        if removed.photo != PHOTO_PLACEHOLDER {
            self.photos.delete_best_effort(&removed.photo).await;
        }
        Ok(())
    }

    // ==================== DOCUMENT OPERATIONS ====================

    async fn load_documents(&self) -> Result<(DocumentCollection, Option<String>), AppError> {
        Ok(
            match self.load_json::<DocumentCollection>(DOCUMENTS_PATH).await? {
                Some((collection, sha)) => (collection, Some(sha)),
                None => (DocumentCollection::default(), None),
            },
        )
    }

    /// List all document links sorted by display order.
    pub async fn list_documents(&self) -> Result<Vec<Document>, AppError> {
        let (mut collection, _) = self.load_documents().await?;
        collection.documents.sort_by_key(|d| d.order);
        Ok(collection.documents)
    }

    /// Create a document link at the end of the display order.
    pub async fn create_document(
        &self,
        request: &CreateDocumentRequest,
    ) -> Result<Document, AppError> {
        let (mut collection, sha) = self.load_documents().await?;

        let id = unique_id(now_base36(), |candidate| {
            collection.documents.iter().any(|d| d.id == candidate)
        });
        let order = collection
            .documents
            .iter()
            .map(|d| d.order)
            .max()
            .unwrap_or(0)
            + 1;
        let document = Document {
            id,
            category: request.category.clone(),
            name: request.name.clone(),
            description: request.description.clone(),
            url: request.url.clone(),
            order,
        };

        collection.documents.push(document.clone());
        self.save_json(
            DOCUMENTS_PATH,
            &collection,
            &format!("Add document: {}", document.name),
            sha.as_deref(),
        )
        .await?;
        Ok(document)
    }

    /// Update a document link; `order` is never reassigned.
    pub async fn update_document(
        &self,
        request: &UpdateDocumentRequest,
    ) -> Result<Document, AppError> {
        let (mut collection, sha) = self.load_documents().await?;

        let Some(document) = collection
            .documents
            .iter_mut()
            .find(|d| d.id == request.id)
        else {
            return Err(AppError::NotFound(format!(
                "Document {} not found",
                request.id
            )));
        };
        document.category = request.category.clone();
        document.name = request.name.clone();
        document.description = request.description.clone();
        document.url = request.url.clone();
        let updated = document.clone();

        self.save_json(
            DOCUMENTS_PATH,
            &collection,
            &format!("Update document: {}", updated.name),
            sha.as_deref(),
        )
        .await?;
        Ok(updated)
    }

    /// Delete a document link.
    pub async fn delete_document(&self, id: &str) -> Result<(), AppError> {
        let (mut collection, sha) = self.load_documents().await?;

        let Some(pos) = collection.documents.iter().position(|d| d.id == id) else {
            return Err(AppError::NotFound(format!("Document {} not found", id)));
        };
        let removed = collection.documents.remove(pos);

        self.save_json(
            DOCUMENTS_PATH,
            &collection,
            &format!("Delete document: {}", removed.name),
            sha.as_deref(),
        )
        .await
    }

    // ==================== SETTINGS OPERATIONS ====================

    /// Fetch the settings singleton; absent settings are an error, not a
    /// default, because the public site cannot render without them.
    pub async fn get_settings(&self) -> Result<Settings, AppError> {
        match self.load_json::<Settings>(SETTINGS_PATH).await? {
            Some((settings, _)) => Ok(settings),
            None => Err(AppError::NotFound("Settings not found".to_string())),
        }
    }

    /// Replace the settings singleton atomically; creates it on first save.
    pub async fn replace_settings(&self, settings: &Settings) -> Result<Settings, AppError> {
        let sha = self.store.token(SETTINGS_PATH).await?;
        self.save_json(SETTINGS_PATH, settings, "Update settings", sha.as_deref())
            .await?;
        Ok(settings.clone())
    }
}

/// Base36 rendering of the current time in milliseconds, the id alphabet the
/// admin frontend has always used.
fn now_base36() -> String {
    base36(Utc::now().timestamp_millis() as u64)
}

fn base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize] as char);
        n /= 36;
    }
    out.iter().rev().collect()
}

/// Probe a deterministic suffix until the candidate id is free. Millisecond
/// timestamps can collide when two creates land in the same tick.
fn unique_id<F>(candidate: String, exists: F) -> String
where
    F: Fn(&str) -> bool,
{
    if !exists(&candidate) {
        return candidate;
    }
    let mut probe = 1u32;
    loop {
        let next = format!("{}-{}", candidate, probe);
        if !exists(&next) {
            return next;
        }
        probe += 1;
    }
}
