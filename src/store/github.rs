//! GitHub Contents API implementation of the content store.
//!
//! Each file in the content repository is addressed as
//! `/repos/{owner}/{repo}/contents/{path}`. Reads return the blob sha used as
//! the version token; writes and deletes send it back so GitHub can reject
//! stale updates (409, or 422 when a required sha is missing).

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};

use super::{ContentStore, RemoteFile};
use crate::config::Config;
use crate::errors::AppError;

/// GitHub rejects requests without a User-Agent.
const USER_AGENT: &str = "himawari-backend";

/// Upper bound on any single Contents API call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Content store backed by the GitHub Contents API.
pub struct GitHubContentStore {
    client: Client,
    api_url: String,
    owner: String,
    repo: String,
    branch: String,
    token: Option<String>,
}

#[derive(Serialize)]
struct WritePayload<'a> {
    message: &'a str,
    content: &'a str,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Serialize)]
struct DeletePayload<'a> {
    message: &'a str,
    sha: &'a str,
    branch: &'a str,
}

#[derive(Deserialize)]
struct ContentsResponse {
    sha: String,
    /// Base64 with embedded newlines; absent for large blobs
    content: Option<String>,
}

impl GitHubContentStore {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_url: config.github_api_url.trim_end_matches('/').to_string(),
            owner: config.github_owner.clone(),
            repo: config.github_repo.clone(),
            branch: config.github_branch.clone(),
            token: config.github_token.clone(),
        })
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_url, self.owner, self.repo, path
        )
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header(reqwest::header::ACCEPT, "application/vnd.github.v3+json");
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// GET a path, returning the parsed response or `None` on 404.
    async fn fetch(&self, path: &str) -> Result<Option<ContentsResponse>, AppError> {
        let resp = self
            .request(self.client.get(self.contents_url(path)))
            .query(&[("ref", self.branch.as_str())])
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::error!("Content store read of {} failed: {} {}", path, status, body);
            return Err(AppError::Store(format!(
                "Read of {} failed with status {}",
                path, status
            )));
        }

        let parsed = resp
            .json::<ContentsResponse>()
            .await
            .map_err(|e| AppError::Store(format!("Malformed store response for {}: {}", path, e)))?;
        Ok(Some(parsed))
    }

    async fn put_contents(
        &self,
        path: &str,
        content_b64: &str,
        message: &str,
        sha: Option<&str>,
    ) -> Result<(), AppError> {
        let payload = WritePayload {
            message,
            content: content_b64,
            branch: &self.branch,
            sha,
        };

        let resp = self
            .request(self.client.put(self.contents_url(path)))
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            tracing::debug!("Committed {} ({})", path, message);
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_default();
        if is_conflict(status) {
            tracing::warn!("Stale write to {} rejected: {} {}", path, status, body);
            return Err(AppError::VersionConflict(
                "The content was modified by another editor. Please reload and try again."
                    .to_string(),
            ));
        }
        tracing::error!("Content store write to {} failed: {} {}", path, status, body);
        Err(AppError::Store(format!(
            "Write to {} failed with status {}",
            path, status
        )))
    }
}

#[async_trait]
impl ContentStore for GitHubContentStore {
    async fn read(&self, path: &str) -> Result<Option<RemoteFile>, AppError> {
        let Some(parsed) = self.fetch(path).await? else {
            return Ok(None);
        };

        let raw = parsed.content.ok_or_else(|| {
            AppError::Store(format!("Store returned no content for {}", path))
        })?;
        let content = decode_content(path, &raw)?;

        Ok(Some(RemoteFile {
            content,
            sha: parsed.sha,
        }))
    }

    async fn write(
        &self,
        path: &str,
        content: &str,
        message: &str,
        sha: Option<&str>,
    ) -> Result<(), AppError> {
        let encoded = BASE64.encode(content.as_bytes());
        self.put_contents(path, &encoded, message, sha).await
    }

    async fn write_binary(
        &self,
        path: &str,
        content_b64: &str,
        message: &str,
        sha: Option<&str>,
    ) -> Result<(), AppError> {
        self.put_contents(path, content_b64, message, sha).await
    }

    async fn delete(&self, path: &str, message: &str, sha: &str) -> Result<(), AppError> {
        let payload = DeletePayload {
            message,
            sha,
            branch: &self.branch,
        };

        let resp = self
            .request(self.client.delete(self.contents_url(path)))
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            tracing::debug!("Deleted {} ({})", path, message);
            return Ok(());
        }
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("File {} not found", path)));
        }

        let body = resp.text().await.unwrap_or_default();
        if is_conflict(status) {
            tracing::warn!("Stale delete of {} rejected: {} {}", path, status, body);
            return Err(AppError::VersionConflict(
                "The content was modified by another editor. Please reload and try again."
                    .to_string(),
            ));
        }
        tracing::error!("Content store delete of {} failed: {} {}", path, status, body);
        Err(AppError::Store(format!(
            "Delete of {} failed with status {}",
            path, status
        )))
    }

    async fn token(&self, path: &str) -> Result<Option<String>, AppError> {
        Ok(self.fetch(path).await?.map(|parsed| parsed.sha))
    }
}

/// GitHub signals a stale or missing sha as 409, or 422 on some endpoints.
fn is_conflict(status: StatusCode) -> bool {
    status == StatusCode::CONFLICT || status == StatusCode::UNPROCESSABLE_ENTITY
}

/// Decode base64 file content, which GitHub returns with embedded newlines.
fn decode_content(path: &str, raw: &str) -> Result<String, AppError> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64
        .decode(compact.as_bytes())
        .map_err(|e| AppError::Store(format!("Invalid base64 content for {}: {}", path, e)))?;
    String::from_utf8(bytes)
        .map_err(|e| AppError::Store(format!("Non-UTF-8 content for {}: {}", path, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_content_strips_newlines() {
        // "hello world" encoded and wrapped the way the API returns it
        let raw = "aGVsbG8g\nd29ybGQ=\n";
        assert_eq!(decode_content("x.json", raw).unwrap(), "hello world");
    }

    #[test]
    fn test_decode_content_rejects_garbage() {
        assert!(decode_content("x.json", "!!not-base64!!").is_err());
    }

    #[test]
    fn test_write_payload_omits_missing_sha() {
        let payload = WritePayload {
            message: "Add news",
            content: "e30=",
            branch: "main",
            sha: None,
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert!(!json.contains("sha"));

        let payload = WritePayload {
            sha: Some("abc123"),
            ..payload
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"sha\":\"abc123\""));
    }

    #[test]
    fn test_conflict_statuses() {
        assert!(is_conflict(StatusCode::CONFLICT));
        assert!(is_conflict(StatusCode::UNPROCESSABLE_ENTITY));
        assert!(!is_conflict(StatusCode::NOT_FOUND));
        assert!(!is_conflict(StatusCode::OK));
    }
}
