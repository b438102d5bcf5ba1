use bytes::Bytes;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("blob store returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("unexpected blob store response: {0}")]
    Parse(String),
}

/// Uploads raw image bytes to the external object store and hands back the
/// public URL, so that image-mode compile requests have something to point
/// their payload at.
pub struct BlobStore {
    client: Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct UploadResult {
    url: String,
}

impl BlobStore {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: config.blob_base_url.trim_end_matches('/').to_string(),
            token: config.blob_token.clone(),
        }
    }

    pub async fn upload(&self, filename: &str, body: Bytes) -> Result<String, UploadError> {
        // Random prefix so repeated uploads of the same filename never clash.
        let key = format!("{}-{}", Uuid::new_v4(), filename);
        let url = format!("{}/{}", self.base_url, key);

        info!("Uploading {} ({} bytes)", key, body.len());

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(body)
            .send()
            .await
            .map_err(|e| UploadError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("❌ Blob store error: status={} body={}", status, body);
            return Err(UploadError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: UploadResult = response
            .json()
            .await
            .map_err(|e| UploadError::Parse(e.to_string()))?;
        Ok(parsed.url)
    }
}
