use async_trait::async_trait;
use serde::Deserialize;

use crate::config::environment::UploadConfig;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Upload request failed: {0}")]
    Request(String),

    #[error("Upload rejected with status {0}")]
    Rejected(u16),

    #[error("Malformed upload response: {0}")]
    Response(String),
}

/// External object-storage seam. Takes one image payload (data URI or a
/// remote URL) and returns the hosted URL.
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload(&self, image: &str) -> Result<String, UploadError>;
}

/// Cloudinary-style unsigned upload over HTTP.
pub struct CloudinaryUploader {
    client: reqwest::Client,
    endpoint: String,
    upload_preset: String,
}

impl CloudinaryUploader {
    pub fn new(client: reqwest::Client, config: &UploadConfig) -> Self {
        Self {
            client,
            endpoint: format!(
                "https://api.cloudinary.com/v1_1/{}/image/upload",
                config.cloud_name
            ),
            upload_preset: config.upload_preset.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CloudinaryResponse {
    secure_url: String,
}

#[async_trait]
impl ImageUploader for CloudinaryUploader {
    async fn upload(&self, image: &str) -> Result<String, UploadError> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[
                ("file", image),
                ("upload_preset", self.upload_preset.as_str()),
            ])
            .send()
            .await
            .map_err(|e| UploadError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(UploadError::Rejected(response.status().as_u16()));
        }

        let body: CloudinaryResponse = response
            .json()
            .await
            .map_err(|e| UploadError::Response(e.to_string()))?;

        Ok(body.secure_url)
    }
}
