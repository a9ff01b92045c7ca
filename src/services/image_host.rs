//! Hosted image storage for room photos
//!
//! Uploads go straight to Cloudinary's signed upload API; the returned
//! `public_id` is stored with the room so the image can be destroyed later.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, multipart};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::CloudinaryConfig;

/// MIME types accepted for room images
pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/jpg"];

#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadedImage {
    pub public_id: String,
    pub url: String,
}

#[derive(Debug, Error)]
pub enum ImageHostError {
    #[error("image host rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("image host request failed: {0}")]
    Transport(String),
    #[error("image host did not respond within {0:?}")]
    Timeout(Duration),
    #[error("unexpected image host response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload(&self, image: ImageUpload) -> Result<UploadedImage, ImageHostError>;
    async fn destroy(&self, public_id: &str) -> Result<(), ImageHostError>;
}

pub fn is_allowed_image_type(content_type: &str) -> bool {
    ALLOWED_IMAGE_TYPES.contains(&content_type)
}

#[derive(Clone)]
pub struct CloudinaryHost {
    client: Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

impl CloudinaryHost {
    pub fn new(config: &CloudinaryConfig, timeout: Duration) -> Result<Self, ImageHostError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ImageHostError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            cloud_name: config.cloud_name.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/{}/image/{}", self.base_url, self.cloud_name, action)
    }

    fn map_transport_error(&self, err: reqwest::Error) -> ImageHostError {
        if err.is_timeout() {
            ImageHostError::Timeout(self.timeout)
        } else {
            ImageHostError::Transport(err.to_string())
        }
    }

    /// Signs `params` (already sorted by key) the way Cloudinary expects:
    /// `k1=v1&k2=v2` followed by the API secret.
    fn sign(&self, params: &[(&str, &str)]) -> String {
        let to_sign = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        let mut hasher = Sha256::new();
        hasher.update(to_sign.as_bytes());
        hasher.update(self.api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    async fn read_error(response: reqwest::Response) -> ImageHostError {
        let status = response.status().as_u16();
        match response.text().await {
            Ok(body) => ImageHostError::Rejected { status, body },
            Err(e) => ImageHostError::Transport(e.to_string()),
        }
    }
}

#[async_trait]
impl ImageHost for CloudinaryHost {
    async fn upload(&self, image: ImageUpload) -> Result<UploadedImage, ImageHostError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = self.sign(&[("timestamp", timestamp.as_str())]);

        let file_part = multipart::Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.content_type)
            .map_err(|e| ImageHostError::Transport(e.to_string()))?;

        let form = multipart::Form::new()
            .part("file", file_part)
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !response.status().is_success() {
            return Err(Self::read_error(response).await);
        }

        let uploaded = response
            .json::<UploadedImage>()
            .await
            .map_err(|e| ImageHostError::Decode(e.to_string()))?;

        tracing::debug!(public_id = %uploaded.public_id, "Image uploaded");
        Ok(uploaded)
    }

    async fn destroy(&self, public_id: &str) -> Result<(), ImageHostError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = self.sign(&[("public_id", public_id), ("timestamp", timestamp.as_str())]);

        let response = self
            .client
            .post(self.endpoint("destroy"))
            .form(&[
                ("public_id", public_id),
                ("api_key", self.api_key.as_str()),
                ("timestamp", timestamp.as_str()),
                ("signature", signature.as_str()),
                ("signature_algorithm", "sha256"),
            ])
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !response.status().is_success() {
            return Err(Self::read_error(response).await);
        }

        let body = response
            .json::<DestroyResponse>()
            .await
            .map_err(|e| ImageHostError::Decode(e.to_string()))?;

        // "not found" means the image is already gone
        if body.result != "ok" && body.result != "not found" {
            return Err(ImageHostError::Decode(format!(
                "destroy returned {}",
                body.result
            )));
        }

        Ok(())
    }
}
