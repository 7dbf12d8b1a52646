use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use sha1::{Digest, Sha1};
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::error::AdminError;
use crate::models::UploadedImage;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// Signed uploads to the Cloudinary image API.
pub struct ImageUploadService {
    client: Client,
    base_url: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

impl ImageUploadService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.cloudinary_base_url.clone(),
            cloud_name: config.cloudinary_cloud_name.clone(),
            api_key: config.cloudinary_api_key.clone(),
            api_secret: config.cloudinary_api_secret.clone(),
        }
    }

    /// Signature over the sorted signed parameters followed by the API secret.
    pub fn sign(params: &[(&str, String)], api_secret: &str) -> String {
        let mut sorted: Vec<&(&str, String)> = params.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));

        let to_sign = sorted
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha1::new();
        hasher.update(to_sign.as_bytes());
        hasher.update(api_secret.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Uploads as an image resource and returns its `secure_url`.
    pub async fn upload_image(&self, image: &UploadedImage) -> Result<String, AdminError> {
        if self.cloud_name.is_empty() || self.api_key.is_empty() || self.api_secret.is_empty() {
            return Err(AdminError::ImageUpload("image store is not configured".to_string()));
        }

        debug!(
            "Uploading image {} ({} bytes)",
            image.file_name.as_deref().unwrap_or("<unnamed>"),
            image.bytes.len()
        );

        let timestamp = Utc::now().timestamp().to_string();
        let signature = Self::sign(&[("timestamp", timestamp.clone())], &self.api_secret);
        let data_uri = format!("data:{};base64,{}", image.mime_type(), BASE64.encode(&image.bytes));

        let url = format!("{}/{}/image/upload", self.base_url, self.cloud_name);
        let response = self.client
            .post(&url)
            .json(&json!({
                "file": data_uri,
                "api_key": self.api_key,
                "timestamp": timestamp,
                "signature": signature
            }))
            .send()
            .await
            .map_err(|e| AdminError::ImageUpload(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Image store error ({}): {}", status, error_text);
            return Err(AdminError::ImageUpload(format!("{}: {}", status, error_text)));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| AdminError::ImageUpload(e.to_string()))?;

        debug!("Image stored at {}", uploaded.secure_url);
        Ok(uploaded.secure_url)
    }
}
