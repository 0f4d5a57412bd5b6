//! Media service.
//!
//! Validates uploaded images and hands them to the storage backend. Only
//! real image bytes are accepted; the declared content type alone is not
//! trusted.

use std::sync::Arc;

use dishcovery_common::{AppError, AppResult, StorageBackend, generate_storage_key};
use image::ImageFormat;
use serde::Serialize;

/// Content types accepted for upload.
const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// A stored image, as returned to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredImage {
    /// Storage key of the stored file.
    pub filename: String,
    /// The client's original file name.
    pub original_name: String,
    /// Size in bytes.
    pub size: u64,
    /// Public URL under the uploads prefix.
    pub url: String,
}

/// Media service for image uploads.
#[derive(Clone)]
pub struct MediaService {
    storage: Arc<dyn StorageBackend>,
    max_bytes: usize,
}

impl MediaService {
    /// Create a new media service.
    #[must_use]
    pub fn new(storage: Arc<dyn StorageBackend>, max_bytes: usize) -> Self {
        Self { storage, max_bytes }
    }

    /// Validate and store an uploaded image.
    pub async fn store_image(
        &self,
        user_id: &str,
        original_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> AppResult<StoredImage> {
        if data.is_empty() {
            return Err(AppError::BadRequest("No image data received".to_string()));
        }

        if data.len() > self.max_bytes {
            return Err(AppError::Validation(format!(
                "Image exceeds the maximum size of {} bytes",
                self.max_bytes
            )));
        }

        if !ALLOWED_CONTENT_TYPES.contains(&content_type) {
            return Err(AppError::Validation(
                "Only JPEG, PNG, GIF, and WebP images are accepted".to_string(),
            ));
        }

        // The declared content type must match the actual bytes.
        let format = image::guess_format(data)
            .map_err(|_| AppError::Validation("File is not a valid image".to_string()))?;
        if !matches!(
            format,
            ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::Gif | ImageFormat::WebP
        ) {
            return Err(AppError::Validation(
                "Only JPEG, PNG, GIF, and WebP images are accepted".to_string(),
            ));
        }

        let key = generate_storage_key(user_id, original_name);
        let stored = self.storage.upload(&key, data, content_type).await?;

        Ok(StoredImage {
            filename: stored.key,
            original_name: original_name.to_string(),
            size: stored.size,
            url: stored.url,
        })
    }
}
