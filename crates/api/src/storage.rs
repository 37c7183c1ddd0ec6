//! Flyer image storage
//!
//! Files are written to a local directory under their SHA-256 digest and
//! served back by `ServeDir` at the configured public base.

use std::path::{Path, PathBuf};

use whatsfest_core::security::content_digest;

use crate::error::ApiError;

/// Accepted flyer extensions
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    public_base: String,
    max_bytes: usize,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base: &str, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.trim_end_matches('/').to_string(),
            max_bytes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// URL path to mount the upload directory on, when uploads are served
    /// by this process rather than an external host
    pub fn local_mount(&self) -> Option<&str> {
        Some(self.public_base.as_str()).filter(|p| p.starts_with('/') && p.len() > 1)
    }

    pub const fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Lowercased extension of `file_name` if it is an accepted image type
    pub fn image_extension(file_name: &str) -> Result<String, ApiError> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        if ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Ok(ext)
        } else {
            Err(ApiError::BadRequest(format!(
                "Unsupported image format '.{}'. Supported: {}",
                ext,
                ALLOWED_IMAGE_EXTENSIONS.join(", ")
            )))
        }
    }

    /// Persist an upload and return the URL it can be fetched from
    pub async fn store(&self, file_name: &str, data: &[u8]) -> Result<String, ApiError> {
        if data.is_empty() {
            return Err(ApiError::BadRequest("Uploaded file is empty".into()));
        }
        if data.len() > self.max_bytes {
            return Err(ApiError::PayloadTooLarge(format!(
                "Image exceeds {} bytes",
                self.max_bytes
            )));
        }
        let ext = Self::image_extension(file_name)?;
        let stored_name = format!("{}.{}", content_digest(data), ext);

        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.root.join(&stored_name);
        if tokio::fs::try_exists(&path).await? {
            tracing::debug!(file = %stored_name, "flyer already stored");
        } else {
            tokio::fs::write(&path, data).await?;
            tracing::info!(file = %stored_name, bytes = data.len(), "stored flyer");
        }

        Ok(format!("{}/{}", self.public_base, stored_name))
    }
}
