//! Media storage trait and error types.

use async_trait::async_trait;
use serde_json::json;

use crate::error::AppError;
use crate::utils::image::DecodedImage;

/// Errors that can occur while storing media files.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Media I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid media path: {0}")]
    InvalidPath(String),
}

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

impl From<MediaError> for AppError {
    fn from(e: MediaError) -> Self {
        tracing::error!(error = %e, "Media storage error");
        AppError::internal("Media storage error", json!({}))
    }
}

/// Trait for persisting uploaded images.
///
/// Stored files are addressed by a path relative to the storage root, e.g.
/// `recipes/images/Xy12...png`. That path is what gets saved in the database.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Writes the image into `folder` under a fresh random name and returns
    /// its relative path.
    async fn save(&self, folder: &str, image: DecodedImage) -> MediaResult<String>;

    /// Removes a stored file. Missing files are not an error.
    async fn delete(&self, path: &str) -> MediaResult<()>;

    /// Public URL under which a stored path is served.
    fn url(&self, path: &str) -> String;

    /// Fails if the storage cannot currently accept files.
    async fn check(&self) -> MediaResult<()>;
}
