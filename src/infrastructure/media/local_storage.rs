//! Local filesystem media storage.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

use super::service::{MediaError, MediaResult, MediaStorage};
use crate::utils::image::DecodedImage;
use crate::utils::token::generate_token;

/// Length of generated file names (without extension).
const FILE_NAME_LENGTH: usize = 16;

/// Stores media files below `root` and serves them under `base_url`.
pub struct LocalMediaStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalMediaStorage {
    /// Creates a storage rooted at `root`. `base_url` is normalised to end
    /// with a slash.
    pub fn new(root: impl Into<PathBuf>, base_url: &str) -> Self {
        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Self {
            root: root.into(),
            base_url,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, relative: &str) -> MediaResult<PathBuf> {
        let path = Path::new(relative);
        let safe = path
            .components()
            .all(|c| matches!(c, Component::Normal(_)));

        if relative.is_empty() || !safe {
            return Err(MediaError::InvalidPath(relative.to_string()));
        }

        Ok(self.root.join(path))
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStorage {
    async fn save(&self, folder: &str, image: DecodedImage) -> MediaResult<String> {
        let relative = format!(
            "{}/{}.{}",
            folder.trim_matches('/'),
            generate_token(FILE_NAME_LENGTH),
            image.extension
        );
        let target = self.resolve(&relative)?;

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, &image.bytes).await?;

        debug!(path = %relative, size = image.bytes.len(), "Stored media file");
        Ok(relative)
    }

    async fn delete(&self, path: &str) -> MediaResult<()> {
        let target = self.resolve(path)?;

        match tokio::fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path, "Media file already missing");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check(&self) -> MediaResult<()> {
        let metadata = tokio::fs::metadata(&self.root).await?;
        if !metadata.is_dir() {
            return Err(MediaError::InvalidPath(self.root.display().to_string()));
        }
        if metadata.permissions().readonly() {
            return Err(MediaError::Io(std::io::Error::new(
                ErrorKind::PermissionDenied,
                "media root is read-only",
            )));
        }
        Ok(())
    }
}
