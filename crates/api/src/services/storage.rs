//! Local filesystem storage for uploaded product images.
//!
//! Stored files get a generated name (`{millis}-{uuid}{ext}`) and are served
//! back under `/uploads/images/`. Deletion accepts the public URL and maps it
//! back to a file, rejecting anything that would escape the upload directory.

use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Public URL prefix under which stored images are served.
pub const PUBLIC_PREFIX: &str = "/uploads/images/";

/// Maximum accepted upload size: 5 MiB.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Errors that can occur during image storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Content type is not an image.
    #[error("only image uploads are accepted (got {0})")]
    InvalidContentType(String),

    /// Upload exceeds the size limit.
    #[error("file exceeds the {MAX_UPLOAD_BYTES} byte limit")]
    TooLarge,

    /// URL does not map to a file inside the upload directory.
    #[error("invalid image url")]
    InvalidPath,

    /// Filesystem error.
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Filesystem-backed image store rooted at a single upload directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a store rooted at `dir`. The directory is created lazily on
    /// first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the store writes into.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Validate and persist an uploaded image, returning its public URL.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidContentType` unless the declared type is
    /// `image/*`, `StorageError::TooLarge` past the size limit, and
    /// `StorageError::Io` on filesystem failure.
    pub async fn save(
        &self,
        original_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<String, StorageError> {
        if !content_type.starts_with("image/") {
            return Err(StorageError::InvalidContentType(content_type.to_owned()));
        }
        if data.len() > MAX_UPLOAD_BYTES {
            return Err(StorageError::TooLarge);
        }

        let ext = extension_of(original_name);
        let stored_name = format!("{}-{}{ext}", Utc::now().timestamp_millis(), Uuid::new_v4());

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(&stored_name);
        tokio::fs::write(&path, data).await?;
        debug!(file = %stored_name, bytes = data.len(), "image stored");

        Ok(format!("{PUBLIC_PREFIX}{stored_name}"))
    }

    /// Delete a stored image given its public URL.
    ///
    /// Returns `false` when there was nothing to delete: a URL outside the
    /// public prefix, or a file already gone.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidPath` if the URL names anything outside
    /// the upload directory.
    /// Returns `StorageError::Io` on other filesystem failures.
    pub async fn delete_by_url(&self, url: &str) -> Result<bool, StorageError> {
        let Some(name) = url.strip_prefix(PUBLIC_PREFIX) else {
            return Ok(false);
        };

        // The stored name is a single path component; separators or parent
        // references mean someone is steering the path out of the directory.
        if name.is_empty()
            || name.contains('/')
            || name.contains('\\')
            || name.contains("..")
        {
            return Err(StorageError::InvalidPath);
        }

        let path = self.dir.join(name);
        if !path.starts_with(&self.dir) {
            return Err(StorageError::InvalidPath);
        }

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(file = %name, "image deleted");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Lowercased extension of the original filename, dot included. Falls back
/// to `.jpg` when the name has none.
fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or_else(|| ".jpg".to_owned(), |ext| format!(".{}", ext.to_lowercase()))
}
