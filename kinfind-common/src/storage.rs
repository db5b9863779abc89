//! Image storage and content hashing
//!
//! Uploaded photos live under `<root>/images/{missing,found}/<uuid>.<ext>`.
//! The database stores the path relative to `<root>/images`, which is also
//! the path segment used to serve the file over HTTP.

use crate::{Error, Result};
use sha2::{Digest, Sha256};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// Calculate the SHA-256 content hash of an image, hex encoded
pub fn content_hash(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Which report an image belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Missing,
    Found,
}

impl ImageKind {
    pub const ALL: [ImageKind; 2] = [ImageKind::Missing, ImageKind::Found];

    /// Sub-directory name under the image root
    pub fn dir_name(self) -> &'static str {
        match self {
            ImageKind::Missing => "missing",
            ImageKind::Found => "found",
        }
    }
}

/// File-system store for report images
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dir(&self, kind: ImageKind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    /// Create the image root and both sub-directories (idempotent)
    pub async fn ensure_dirs(&self) -> Result<()> {
        for kind in ImageKind::ALL {
            tokio::fs::create_dir_all(self.dir(kind)).await?;
        }
        Ok(())
    }

    /// Write image bytes under a fresh name, returning the relative path
    pub async fn save(&self, kind: ImageKind, bytes: &[u8], extension: &str) -> Result<String> {
        if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::InvalidInput(format!(
                "Invalid image extension: {:?}",
                extension
            )));
        }

        let file_name = format!("{}.{}", Uuid::new_v4().simple(), extension);
        let relative = format!("{}/{}", kind.dir_name(), file_name);

        tokio::fs::create_dir_all(self.dir(kind)).await?;
        tokio::fs::write(self.dir(kind).join(&file_name), bytes).await?;

        debug!(path = %relative, size = bytes.len(), "Stored image");
        Ok(relative)
    }

    /// Read a stored image by its relative path
    pub async fn read(&self, relative: &str) -> Result<Vec<u8>> {
        let path = self.resolve(relative)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NotFound(format!("Image {}", relative)))
            }
            Err(e) => Err(Error::Io(e)),
        }
    }

    /// Delete a stored image; a file that is already gone is not an error
    pub async fn remove(&self, relative: &str) -> Result<()> {
        let path = self.resolve(relative)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Io(e)),
        }
    }

    /// Remove every file in both image sub-directories
    ///
    /// Returns the number of files deleted. Missing directories count as empty.
    pub async fn clear(&self) -> Result<usize> {
        let mut removed = 0;

        for kind in ImageKind::ALL {
            let dir = self.dir(kind);
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(Error::Io(e)),
            };

            while let Some(entry) = entries.next_entry().await? {
                if !entry.file_type().await?.is_file() {
                    warn!(path = %entry.path().display(), "Skipping non-file entry in image directory");
                    continue;
                }
                tokio::fs::remove_file(entry.path()).await?;
                removed += 1;
            }
        }

        debug!(removed, "Cleared image store");
        Ok(removed)
    }

    /// URL path the HTTP service exposes a stored image under
    pub fn public_url(relative: &str) -> String {
        format!("/images/{}", relative)
    }

    /// Map a relative path onto the store, refusing anything that escapes it
    fn resolve(&self, relative: &str) -> Result<PathBuf> {
        let rel = Path::new(relative);
        let safe = !relative.is_empty()
            && rel.components().all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(Error::InvalidInput(format!(
                "Invalid image path: {}",
                relative
            )));
        }
        Ok(self.root.join(rel))
    }
}
