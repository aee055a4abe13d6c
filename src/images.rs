use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;

const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("{0} does not exist")]
    NotFound(PathBuf),
    #[error("unsupported image type '{0}' (expected jpg, jpeg, png, gif, bmp or webp)")]
    UnsupportedType(String),
    #[error("image storage error: {0}")]
    Io(#[from] io::Error),
}

/// Copies uploaded property pictures into the application's image folder
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, ImageError> {
        let root = root.into();
        if !root.exists() {
            fs::create_dir_all(&root)?;
        }

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Copy `source` into the store and return the stored path.
    pub fn store(&self, property_id: i32, source: &Path) -> Result<PathBuf, ImageError> {
        if !source.is_file() {
            return Err(ImageError::NotFound(source.to_path_buf()));
        }

        let extension = source
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ImageError::UnsupportedType(extension));
        }

        let stamp = Local::now().format("%Y%m%d%H%M%S");
        let mut attempt = 0;
        let destination = loop {
            let candidate = self
                .root
                .join(format!("property-{property_id}-{stamp}-{attempt}.{extension}"));
            if !candidate.exists() {
                break candidate;
            }
            attempt += 1;
        };

        fs::copy(source, &destination)?;
        tracing::debug!(property_id, path = %destination.display(), "stored property image");

        Ok(destination)
    }

    /// Delete a stored file; one that is already gone is not an error.
    pub fn remove(&self, stored: &Path) -> Result<(), ImageError> {
        match fs::remove_file(stored) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
