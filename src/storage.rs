//! Object storage for uploaded images.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid object path: {0}")]
    InvalidPath(String),

    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores `bytes` under `path` and returns the public URL of the object.
    async fn put(&self, path: &str, bytes: Vec<u8>) -> Result<String, StorageError>;
}

/// Objects kept on the local filesystem and served as static files.
pub struct LocalObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        LocalObjectStore {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path);
        let is_plain = !path.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !is_plain {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, path: &str, bytes: Vec<u8>) -> Result<String, StorageError> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Readers never observe a half-written object
        let partial = target.with_extension("part");
        if let Err(e) = tokio::fs::write(&partial, &bytes).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e.into());
        }
        tokio::fs::rename(&partial, &target).await?;

        tracing::debug!("Stored {} ({} bytes)", path, bytes.len());
        Ok(format!("{}/{}", self.public_base_url, path))
    }
}

/// Raster formats accepted for gallery uploads. Uploads are served inline
/// from the API origin, so scriptable images (SVG) stay out.
const RASTER_SUBTYPES: &[&str] = &["jpeg", "png", "webp", "gif"];

/// Lower-cased extension of `filename` when it names a raster image type.
pub fn image_extension(filename: &str) -> Option<String> {
    let extension = Path::new(filename)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    let mime = mime_guess::from_ext(&extension).first()?;
    let raster = mime.type_() == mime_guess::mime::IMAGE
        && RASTER_SUBTYPES.contains(&mime.subtype().as_str());
    raster.then_some(extension)
}

/// `<prefix>/<unix-millis>-<8 hex>.<extension>`
pub fn object_path(prefix: &str, extension: &str, now_millis: i64) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}/{}-{}.{}", prefix, now_millis, &suffix[..8], extension)
}
