use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::TryOnError;

/// A user-selected image. File contents are only read when the image is encoded.
#[derive(Debug, Clone, PartialEq)]
pub enum BinaryResource {
    File(PathBuf),
    Memory {
        name: String,
        mime: Option<String>,
        data: Arc<[u8]>,
    },
}

impl BinaryResource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn from_bytes(name: impl Into<String>, mime: Option<&str>, data: impl Into<Arc<[u8]>>) -> Self {
        Self::Memory {
            name: name.into(),
            mime: mime.map(str::to_string),
            data: data.into(),
        }
    }

    /// Display name used in logs and error details.
    pub fn name(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Memory { name, .. } => name.clone(),
        }
    }

    /// MIME type the resource was selected with, falling back to its extension.
    pub fn declared_mime(&self) -> Option<&str> {
        match self {
            Self::File(path) => mime_for_path(path),
            Self::Memory { mime: Some(mime), .. } => Some(mime.as_str()),
            Self::Memory { name, mime: None, .. } => mime_for_path(Path::new(name)),
        }
    }

    pub async fn read(&self) -> Result<Arc<[u8]>, TryOnError> {
        match self {
            Self::File(path) => tokio::fs::read(path)
                .await
                .map(Arc::from)
                .map_err(|source| TryOnError::Encoding {
                    name: self.name(),
                    source,
                }),
            Self::Memory { data, .. } => Ok(data.clone()),
        }
    }

    pub async fn byte_len(&self) -> Result<u64, TryOnError> {
        match self {
            Self::File(path) => tokio::fs::metadata(path)
                .await
                .map(|meta| meta.len())
                .map_err(|source| TryOnError::Encoding {
                    name: self.name(),
                    source,
                }),
            Self::Memory { data, .. } => Ok(data.len() as u64),
        }
    }
}

/// The garment side of a try-on: an uploaded image or a catalog reference.
#[derive(Debug, Clone, PartialEq)]
pub enum GarmentInput {
    File(BinaryResource),
    Url(String),
}

impl GarmentInput {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::File(_) => "data_url_present",
            Self::Url(_) => "url_string_present",
        }
    }
}

impl From<BinaryResource> for GarmentInput {
    fn from(resource: BinaryResource) -> Self {
        Self::File(resource)
    }
}

pub(crate) fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| value.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "avif" => Some("image/avif"),
        _ => None,
    }
}
