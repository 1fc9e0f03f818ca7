use std::borrow::Cow;

use serde_json::Value;

use crate::encode::{data_uri, decode_data_uri};
use crate::error::{FailureKind, TryOnError};

/// A composite image in a form the caller can render directly.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultImage {
    DataUri(String),
    /// Image bytes served with an image content type.
    Blob { mime: String, bytes: Vec<u8> },
}

impl ResultImage {
    /// Source string for an `<img>` element.
    pub fn src(&self) -> Cow<'_, str> {
        match self {
            Self::DataUri(uri) => Cow::Borrowed(uri.as_str()),
            Self::Blob { mime, bytes } => Cow::Owned(data_uri(mime, bytes)),
        }
    }

    pub fn mime(&self) -> Option<String> {
        match self {
            Self::DataUri(uri) => decode_data_uri(uri).map(|(mime, _)| mime),
            Self::Blob { mime, .. } => Some(mime.clone()),
        }
    }

    /// Dereferences the image back to raw bytes.
    pub fn bytes(&self) -> Option<Cow<'_, [u8]>> {
        match self {
            Self::DataUri(uri) => decode_data_uri(uri).map(|(_, bytes)| Cow::Owned(bytes)),
            Self::Blob { bytes, .. } => Some(Cow::Borrowed(bytes.as_slice())),
        }
    }

    /// File extension matching the image type, `jpg` when unknown.
    pub fn extension(&self) -> &'static str {
        match self.mime().as_deref() {
            Some("image/png") => "png",
            Some("image/webp") => "webp",
            Some("image/gif") => "gif",
            Some("image/bmp") => "bmp",
            Some("image/avif") => "avif",
            _ => "jpg",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProcessingOutcome {
    Success {
        result_image: ResultImage,
    },
    Failure {
        kind: FailureKind,
        message: String,
        detail: Option<Value>,
    },
}

impl ProcessingOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn result_image(&self) -> Option<&ResultImage> {
        match self {
            Self::Success { result_image } => Some(result_image),
            Self::Failure { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { message, .. } => Some(message.as_str()),
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }
}

impl From<TryOnError> for ProcessingOutcome {
    fn from(err: TryOnError) -> Self {
        Self::Failure {
            kind: err.kind(),
            message: err.user_message(),
            detail: err.detail(),
        }
    }
}

impl From<Result<ResultImage, TryOnError>> for ProcessingOutcome {
    fn from(result: Result<ResultImage, TryOnError>) -> Self {
        match result {
            Ok(result_image) => Self::Success { result_image },
            Err(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_renders_as_data_uri() {
        let image = ResultImage::Blob {
            mime: "image/png".into(),
            bytes: b"foo".to_vec(),
        };
        assert_eq!(image.src(), "data:image/png;base64,Zm9v");
        assert_eq!(image.extension(), "png");
        assert_eq!(&*image.bytes().unwrap(), b"foo");
    }

    #[test]
    fn test_data_uri_dereferences() {
        let image = ResultImage::DataUri("data:image/jpeg;base64,Zm9v".into());
        assert_eq!(&*image.bytes().unwrap(), b"foo");
        assert_eq!(image.extension(), "jpg");
    }

    #[test]
    fn test_error_becomes_failure() {
        let outcome = ProcessingOutcome::from(TryOnError::Validation("pick an image".into()));
        assert!(!outcome.is_success());
        assert_eq!(outcome.error_message(), Some("pick an image"));
        assert_eq!(outcome.failure_kind(), Some(FailureKind::Validation));
        assert!(outcome.result_image().is_none());
    }
}
