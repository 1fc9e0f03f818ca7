use crate::encode::sniff_mime;
use crate::error::TryOnError;
use crate::input::BinaryResource;

pub const DEFAULT_MAX_UPLOAD_MB: u64 = 5;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Checks a freshly selected image before it is accepted as an input.
pub async fn validate_upload(resource: &BinaryResource, max_mb: u64) -> Result<(), TryOnError> {
    let declared = resource.declared_mime();
    if declared.is_some_and(|mime| !mime.starts_with("image/")) {
        return Err(not_an_image());
    }

    if resource.byte_len().await? > max_mb.saturating_mul(BYTES_PER_MB) {
        return Err(TryOnError::Validation(format!(
            "File size must be less than {max_mb}MB"
        )));
    }

    // Only undeclared types need their bytes sniffed.
    if declared.is_none() && sniff_mime(&resource.read().await?).is_none() {
        return Err(not_an_image());
    }

    Ok(())
}

fn not_an_image() -> TryOnError {
    TryOnError::Validation("Please upload an image file".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_accepts_small_image() {
        let res = BinaryResource::from_bytes("me.jpg", Some("image/jpeg"), vec![0u8; 1024]);
        assert!(validate_upload(&res, DEFAULT_MAX_UPLOAD_MB).await.is_ok());
    }

    #[tokio::test]
    async fn test_rejects_non_image() {
        let res = BinaryResource::from_bytes("notes.txt", Some("text/plain"), b"hello".to_vec());
        let err = validate_upload(&res, DEFAULT_MAX_UPLOAD_MB).await.unwrap_err();
        assert_eq!(err.user_message(), "Please upload an image file");

        let res = BinaryResource::from_bytes("mystery", None, b"hello".to_vec());
        assert!(validate_upload(&res, DEFAULT_MAX_UPLOAD_MB).await.is_err());
    }

    #[tokio::test]
    async fn test_rejects_oversized_image() {
        let res = BinaryResource::from_bytes("big.png", None, vec![0u8; 2 * 1024 * 1024 + 1]);
        let err = validate_upload(&res, 2).await.unwrap_err();
        assert_eq!(err.user_message(), "File size must be less than 2MB");
    }

    #[tokio::test]
    async fn test_huge_limit_does_not_overflow() {
        let res = BinaryResource::from_bytes("me.jpg", Some("image/jpeg"), vec![0xFF]);
        assert!(validate_upload(&res, 18_000_000_000_000).await.is_ok());
        assert!(validate_upload(&res, u64::MAX).await.is_ok());
    }

    #[tokio::test]
    async fn test_oversized_file_rejected_before_sniffing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload.bin");
        std::fs::write(&path, vec![0u8; 1024 * 1024 + 1]).unwrap();

        let err = validate_upload(&BinaryResource::from_path(&path), 1)
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "File size must be less than 1MB");
    }
}
