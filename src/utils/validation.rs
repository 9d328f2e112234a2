use std::path::Path;
use tokio::fs;
use tracing::debug;
use crate::core::ImageReference;

/// Checks that the referenced image exists, is a regular file, and is not empty.
///
/// Never fails: a missing or unreadable resource is reported as `false`.
/// This is the single gate that keeps a vanished or truncated capture from
/// being submitted.
pub async fn validate_image(image: &ImageReference) -> bool {
    validate_image_path(image.path()).await
}

/// Path-level variant of [`validate_image`].
pub async fn validate_image_path(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    match fs::metadata(path).await {
        Ok(meta) if meta.is_file() && meta.len() > 0 => true,
        Ok(meta) => {
            debug!("Image validation failed for {}: file={} size={}", path.display(), meta.is_file(), meta.len());
            false
        }
        Err(e) => {
            debug!("Image validation failed for {}: {}", path.display(), e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ImageSource;

    #[tokio::test]
    async fn missing_file_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let image = ImageReference::new(dir.path().join("gone.jpg"), ImageSource::Library);
        assert!(!validate_image(&image).await);
    }

    #[tokio::test]
    async fn empty_file_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.jpg");
        std::fs::write(&path, b"").unwrap();
        assert!(!validate_image(&ImageReference::new(path, ImageSource::Camera)).await);
    }

    #[tokio::test]
    async fn directory_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!validate_image_path(dir.path()).await);
    }

    #[tokio::test]
    async fn non_empty_file_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shirt.jpg");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF]).unwrap();
        assert!(validate_image(&ImageReference::new(path, ImageSource::Library)).await);
    }
}
