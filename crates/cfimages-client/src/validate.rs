//! Pre-upload checks against the service's published upload limits.
//!
//! Format and size are checked locally before any network traffic; the
//! server remains authoritative for everything else (pixel dimensions are
//! not checked here, since that would require decoding the image).

use cfimages_core::error::{Error, Result};
use std::path::Path;

/// File extensions the service accepts for upload, lowercase without dot.
pub const SUPPORTED_FORMATS: [&str; 6] = ["png", "gif", "jpeg", "jpg", "webp", "svg"];

/// Maximum upload size accepted by the service (10 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Check a path's extension against the supported-format list.
///
/// Case-insensitive; a path without an extension is unsupported.
#[must_use]
pub fn format_supported(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_FORMATS.contains(&ext.as_str())
        })
}

/// Validate a local file before upload: it must exist, be a regular file,
/// carry a supported extension, and fit within [`MAX_UPLOAD_BYTES`].
pub(crate) async fn check_upload_file(path: &Path) -> Result<()> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| Error::from_io(&e, path))?;

    if !metadata.is_file() {
        return Err(Error::ValidationError(format!(
            "{} is not a regular file",
            path.display()
        )));
    }
    if !format_supported(path) {
        return Err(Error::ValidationError(format!(
            "unsupported image format: {} (supported: {})",
            path.display(),
            SUPPORTED_FORMATS.join(", ")
        )));
    }
    if metadata.len() > MAX_UPLOAD_BYTES {
        return Err(Error::ValidationError(format!(
            "{} is {} bytes, above the {MAX_UPLOAD_BYTES} byte upload limit",
            path.display(),
            metadata.len()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_supported_extensions_case_insensitively() {
        assert!(format_supported("photo.PNG"));
        assert!(format_supported("photo.png"));
        assert!(format_supported("dir/photo.JpEg"));
        assert!(format_supported("photo.webp"));
        assert!(format_supported("logo.svg"));
    }

    #[test]
    fn rejects_unsupported_or_missing_extensions() {
        assert!(!format_supported("photo.bmp"));
        assert!(!format_supported("photo.tiff"));
        assert!(!format_supported("photo"));
        assert!(!format_supported(""));
    }

    #[tokio::test]
    async fn missing_file_is_file_not_found() {
        let err = check_upload_file(Path::new("/definitely/not/here.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }

    #[tokio::test]
    async fn unsupported_extension_is_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.bmp");
        std::fs::write(&path, b"bitmap").unwrap();

        let err = check_upload_file(&path).await.unwrap_err();
        assert!(matches!(err, Error::ValidationError(_)));
    }

    #[tokio::test]
    async fn directory_is_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("images.png");
        std::fs::create_dir(&sub).unwrap();

        let err = check_upload_file(&sub).await.unwrap_err();
        assert!(matches!(err, Error::ValidationError(_)));
    }

    #[tokio::test]
    async fn small_supported_file_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        std::fs::write(&path, b"not a real png, but size and name check out").unwrap();

        check_upload_file(&path).await.unwrap();
    }
}
