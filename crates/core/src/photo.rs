//! Photo upload rules.
//!
//! A photo is accepted when it is at most [`MAX_PHOTO_BYTES`], its filename
//! carries one of [`ALLOWED_EXTENSIONS`], and the bytes actually start with a
//! JPEG, PNG or BMP signature.

use image::ImageFormat;

use crate::error::{CoreError, FieldErrors};

/// Maximum accepted photo size (2 MiB).
pub const MAX_PHOTO_BYTES: usize = 2 * 1024 * 1024;

/// Accepted filename extensions, compared case-insensitively.
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp"];

/// Directory (relative to the media root) that request photos live under.
pub const PHOTO_DIR: &str = "requests_photos";

/// A photo that passed validation, ready to be written to blob storage.
#[derive(Debug, Clone)]
pub struct ValidatedPhoto {
    /// Lower-cased extension taken from the original filename.
    pub extension: String,
    pub bytes: Vec<u8>,
}

/// Validate an uploaded photo submitted under form field `field`.
pub fn validate_photo(
    field: &str,
    filename: &str,
    bytes: Vec<u8>,
) -> Result<ValidatedPhoto, CoreError> {
    let mut errors = FieldErrors::new();

    if bytes.len() > MAX_PHOTO_BYTES {
        errors.add(field, "Photo must not exceed 2 MB");
        return Err(CoreError::InvalidFields(errors));
    }

    let extension = match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_lowercase(),
        _ => String::new(),
    };
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        errors.add(field, "Unsupported file format. Use jpg, jpeg, png or bmp");
        return Err(CoreError::InvalidFields(errors));
    }

    let format_matches = match image::guess_format(&bytes) {
        Ok(ImageFormat::Jpeg) => matches!(extension.as_str(), "jpg" | "jpeg"),
        Ok(ImageFormat::Png) => extension == "png",
        Ok(ImageFormat::Bmp) => extension == "bmp",
        _ => false,
    };
    if !format_matches {
        errors.add(field, "File content is not a valid image of the declared type");
        return Err(CoreError::InvalidFields(errors));
    }

    Ok(ValidatedPhoto { extension, bytes })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
    const JPEG_MAGIC: &[u8] = b"\xFF\xD8\xFF\xE0";
    const BMP_MAGIC: &[u8] = b"BM";

    fn with_magic(magic: &[u8], len: usize) -> Vec<u8> {
        let mut bytes = magic.to_vec();
        bytes.resize(len.max(magic.len()), 0);
        bytes
    }

    #[test]
    fn accepts_each_allowed_format() {
        assert!(validate_photo("photo", "a.png", with_magic(PNG_MAGIC, 64)).is_ok());
        assert!(validate_photo("photo", "a.jpg", with_magic(JPEG_MAGIC, 64)).is_ok());
        assert!(validate_photo("photo", "a.jpeg", with_magic(JPEG_MAGIC, 64)).is_ok());
        assert!(validate_photo("photo", "a.bmp", with_magic(BMP_MAGIC, 64)).is_ok());
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        let photo = validate_photo("photo", "Pothole.PNG", with_magic(PNG_MAGIC, 64)).unwrap();
        assert_eq!(photo.extension, "png");
    }

    #[test]
    fn rejects_oversized_photo() {
        let bytes = with_magic(PNG_MAGIC, MAX_PHOTO_BYTES + 1);
        assert_matches!(
            validate_photo("photo", "big.png", bytes),
            Err(CoreError::InvalidFields(f)) if f.contains("photo")
        );
    }

    #[test]
    fn accepts_photo_at_exact_limit() {
        let bytes = with_magic(PNG_MAGIC, MAX_PHOTO_BYTES);
        assert!(validate_photo("photo", "edge.png", bytes).is_ok());
    }

    #[test]
    fn rejects_disallowed_extension() {
        assert!(validate_photo("photo", "scan.gif", with_magic(PNG_MAGIC, 64)).is_err());
        assert!(validate_photo("photo", "noext", with_magic(PNG_MAGIC, 64)).is_err());
        assert!(validate_photo("photo", ".png", with_magic(PNG_MAGIC, 64)).is_err());
    }

    #[test]
    fn rejects_content_that_does_not_match_extension() {
        assert!(validate_photo("photo", "fake.png", b"plain text".to_vec()).is_err());
        assert!(validate_photo("photo", "swap.png", with_magic(JPEG_MAGIC, 64)).is_err());
    }

    #[test]
    fn errors_are_reported_under_the_given_field() {
        let err = validate_photo("completion_photo", "x.txt", vec![]).unwrap_err();
        assert_matches!(err, CoreError::InvalidFields(f) if f.contains("completion_photo"));
    }
}
