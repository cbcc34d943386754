use crate::Error;

/// Image uploads are capped at 5 MiB.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif"];

/// Client-side check before an image upload round trip. The backend enforces
/// the same limits; failing early just saves the transfer.
pub fn validate_image_upload(content_type: &str, len: usize) -> Result<(), Error> {
    if !ALLOWED_IMAGE_TYPES.contains(&content_type) {
        return Err(Error::InvalidImage(format!(
            "{content_type} is not allowed, expected one of jpeg/png/gif"
        )));
    }
    if len > MAX_IMAGE_BYTES {
        return Err(Error::InvalidImage(format!(
            "{len} bytes exceeds the {MAX_IMAGE_BYTES} byte limit"
        )));
    }
    Ok(())
}
