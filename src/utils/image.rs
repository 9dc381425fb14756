//! Decoding of base64 `data:` image payloads.

use base64::Engine as _;
use serde_json::json;

use crate::error::AppError;

/// Image file extensions accepted from clients.
const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// A decoded image ready to be written to media storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub extension: String,
    pub bytes: Vec<u8>,
}

/// Decodes `data:image/<ext>;base64,<payload>` into raw bytes.
///
/// # Errors
///
/// Returns [`AppError::Validation`] (details keyed by `field`) if the value
/// is not a base64 image data URI, the format is not allowed, or the
/// payload is empty or not valid base64.
pub fn decode_data_uri(field: &str, value: &str) -> Result<DecodedImage, AppError> {
    let invalid = |reason: &str| AppError::bad_request("Invalid image", json!({ field: [reason] }));

    let rest = value
        .strip_prefix("data:image/")
        .ok_or_else(|| invalid("Expected a base64 encoded data:image URI"))?;

    let (format, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| invalid("Expected a base64 encoded data:image URI"))?;

    let extension = match format.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "jpg".to_string(),
        other if ALLOWED_EXTENSIONS.contains(&other) => other.to_string(),
        _ => return Err(invalid("Unsupported image format")),
    };

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|_| invalid("Image payload is not valid base64"))?;

    if bytes.is_empty() {
        return Err(invalid("Image payload is empty"));
    }

    Ok(DecodedImage { extension, bytes })
}
