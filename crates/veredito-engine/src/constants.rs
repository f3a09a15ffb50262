//! Cross-cutting, shared constants.

/// Response header carrying the machine-readable outcome of a request.
pub const VEREDITO_STATUS_HEADER: &str = "X-Veredito-Status";
/// Header value for liveness replies.
pub const VEREDITO_STATUS_HEALTHY: &str = "healthy";
/// Header value attached to error responses.
pub const VEREDITO_STATUS_ERROR: &str = "error";

/// Largest accepted image upload, in bytes (10 MiB).
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Content types accepted for uploaded image parts.
pub const ALLOWED_IMAGE_CONTENT_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "image/png"];

/// MIME type declared for inline image payloads sent to the remote provider.
/// The upstream API does not require the declared type to match the actual
/// encoding, so every image is sent under this one label.
pub const INLINE_IMAGE_MIME_TYPE: &str = "image/jpeg";

/// Returns `true` if `content_type` is an accepted image type.
pub fn is_allowed_image_type(content_type: &str) -> bool {
    ALLOWED_IMAGE_CONTENT_TYPES.contains(&content_type)
}
