/// Side length, in pixels, of every stored image
pub const IMAGE_SIZE: u32 = 400;

/// Maximum accepted upload size in bytes (10MB)
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Headroom added to the route body limit for multipart boundaries and text fields
pub const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// JPEG quality used when re-encoding non-PNG uploads
pub const JPEG_QUALITY: u8 = 90;

/// Largest width or height accepted by the decoder
pub const MAX_IMAGE_DIMENSION: u32 = 16384;

/// Content types accepted by the upload endpoint
pub const ALLOWED_MIME_TYPES: &[&str] = &["image/png", "image/jpeg", "image/jpg"];

/// Check if a MIME type is accepted for upload
pub fn is_mime_type_allowed(content_type: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&content_type)
}
