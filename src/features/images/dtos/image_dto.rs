use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::images::models::ImageMetadata;

/// Upload image request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadImageDto {
    /// Stored filename: `<slug>_<YYYYMMDDHHMMSS>.<png|jpg|jpeg>`
    #[schema(example = "vacation_20240101120000.png")]
    pub name: String,
    /// The image to upload (image/png or image/jpeg, max 10MB)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub photo: String,
}

/// Response DTO for an uploaded image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ImageMetadataDto {
    /// Unique identifier assigned by the store
    pub id: Uuid,
    /// Stored filename
    #[schema(example = "vacation_20240101120000.png")]
    pub name: String,
    /// Web path the image is served from
    #[schema(example = "/img/vacation_20240101120000.png")]
    pub path: String,
    /// Timestamp when the record was created
    pub created_at: DateTime<Utc>,
}

impl From<ImageMetadata> for ImageMetadataDto {
    fn from(image: ImageMetadata) -> Self {
        Self {
            id: image.id,
            name: image.name,
            path: image.path,
            created_at: image.created_at,
        }
    }
}

/// Input for creating a metadata record
///
/// `path` is always derived from `name`; use [`NewImageMetadata::for_filename`].
#[derive(Debug, Clone, Validate)]
#[validate(schema(function = "validate_path_matches_name"))]
pub struct NewImageMetadata {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "path is required"))]
    pub path: String,
}

impl NewImageMetadata {
    pub fn for_filename(name: &str, public_path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: public_image_path(public_path, name),
        }
    }
}

/// Join the public image prefix and a filename: `/img` + `a.png` -> `/img/a.png`
pub fn public_image_path(public_path: &str, name: &str) -> String {
    format!("{}/{}", public_path.trim_end_matches('/'), name)
}

fn validate_path_matches_name(input: &NewImageMetadata) -> Result<(), ValidationError> {
    let suffix = format!("/{}", input.name);
    if input.path.ends_with(&suffix) {
        Ok(())
    } else {
        Err(ValidationError::new("path_mismatch")
            .with_message("path must be derived from name".into()))
    }
}
