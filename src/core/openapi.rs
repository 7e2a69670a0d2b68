use utoipa::{Modify, OpenApi};

use crate::features::images::{dtos as images_dtos, handlers as images_handlers};
use crate::shared::types::{ApiResponse, ApiStatus, Created};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Images
        images_handlers::list_images,
        images_handlers::upload_image,
    ),
    components(
        schemas(
            // Shared
            ApiStatus,
            // Images
            images_dtos::UploadImageDto,
            images_dtos::ImageMetadataDto,
            ApiResponse<Vec<images_dtos::ImageMetadataDto>>,
            ApiResponse<Created<images_dtos::ImageMetadataDto>>,
        )
    ),
    tags(
        (name = "images", description = "Image upload and gallery listing"),
    ),
    info(
        title = "Pixbox API",
        version = "0.1.0",
        description = "Image upload and gallery API",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
