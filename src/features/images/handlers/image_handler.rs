use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::AppError;
use crate::core::extractor::{multipart_error, AppMultipart};
use crate::features::images::dtos::{ImageMetadataDto, UploadImageDto};
use crate::features::images::services::{UploadRequest, UploadService, UploadedFile};
use crate::shared::constants::{is_mime_type_allowed, MAX_FILE_SIZE};
use crate::shared::types::{ApiResponse, Created};

/// List uploaded images
#[utoipa::path(
    get,
    path = "/images",
    tag = "images",
    responses(
        (status = 200, description = "All uploaded images", body = ApiResponse<Vec<ImageMetadataDto>>)
    )
)]
pub async fn list_images(
    State(service): State<Arc<UploadService>>,
) -> Result<Json<ApiResponse<Vec<ImageMetadataDto>>>, AppError> {
    let images = service.list_images().await?;
    Ok(Json(ApiResponse::success(images)))
}

/// Upload an image
///
/// Accepts multipart/form-data with:
/// - `name`: stored filename, `<slug>_<YYYYMMDDHHMMSS>.<png|jpg|jpeg>` (required)
/// - `photo`: the image, image/png or image/jpeg, at most 10MB (required)
#[utoipa::path(
    post,
    path = "/images",
    tag = "images",
    request_body(
        content = UploadImageDto,
        content_type = "multipart/form-data",
        description = "Image upload form with the target filename",
    ),
    responses(
        (status = 201, description = "Image uploaded successfully", body = ApiResponse<Created<ImageMetadataDto>>),
        (status = 400, description = "Invalid name, file type or input"),
        (status = 413, description = "File too large"),
        (status = 500, description = "Image could not be processed")
    )
)]
pub async fn upload_image(
    State(service): State<Arc<UploadService>>,
    AppMultipart(mut multipart): AppMultipart,
) -> Result<(StatusCode, Json<ApiResponse<Created<ImageMetadataDto>>>), AppError> {
    let mut request = UploadRequest::default();

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "name" => {
                request.name = field.text().await.map_err(multipart_error)?;
            }
            "photo" => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());

                // Reject by declared type before reading the body
                if !is_mime_type_allowed(&content_type) {
                    return Err(AppError::BadRequest(
                        "Only PNG and JPEG files are allowed".to_string(),
                    ));
                }

                let mut data = Vec::new();
                while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
                    if data.len() + chunk.len() > MAX_FILE_SIZE {
                        return Err(AppError::PayloadTooLarge(format!(
                            "File too large. Maximum size is {} bytes ({} MB)",
                            MAX_FILE_SIZE,
                            MAX_FILE_SIZE / 1024 / 1024
                        )));
                    }
                    data.extend_from_slice(&chunk);
                }

                request.photo = Some(UploadedFile { data, content_type });
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let image = service.upload(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Created { data: image })),
    ))
}
