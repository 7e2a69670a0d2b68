use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::core::error::{AppError, Result};
use crate::features::images::dtos::{ImageMetadataDto, NewImageMetadata};
use crate::features::images::services::filename_validator::validate_filename;
use crate::features::images::services::image_processor::ImageProcessor;
use crate::features::images::services::metadata_store::ImageMetadataStore;

/// An uploaded file as received by the handler, held in memory only
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Parsed upload request: the requested filename and, if present, the file
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub name: String,
    pub photo: Option<UploadedFile>,
}

/// Orchestrates the upload stages: validate, process, persist
///
/// Each stage short-circuits the rest. There is no rollback: a metadata
/// failure after a successful write leaves the file on disk.
pub struct UploadService {
    store: Arc<dyn ImageMetadataStore>,
    processor: ImageProcessor,
}

impl UploadService {
    pub fn new(store: Arc<dyn ImageMetadataStore>, processor: ImageProcessor) -> Self {
        Self { store, processor }
    }

    pub fn processor(&self) -> &ImageProcessor {
        &self.processor
    }

    /// List all uploaded images
    pub async fn list_images(&self) -> Result<Vec<ImageMetadataDto>> {
        let images = self.store.list().await?;
        Ok(images.into_iter().map(ImageMetadataDto::from).collect())
    }

    /// Run a parsed upload through validation, processing and persistence
    pub async fn upload(&self, request: UploadRequest) -> Result<ImageMetadataDto> {
        let UploadRequest { name, photo } = request;

        let validated = validate_filename(
            &name,
            photo.as_ref().map(|file| file.content_type.as_str()),
        )
        .inspect_err(|e| debug!("Rejected upload name '{}': {}", name, e))?;

        let photo = photo.ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;

        debug!(
            "Upload validated: name={}, slug={}, timestamp={}, content_type={}, bytes={}",
            validated.filename,
            validated.slug,
            validated.timestamp,
            photo.content_type,
            photo.data.len()
        );

        let path = self
            .processor
            .process_and_save(photo.data, &validated.filename, &validated.extension)
            .await?;

        let public_path = self.processor.directory().public_path();
        let record = self
            .store
            .create(NewImageMetadata::for_filename(&validated.filename, public_path))
            .await
            .inspect_err(|e| {
                warn!(
                    "Image stored at {} but metadata was not created: {}",
                    path.display(),
                    e
                )
            })?;

        info!(
            "Image uploaded: id={}, name={}, path={}",
            record.id, record.name, record.path
        );

        Ok(record.into())
    }
}
