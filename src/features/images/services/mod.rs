pub mod filename_validator;
pub mod image_processor;
pub mod metadata_store;
pub mod upload_service;

pub use image_processor::ImageProcessor;
pub use metadata_store::{ImageMetadataStore, PgImageMetadataStore};
pub use upload_service::{UploadRequest, UploadService, UploadedFile};
