use std::io::Cursor;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use image::{DynamicImage, ImageFormat, RgbImage};
use tempfile::TempDir;
use uuid::Uuid;

use crate::core::config::StorageConfig;
use crate::core::error::{AppError, Result};
use crate::features::images::dtos::NewImageMetadata;
use crate::features::images::models::ImageMetadata;
use crate::features::images::services::metadata_store::{
    validate_new_record, INVALID_INPUT_MESSAGE,
};
use crate::features::images::services::ImageMetadataStore;
use crate::features::images::{ImageProcessor, UploadService};
use crate::modules::storage::ImageDirectory;

/// Filenames both the server validator and client-side derivation must accept
pub const ACCEPTED_FILENAMES: &[&str] = &[
    "vacation_20240101120000.png",
    "a_20240101120000.jpg",
    "abcdefghij_20240101120000.jpeg",
    "my-trip-01_20231231235959.PNG",
    "ABC_20240101120000.Jpg",
    "-_20240101120000.png",
    "0123456789_00000000000000.jpeg",
];

/// Filenames that must be rejected
pub const REJECTED_FILENAMES: &[&str] = &[
    "",
    "Bad Name.png",
    "abcdefghijk_20240101120000.png",
    "abc_2024010112000.png",
    "abc_202401011200000.png",
    "abc_20240101120000.gif",
    "abc_20240101120000",
    "abc20240101120000.png",
    "_20240101120000.png",
    "abc_def_20240101120000.png",
    "abc_20240101120000.png.exe",
    "../abc_20240101120000.png",
    "abc_20240101120000.jpgg",
    "ábc_20240101120000.png",
    "abc_２０２４0101120000.png",
    "abc_20240101120000.pn g",
];

/// PNG-encoded RGB gradient of the given size
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode_gradient(width, height, ImageFormat::Png)
}

/// JPEG-encoded RGB gradient of the given size
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode_gradient(width, height, ImageFormat::Jpeg)
}

fn encode_gradient(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), format)
        .unwrap();
    bytes
}

/// A fresh, existing image directory inside a temp dir
///
/// Keep the returned `TempDir` alive for the duration of the test.
pub async fn test_image_directory() -> (TempDir, ImageDirectory) {
    let tmp = tempfile::tempdir().unwrap();
    let config = StorageConfig::new(tmp.path().join("public/img"), "/img").unwrap();
    let directory = ImageDirectory::new(&config);
    directory.ensure_directory().await.unwrap();
    (tmp, directory)
}

/// Upload service over an in-memory store and a temp image directory
pub async fn test_upload_service() -> (TempDir, Arc<UploadService>) {
    let (tmp, directory) = test_image_directory().await;
    let service = UploadService::new(
        Arc::new(InMemoryImageMetadataStore::default()),
        ImageProcessor::new(Arc::new(directory)),
    );
    (tmp, Arc::new(service))
}

/// In-memory metadata store, insertion ordered
#[derive(Default)]
pub struct InMemoryImageMetadataStore {
    records: Mutex<Vec<ImageMetadata>>,
}

#[async_trait]
impl ImageMetadataStore for InMemoryImageMetadataStore {
    async fn list(&self) -> Result<Vec<ImageMetadata>> {
        Ok(self.records.lock().unwrap().clone())
    }

    async fn create(&self, input: NewImageMetadata) -> Result<ImageMetadata> {
        validate_new_record(&input)?;

        let record = ImageMetadata {
            id: Uuid::now_v7(),
            name: input.name,
            path: input.path,
            created_at: Utc::now(),
        };
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }
}

/// Store whose `create` always fails validation
pub struct FailingImageMetadataStore;

#[async_trait]
impl ImageMetadataStore for FailingImageMetadataStore {
    async fn list(&self) -> Result<Vec<ImageMetadata>> {
        Ok(Vec::new())
    }

    async fn create(&self, _input: NewImageMetadata) -> Result<ImageMetadata> {
        Err(AppError::Validation(INVALID_INPUT_MESSAGE.to_string()))
    }
}
