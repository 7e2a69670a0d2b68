//! Image normalization: cover-fit to a fixed square and re-encode.

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader, Limits};
use thiserror::Error;
use tracing::debug;

use crate::core::error::AppError;
use crate::modules::storage::ImageDirectory;
use crate::shared::constants::{IMAGE_SIZE, JPEG_QUALITY, MAX_IMAGE_DIMENSION};

#[derive(Error, Debug)]
pub enum ImageProcessingError {
    #[error("Image decode failed: {0}")]
    DecodeFailed(String),
    #[error("Image encoding failed: {0}")]
    EncodeFailed(String),
    #[error("Failed to write image: {0}")]
    WriteFailed(#[from] std::io::Error),
    #[error("Image processing task failed: {0}")]
    TaskFailed(String),
}

impl From<ImageProcessingError> for AppError {
    fn from(err: ImageProcessingError) -> Self {
        match err {
            ImageProcessingError::TaskFailed(_) => AppError::Internal(err.to_string()),
            _ => AppError::Processing(err.to_string()),
        }
    }
}

/// Encoding used for the stored file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
}

impl OutputFormat {
    /// `png` encodes as PNG, anything else as JPEG
    pub fn from_extension(extension: &str) -> Self {
        if extension.eq_ignore_ascii_case("png") {
            OutputFormat::Png
        } else {
            OutputFormat::Jpeg
        }
    }
}

/// Cover-fit to a `size`×`size` square anchored at the center, then encode.
///
/// CPU-bound; call from `spawn_blocking` in async code.
pub fn render_square(
    data: &[u8],
    format: OutputFormat,
    size: u32,
) -> Result<Vec<u8>, ImageProcessingError> {
    let mut reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ImageProcessingError::DecodeFailed(e.to_string()))?;

    // Refuse decompression bombs before allocating the pixel buffer
    let mut limits = Limits::default();
    limits.max_image_width = Some(MAX_IMAGE_DIMENSION);
    limits.max_image_height = Some(MAX_IMAGE_DIMENSION);
    reader.limits(limits);

    let img = reader
        .decode()
        .map_err(|e| ImageProcessingError::DecodeFailed(e.to_string()))?;

    encode(&cover_square(&img, size), format)
}

/// Center-crop to the largest square, then scale that square to `size`.
///
/// Cropping first keeps the intermediate buffer no larger than the input,
/// whatever the aspect ratio.
fn cover_square(img: &DynamicImage, size: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    let side = width.min(height);
    let cropped = img.crop_imm((width - side) / 2, (height - side) / 2, side, side);
    cropped.resize_exact(size, size, FilterType::Lanczos3)
}

fn encode(img: &DynamicImage, format: OutputFormat) -> Result<Vec<u8>, ImageProcessingError> {
    let mut buf = Vec::new();
    match format {
        OutputFormat::Png => img
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .map_err(|e| ImageProcessingError::EncodeFailed(e.to_string()))?,
        OutputFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = img.to_rgb8();
            let mut encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
            encoder
                .encode_image(&rgb)
                .map_err(|e| ImageProcessingError::EncodeFailed(e.to_string()))?;
        }
    }
    Ok(buf)
}

/// Turns uploaded bytes into a normalized file in the image directory
#[derive(Debug, Clone)]
pub struct ImageProcessor {
    directory: Arc<ImageDirectory>,
    size: u32,
}

impl ImageProcessor {
    pub fn new(directory: Arc<ImageDirectory>) -> Self {
        Self {
            directory,
            size: IMAGE_SIZE,
        }
    }

    pub fn directory(&self) -> &ImageDirectory {
        &self.directory
    }

    /// Resize, re-encode and store the image as `<directory>/<filename>`
    ///
    /// # Arguments
    /// * `data` - Raw uploaded bytes
    /// * `filename` - Validated target filename
    /// * `extension` - Extension token from the filename (`png` selects PNG output)
    ///
    /// # Returns
    /// The path of the written file
    pub async fn process_and_save(
        &self,
        data: Vec<u8>,
        filename: &str,
        extension: &str,
    ) -> Result<PathBuf, ImageProcessingError> {
        let format = OutputFormat::from_extension(extension);
        let size = self.size;
        let input_len = data.len();

        let encoded = tokio::task::spawn_blocking(move || render_square(&data, format, size))
            .await
            .map_err(|e| ImageProcessingError::TaskFailed(e.to_string()))??;

        debug!(
            filename = %filename,
            ?format,
            input_bytes = input_len,
            output_bytes = encoded.len(),
            "Image normalized"
        );

        let path = self.directory.write_atomic(filename, &encoded).await?;
        Ok(path)
    }
}
