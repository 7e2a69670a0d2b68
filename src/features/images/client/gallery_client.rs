use chrono::{DateTime, Local};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::features::images::client::filename::{
    check_selected_file, computed_filename, SelectionError,
};
use crate::features::images::dtos::ImageMetadataDto;
use crate::shared::types::{ApiResponse, Created};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Selection(#[from] SelectionError),
    /// Message reported by the server, shown to the user as is
    #[error("{0}")]
    Server(String),
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// A file picked by the user
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Client for the `/images` API
#[derive(Debug, Clone)]
pub struct GalleryClient {
    http: Client,
    base_url: String,
}

impl GalleryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Thumbnail source for a listed image
    pub fn image_url(&self, image: &ImageMetadataDto) -> String {
        format!("{}{}", self.base_url, image.path)
    }

    /// Fetch the gallery list
    pub async fn list_images(&self) -> Result<Vec<ImageMetadataDto>, ClientError> {
        let response = self
            .http
            .get(format!("{}/images", self.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            return Err(server_error(response, format!("Failed to load images ({})", status)).await);
        }

        let body: ApiResponse<Vec<ImageMetadataDto>> = parse(response).await?;
        Ok(body.data.unwrap_or_default())
    }

    /// Upload a file under a name derived from `display_name` and the current local time
    pub async fn upload(
        &self,
        display_name: &str,
        file: SelectedFile,
    ) -> Result<ImageMetadataDto, ClientError> {
        self.upload_at(display_name, file, Local::now()).await
    }

    /// Same as [`GalleryClient::upload`] with an explicit timestamp
    pub async fn upload_at(
        &self,
        display_name: &str,
        file: SelectedFile,
        at: DateTime<Local>,
    ) -> Result<ImageMetadataDto, ClientError> {
        check_selected_file(display_name, &file.content_type, file.bytes.len())?;

        let filename = computed_filename(display_name, &file.content_type, &at);
        debug!("Uploading '{}' as {}", file.file_name, filename);

        let photo = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)?;
        let form = Form::new().text("name", filename).part("photo", photo);

        let response = self
            .http
            .post(format!("{}/images", self.base_url))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            return Err(server_error(response, format!("Upload failed ({})", status)).await);
        }

        let body: ApiResponse<Created<ImageMetadataDto>> = parse(response).await?;
        body.data
            .map(|created| created.data)
            .ok_or_else(|| ClientError::Server("Upload response had no data".to_string()))
    }

    /// Upload, then re-fetch the gallery so it includes the new image
    pub async fn upload_and_refresh(
        &self,
        display_name: &str,
        file: SelectedFile,
    ) -> Result<Vec<ImageMetadataDto>, ClientError> {
        self.upload(display_name, file).await?;
        self.list_images().await
    }
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    Ok(response.json::<T>().await?)
}

/// Prefer the server's `message`, fall back to `fallback`
async fn server_error(response: Response, fallback: String) -> ClientError {
    let message = response
        .json::<ApiResponse<serde_json::Value>>()
        .await
        .ok()
        .and_then(|body| body.message)
        .unwrap_or(fallback);
    ClientError::Server(message)
}
