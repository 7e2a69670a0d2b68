use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{info, warn};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::images::dtos::NewImageMetadata;
use crate::features::images::models::ImageMetadata;

/// Message returned when a record fails store-level validation
pub const INVALID_INPUT_MESSAGE: &str = "invalid input";

/// Persistent collection of image metadata records
#[async_trait]
pub trait ImageMetadataStore: Send + Sync {
    /// All records in the store's natural order
    async fn list(&self) -> Result<Vec<ImageMetadata>>;

    /// Insert one record and return it with its assigned id and timestamp
    async fn create(&self, input: NewImageMetadata) -> Result<ImageMetadata>;
}

/// Store-level validation shared by every [`ImageMetadataStore`]
pub fn validate_new_record(input: &NewImageMetadata) -> Result<()> {
    input.validate().map_err(|e| {
        warn!("Rejected image metadata '{}': {}", input.name, e);
        AppError::Validation(INVALID_INPUT_MESSAGE.to_string())
    })
}

/// PostgreSQL-backed metadata store
pub struct PgImageMetadataStore {
    pool: PgPool,
}

impl PgImageMetadataStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert without the validator pass; table constraints still apply
    async fn insert(&self, input: &NewImageMetadata) -> Result<ImageMetadata> {
        sqlx::query_as::<_, ImageMetadata>(
            r#"
            INSERT INTO images (name, path)
            VALUES ($1, $2)
            RETURNING id, name, path, created_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.path)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_check_violation() => {
                warn!("Image metadata violates a table constraint: {}", db);
                AppError::Validation(INVALID_INPUT_MESSAGE.to_string())
            }
            e => {
                tracing::error!("Failed to create image metadata: {:?}", e);
                AppError::Database(e)
            }
        })
    }
}

#[async_trait]
impl ImageMetadataStore for PgImageMetadataStore {
    async fn list(&self) -> Result<Vec<ImageMetadata>> {
        let images = sqlx::query_as::<_, ImageMetadata>(
            r#"
            SELECT id, name, path, created_at
            FROM images
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list images: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(images)
    }

    async fn create(&self, input: NewImageMetadata) -> Result<ImageMetadata> {
        validate_new_record(&input)?;

        let image = self.insert(&input).await?;

        info!("Image metadata saved: id={}, name={}", image.id, image.name);

        Ok(image)
    }
}
