use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct NewImage {
    pub(crate) filename: String,
    pub(crate) path: String,
    pub(crate) uploaded_by: i64,
}

#[derive(Debug, Clone)]
pub(crate) struct StoredImage {
    pub(crate) id: i64,
    pub(crate) filename: String,
    pub(crate) path: String,
    pub(crate) uploaded_by: i64,
    pub(crate) created_at: DateTime<Utc>,
}

#[async_trait]
pub(crate) trait ImageRepository: Send + Sync {
    async fn record_image(&self, input: NewImage) -> Result<StoredImage, DomainError>;
    async fn find_by_filename(&self, filename: &str) -> Result<Option<StoredImage>, DomainError>;
}
