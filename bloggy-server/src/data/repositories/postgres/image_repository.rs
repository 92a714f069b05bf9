use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::data::image_repository::{ImageRepository, NewImage, StoredImage};
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct PostgresImageRepository {
    pool: PgPool,
}

impl PostgresImageRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ImageRow {
    id: i64,
    filename: String,
    path: String,
    uploaded_by: i64,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl ImageRepository for PostgresImageRepository {
    async fn record_image(&self, input: NewImage) -> Result<StoredImage, DomainError> {
        let row = sqlx::query_as::<_, ImageRow>(
            r#"
            INSERT INTO images (filename, path, uploaded_by)
            VALUES ($1, $2, $3)
            RETURNING id, filename, path, uploaded_by, created_at
            "#,
        )
        .bind(&input.filename)
        .bind(&input.path)
        .bind(input.uploaded_by)
        .fetch_one(&self.pool)
        .await
        .map_err(map_image_db_error)?;

        Ok(map_row_to_image(row))
    }

    async fn find_by_filename(&self, filename: &str) -> Result<Option<StoredImage>, DomainError> {
        let row = sqlx::query_as::<_, ImageRow>(
            r#"
            SELECT
            id,
            filename,
            path,
            uploaded_by,
            created_at
            FROM images
            WHERE filename = $1
            "#,
        )
        .bind(filename)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_image_db_error)?;

        Ok(row.map(map_row_to_image))
    }
}

fn map_row_to_image(row: ImageRow) -> StoredImage {
    StoredImage {
        id: row.id,
        filename: row.filename,
        path: row.path,
        uploaded_by: row.uploaded_by,
        created_at: row.created_at,
    }
}

fn map_image_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            return DomainError::AlreadyExists("filename".to_string());
        }
        if db_err.code().as_deref() == Some("23503") {
            return DomainError::NotFound("user".to_string());
        }
    }
    DomainError::Unexpected(err.to_string())
}
