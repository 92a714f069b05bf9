use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;
use tracing::warn;

use crate::data::image_repository::{ImageRepository, NewImage, StoredImage};
use crate::domain::error::DomainError;

const ALLOWED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "gif"];
const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/gif"];

pub(crate) struct UploadService<R: ImageRepository> {
    repo: R,
    upload_dir: PathBuf,
    max_bytes: usize,
}

impl<R: ImageRepository> UploadService<R> {
    pub(crate) fn new(repo: R, upload_dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            repo,
            upload_dir: upload_dir.into(),
            max_bytes,
        }
    }

    /// Validates the upload, writes it under the upload directory as
    /// `<unix-millis>-<sanitized-name>` and records it. The stored filename is
    /// the reference string posts use.
    pub(crate) async fn store_image(
        &self,
        user_id: i64,
        original_filename: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<StoredImage, DomainError> {
        validate_upload(original_filename, content_type, data.len(), self.max_bytes)?;

        let stored_name = format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            sanitize_filename(original_filename)
        );
        let path = self.upload_dir.join(&stored_name);

        fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        fs::write(&path, data)
            .await
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;

        let new_image = NewImage {
            filename: stored_name,
            path: path.to_string_lossy().into_owned(),
            uploaded_by: user_id,
        };
        match self.repo.record_image(new_image).await {
            Ok(image) => Ok(image),
            Err(err) => {
                if let Err(cleanup_err) = fs::remove_file(&path).await {
                    warn!("failed to remove orphaned upload {path:?}: {cleanup_err}");
                }
                Err(err)
            }
        }
    }
}

/// Upload constraints checked before anything touches disk or database:
/// size cap plus an extension/content-type whitelist.
pub(crate) fn validate_upload(
    filename: &str,
    content_type: &str,
    len: usize,
    max_bytes: usize,
) -> Result<(), DomainError> {
    if len == 0 {
        return Err(DomainError::Validation {
            field: "file",
            message: "must not be empty",
        });
    }
    if len > max_bytes {
        return Err(DomainError::Validation {
            field: "file",
            message: "exceeds the maximum upload size",
        });
    }

    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase);
    let extension_ok = extension
        .as_deref()
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext));
    let content_type_ok = ALLOWED_CONTENT_TYPES.contains(&content_type.to_lowercase().as_str());

    if !extension_ok || !content_type_ok {
        return Err(DomainError::Validation {
            field: "file",
            message: "only jpeg, jpg, png and gif images are accepted",
        });
    }
    Ok(())
}

fn sanitize_filename(filename: &str) -> String {
    let name = Path::new(filename)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload");

    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.is_empty() {
        "upload".to_string()
    } else {
        sanitized
    }
}
