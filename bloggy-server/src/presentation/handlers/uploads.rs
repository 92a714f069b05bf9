use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::presentation::AppState;
use crate::presentation::app_error::{AppError, AppResult};
use crate::presentation::middleware::auth::AuthenticatedUser;

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct UploadResponseDto {
    /// Stored filename; posts reference an image by this string.
    pub(crate) filename: String,
    pub(crate) path: String,
}

#[utoipa::path(
    post,
    path = "/api/uploads",
    tag = "uploads",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Image stored; multipart field 'file', max 1 MiB, jpeg/jpg/png/gif", body = UploadResponseDto),
        (status = 400, description = "Missing, oversized or non-image file"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn upload_image(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<UploadResponseDto>)> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::BadRequest(format!("invalid multipart body: {err}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("file field must carry a filename".to_string()))?;
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let data = field
            .bytes()
            .await
            .map_err(|err| AppError::BadRequest(format!("failed to read file field: {err}")))?;

        upload = Some((filename, content_type, data));
    }

    let (filename, content_type, data) =
        upload.ok_or_else(|| AppError::BadRequest("multipart field 'file' is required".to_string()))?;

    let image = state
        .upload_service
        .store_image(auth.user_id, &filename, &content_type, &data)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponseDto {
            filename: image.filename,
            path: image.path,
        }),
    ))
}
