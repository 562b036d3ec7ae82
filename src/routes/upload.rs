use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::app_state::AppState;
use crate::models::payload::{FilePayload, ImagePayload, UploadResult};
use crate::services::uploader::UploadError;

#[derive(Debug, Deserialize)]
pub struct UploadImageRequest {
    #[serde(default)]
    pub image: Option<ImagePayload>,
}

#[derive(Debug, Deserialize)]
pub struct UploadFileRequest {
    #[serde(default)]
    pub file: Option<FilePayload>,
}

/// POST /api/v1/upload/image
pub async fn upload_image(
    State(state): State<AppState>,
    Json(request): Json<UploadImageRequest>,
) -> Result<Json<UploadResult>, (StatusCode, String)> {
    state
        .uploader
        .upload_image(request.image)
        .await
        .map(Json)
        .map_err(reject)
}

/// POST /api/v1/upload/file
pub async fn upload_file(
    State(state): State<AppState>,
    Json(request): Json<UploadFileRequest>,
) -> Result<Json<UploadResult>, (StatusCode, String)> {
    state
        .uploader
        .upload_file(request.file)
        .await
        .map(Json)
        .map_err(reject)
}

fn reject(err: UploadError) -> (StatusCode, String) {
    let status = match &err {
        UploadError::InvalidPayload(_)
        | UploadError::InvalidPath(_)
        | UploadError::InvalidMimeType => StatusCode::BAD_REQUEST,
        UploadError::FileTooBig { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        UploadError::Transform(_) => StatusCode::BAD_GATEWAY,
        UploadError::Read { .. } | UploadError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.prefixed())
}
