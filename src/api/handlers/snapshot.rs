use crate::api::error::AppError;
use crate::utils::time::now_iso;
use crate::utils::validation::validate_session_id;
use axum::{
    Json,
    extract::{Path, State},
    response::Response,
};
use bytes::Bytes;
use serde::Serialize;
use utoipa::ToSchema;

use super::videos::stream_file;

#[derive(Serialize, ToSchema)]
pub struct SnapshotResponse {
    pub ok: bool,
    /// Server receive time, `%Y-%m-%dT%H:%M:%SZ`
    pub at: String,
    /// Snapshot filename inside the artifact directory
    pub file: String,
}

#[utoipa::path(
    post,
    path = "/snapshot/{session}",
    params(
        ("session" = String, Path, description = "Client-generated session identifier")
    ),
    request_body(content = Vec<u8>, description = "Complete still image", content_type = "image/jpeg"),
    responses(
        (status = 200, description = "Snapshot stored", body = SnapshotResponse),
        (status = 400, description = "Invalid session identifier")
    ),
    tag = "recording"
)]
pub async fn upload_snapshot(
    State(state): State<crate::AppState>,
    Path(session): Path<String>,
    body: Bytes,
) -> Result<Json<SnapshotResponse>, AppError> {
    let session =
        validate_session_id(&session).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let file = state.recorder.write_snapshot(session, &body).await?;

    Ok(Json(SnapshotResponse {
        ok: true,
        at: now_iso(),
        file,
    }))
}

#[utoipa::path(
    get,
    path = "/snapshot/latest",
    responses(
        (status = 200, description = "Most recent snapshot image", body = Vec<u8>, content_type = "image/jpeg"),
        (status = 404, description = "No snapshot stored yet")
    ),
    tag = "playback"
)]
pub async fn latest_snapshot(
    State(state): State<crate::AppState>,
) -> Result<Response, AppError> {
    let path = state
        .library
        .latest_snapshot()
        .await?
        .ok_or(AppError::NotFound("no snapshot".to_string()))?;

    stream_file(&path, mime::IMAGE_JPEG.as_ref()).await
}
