use crate::api::error::AppError;
use crate::services::library::VideoEntry;
use crate::utils::time::now_iso;
use crate::utils::validation::validate_artifact_name;
use axum::{
    Json,
    body::Body,
    extract::{Path as UrlPath, State},
    http::{StatusCode, header},
    response::Response,
};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use std::path::Path;
use tokio_util::io::ReaderStream;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct StatusResponse {
    pub ok: bool,
    /// Stored videos, newest first
    pub videos: Vec<VideoEntry>,
    /// Current server time, `%Y-%m-%dT%H:%M:%SZ`
    pub server_time: String,
}

#[utoipa::path(
    get,
    path = "/status",
    responses(
        (status = 200, description = "Directory listing and server time", body = StatusResponse)
    ),
    tag = "playback"
)]
pub async fn status(
    State(state): State<crate::AppState>,
) -> Result<Json<StatusResponse>, AppError> {
    let videos = state.library.list_videos().await?;
    Ok(Json(StatusResponse {
        ok: true,
        videos,
        server_time: now_iso(),
    }))
}

#[utoipa::path(
    get,
    path = "/latest",
    responses(
        (status = 200, description = "Most recent artifact, transcoded copy preferred"),
        (status = 404, description = "No videos stored yet")
    ),
    tag = "playback"
)]
pub async fn latest_video(State(state): State<crate::AppState>) -> Result<Response, AppError> {
    let entry = state
        .library
        .latest_video()
        .await?
        .ok_or(AppError::NotFound("no videos yet".to_string()))?;

    let path = state.recorder.store().root().join(&entry.filename);
    stream_file(&path, content_type_for(&entry.filename)).await
}

#[utoipa::path(
    get,
    path = "/video/{filename}",
    params(
        ("filename" = String, Path, description = "Exact artifact filename")
    ),
    responses(
        (status = 200, description = "Artifact stream"),
        (status = 404, description = "No such artifact")
    ),
    tag = "playback"
)]
pub async fn fetch_video(
    State(state): State<crate::AppState>,
    UrlPath(filename): UrlPath<String>,
) -> Result<Response, AppError> {
    // Traversal attempts get the same answer as missing files.
    let filename = validate_artifact_name(&filename)
        .map_err(|_| AppError::NotFound("not found".to_string()))?;

    let path = state.recorder.store().root().join(filename);
    let response = stream_file_with_disposition(&path, content_type_for(filename), filename).await?;
    Ok(response)
}

/// Streams a file from disk; a missing file turns into a 404.
pub(crate) async fn stream_file(path: &Path, content_type: &str) -> Result<Response, AppError> {
    let (body, len) = open_streaming(path).await?;
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, len)
        .body(body)
        .unwrap())
}

async fn stream_file_with_disposition(
    path: &Path,
    content_type: &str,
    filename: &str,
) -> Result<Response, AppError> {
    let (body, len) = open_streaming(path).await?;
    let encoded = utf8_percent_encode(filename, NON_ALPHANUMERIC).to_string();
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, len)
        .header(
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{filename}\"; filename*=UTF-8''{encoded}"),
        )
        .header(header::CACHE_CONTROL, "no-store")
        .body(body)
        .unwrap())
}

async fn open_streaming(path: &Path) -> Result<(Body, u64), AppError> {
    let file = tokio::fs::File::open(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::NotFound("not found".to_string())
        } else {
            AppError::Io(e)
        }
    })?;
    let len = file.metadata().await?.len();
    Ok((Body::from_stream(ReaderStream::new(file)), len))
}

fn content_type_for(filename: &str) -> &'static str {
    match Path::new(filename).extension().and_then(|e| e.to_str()) {
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_types_by_extension() {
        assert_eq!(content_type_for("a.mp4"), "video/mp4");
        assert_eq!(content_type_for("a.webm"), "video/webm");
        assert_eq!(content_type_for("a.jpg"), "image/jpeg");
        assert_eq!(content_type_for("a.webm.partial"), "application/octet-stream");
    }
}
