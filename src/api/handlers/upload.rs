use crate::api::error::AppError;
use crate::utils::validation::validate_session_id;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header},
    response::Response,
};
use futures::TryStreamExt;
use tokio_util::io::StreamReader;

/// Exposed so browser JS can show upload progress across CORS.
pub const RECEIVED_BYTES_HEADER: &str = "X-Received-Bytes";

#[utoipa::path(
    post,
    path = "/upload/{session}",
    params(
        ("session" = String, Path, description = "Client-generated session identifier")
    ),
    request_body(content = Vec<u8>, description = "Raw video chunk", content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Chunk appended; X-Received-Bytes carries the new partial size"),
        (status = 400, description = "Invalid session identifier")
    ),
    tag = "recording"
)]
pub async fn upload_chunk(
    State(state): State<crate::AppState>,
    Path(session): Path<String>,
    body: Body,
) -> Result<Response, AppError> {
    let session =
        validate_session_id(&session).map_err(|e| AppError::BadRequest(e.to_string()))?;

    // Stream the request body straight into the append, no buffering.
    let chunk = StreamReader::new(body.into_data_stream().map_err(std::io::Error::other));
    let total = state.recorder.append_chunk(session, chunk).await?;

    tracing::debug!("Chunk appended for {session}, partial now {total} bytes");

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(RECEIVED_BYTES_HEADER, total.to_string())
        .header(header::ACCESS_CONTROL_EXPOSE_HEADERS, RECEIVED_BYTES_HEADER)
        .body(Body::from("OK"))
        .unwrap())
}
