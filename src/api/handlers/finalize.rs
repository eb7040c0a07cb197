use crate::api::error::AppError;
use crate::services::recording::FinalizeOutcome;
use crate::utils::time::now_iso;
use crate::utils::validation::validate_session_id;
use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct FinalizeResponse {
    pub ok: bool,
    /// Finalized raw recording filename
    pub webm: String,
    /// Transcoded copy, absent when the transcoder was unavailable or failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mp4: Option<String>,
    /// Finalize time; only present when the rename happened on this call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at: Option<String>,
}

#[utoipa::path(
    post,
    path = "/finalize/{session}",
    params(
        ("session" = String, Path, description = "Client-generated session identifier")
    ),
    responses(
        (status = 200, description = "Recording finalized (idempotent)", body = FinalizeResponse),
        (status = 400, description = "Invalid session identifier"),
        (status = 404, description = "No recording exists for this session")
    ),
    tag = "recording"
)]
pub async fn finalize_recording(
    State(state): State<crate::AppState>,
    Path(session): Path<String>,
) -> Result<Json<FinalizeResponse>, AppError> {
    let session =
        validate_session_id(&session).map_err(|e| AppError::BadRequest(e.to_string()))?;

    match state.recorder.finalize(session).await? {
        FinalizeOutcome::Finalized { webm, mp4 } => Ok(Json(FinalizeResponse {
            ok: true,
            webm,
            mp4,
            at: Some(now_iso()),
        })),
        FinalizeOutcome::AlreadyFinalized { webm, mp4 } => Ok(Json(FinalizeResponse {
            ok: true,
            webm,
            mp4,
            at: None,
        })),
        FinalizeOutcome::NothingRecorded => {
            Err(AppError::NotFound("no recording".to_string()))
        }
    }
}
