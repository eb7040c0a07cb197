pub mod api;
pub mod config;
pub mod services;
pub mod utils;

use crate::config::RecorderConfig;
use crate::services::library::VideoLibrary;
use crate::services::recording::RecordingService;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::capture::capture_page,
        api::handlers::upload::upload_chunk,
        api::handlers::snapshot::upload_snapshot,
        api::handlers::snapshot::latest_snapshot,
        api::handlers::finalize::finalize_recording,
        api::handlers::videos::status,
        api::handlers::videos::latest_video,
        api::handlers::videos::fetch_video,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            api::handlers::snapshot::SnapshotResponse,
            api::handlers::finalize::FinalizeResponse,
            api::handlers::videos::StatusResponse,
            api::handlers::health::HealthResponse,
            services::library::VideoEntry,
        )
    ),
    tags(
        (name = "recording", description = "Chunk upload, snapshot and finalize endpoints"),
        (name = "playback", description = "Listing and streaming endpoints"),
        (name = "system", description = "Liveness")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub config: RecorderConfig,
    pub recorder: Arc<RecordingService>,
    pub library: Arc<VideoLibrary>,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(api::handlers::capture::capture_page))
        .route("/health", get(api::handlers::health::health_check))
        .route("/upload/:session", post(api::handlers::upload::upload_chunk))
        .route("/snapshot/latest", get(api::handlers::snapshot::latest_snapshot))
        .route(
            "/snapshot/:session",
            post(api::handlers::snapshot::upload_snapshot),
        )
        .route(
            "/finalize/:session",
            post(api::handlers::finalize::finalize_recording),
        )
        .route("/status", get(api::handlers::videos::status))
        .route("/latest", get(api::handlers::videos::latest_video))
        .route("/video/:filename", get(api::handlers::videos::fetch_video))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .expose_headers(Any),
        )
        .layer(axum::extract::DefaultBodyLimit::max(
            state.config.max_chunk_size,
        ))
        .with_state(state)
}
