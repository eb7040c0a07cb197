use clap::Parser;
use dotenvy::dotenv;
use rust_recorder_backend::config::RecorderConfig;
use rust_recorder_backend::services::library::VideoLibrary;
use rust_recorder_backend::services::recording::RecordingService;
use rust_recorder_backend::services::storage::ArtifactStore;
use rust_recorder_backend::services::transcoder;
use rust_recorder_backend::{AppState, create_app};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Listening port (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Artifact directory (overrides VIDEO_DIR)
    #[arg(short, long)]
    video_dir: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment & Logging Setup
    dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_recorder_backend=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = RecorderConfig::from_env();
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(dir) = args.video_dir {
        config.video_dir = dir;
    }

    info!("🚀 Starting Recorder Backend...");
    info!(
        "📼 Artifacts: {} (max chunk {} MB)",
        config.video_dir.display(),
        config.max_chunk_size / 1024 / 1024
    );

    // 2. Setup Storage & Services
    let store = ArtifactStore::open(&config.video_dir).await?;
    let transcoder = transcoder::setup_transcoder(&config);
    let recorder = Arc::new(RecordingService::new(store, transcoder));
    let library = Arc::new(VideoLibrary::new(&config.video_dir));

    let state = AppState {
        config: config.clone(),
        recorder,
        library,
    };

    // 3. Configure tracing layer for HTTP requests
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &axum::http::Request<_>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
            )
        })
        .on_request(|request: &axum::http::Request<_>, _span: &tracing::Span| {
            info!("📥 {} {}", request.method(), request.uri());
        })
        .on_response(
            |response: &axum::http::Response<_>,
             latency: std::time::Duration,
             _span: &tracing::Span| {
                info!(
                    "📤 Finished in {:?} with status {}",
                    latency,
                    response.status()
                );
            },
        );

    // 4. Serve until shutdown
    let app = create_app(state).layer(trace_layer);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("✅ Recorder backend listening on: http://0.0.0.0:{}", config.port);
    info!(
        "📖 Swagger UI documentation: http://localhost:{}/swagger-ui",
        config.port
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Recorder backend exited cleanly.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("⌨️  Ctrl+C received, shutting down...");
        },
        _ = terminate => {
            info!("💤 SIGTERM received, shutting down...");
        },
    }
}
