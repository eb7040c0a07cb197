use axum::response::Html;

/// Browser capture page: records the visitor's screen/tab at ~10 FPS with
/// MediaRecorder, uploads chunks and periodic snapshots, finalizes on stop.
static CAPTURE_PAGE: &str = include_str!("../../../static/capture.html");

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Capture page", body = String, content_type = "text/html")
    ),
    tag = "recording"
)]
pub async fn capture_page() -> Html<&'static str> {
    Html(CAPTURE_PAGE)
}
