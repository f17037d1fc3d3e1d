// GET handlers. Every scrape runs its own resolution pass.

use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};

use super::AppState;
use crate::metrics;
use crate::version::{NAME, VERSION, banner};

/// GET /: landing page linking the metrics path.
pub(super) async fn index_handler(State(state): State<AppState>) -> impl IntoResponse {
    let path = &state.config.server.metrics_path;
    Html(format!(
        "<html><head><title>{}</title></head>\n<body><h1>{}</h1>\n<p><a href=\"{}\">Metrics</a></p>\n</body></html>",
        banner(),
        NAME,
        path
    ))
}

/// GET /version: service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/interfaces: the resolved inventory as JSON. 503 when the counter table is unreadable.
pub(super) async fn interfaces_handler(State(state): State<AppState>) -> Response {
    match state.resolver.resolve().await {
        Ok(reports) => axum::Json(reports).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "interface resolution failed");
            (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response()
        }
    }
}

/// GET <metrics_path>: Prometheus text. A failed pass yields a body without interface series.
pub(super) async fn metrics_handler(State(state): State<AppState>) -> Response {
    let reports = match state.resolver.resolve().await {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(error = %e, "interface resolution failed");
            Vec::new()
        }
    };
    match metrics::render(&reports) {
        Ok(body) => ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "metrics encoding failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
