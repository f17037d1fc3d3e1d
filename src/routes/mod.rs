// HTTP routes: index, version, inventory and the metrics endpoint

mod http;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::resolver::TopologyResolver;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) resolver: Arc<TopologyResolver>,
    pub(crate) config: AppConfig,
}

pub fn app(resolver: Arc<TopologyResolver>, config: AppConfig) -> Router {
    let metrics_path = config.server.metrics_path.clone();
    let state = AppState { resolver, config };
    Router::new()
        .route("/", get(http::index_handler)) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/interfaces", get(http::interfaces_handler)) // GET /api/interfaces
        .route(&metrics_path, get(http::metrics_handler)) // GET /metrics (configurable)
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
