// HTTP routes

mod http;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::credentials::Credentials;
use crate::perccli::CommandRunner;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config: Arc<AppConfig>,
    pub(crate) credentials: Arc<Credentials>,
    pub(crate) runner: Arc<dyn CommandRunner>,
}

pub fn app(
    config: AppConfig,
    credentials: Arc<Credentials>,
    runner: Arc<dyn CommandRunner>,
) -> Router {
    let state = AppState {
        config: Arc::new(config),
        credentials,
        runner,
    };
    Router::new()
        .route("/", get(http::index_handler)) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/metrics", get(http::metrics_handler)) // GET /metrics?target=<host>
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
