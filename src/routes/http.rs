// GET handlers: index, version, metrics

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;

use super::AppState;
use crate::collector;
use crate::error::ExporterError;
use crate::metrics::ExporterMetrics;
use crate::perccli::Perccli;
use crate::{NAME, VERSION};

/// GET /: plain landing text.
pub(super) async fn index_handler() -> impl IntoResponse {
    format!("{} {}: scrape /metrics?target=<host>\n", NAME, VERSION)
}

/// GET /version: name, version and the perccli path this instance runs.
pub(super) async fn version_handler(State(state): State<AppState>) -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
        "perccliPath": state.config.perccli.path,
    }))
}

#[derive(Debug, Deserialize)]
pub(super) struct MetricsQuery {
    target: Option<String>,
}

/// GET /metrics?target=<host>: one full scrape of `host`.
pub(super) async fn metrics_handler(
    State(state): State<AppState>,
    Query(query): Query<MetricsQuery>,
) -> Result<impl IntoResponse, ExporterError> {
    let target = query
        .target
        .as_deref()
        .and_then(|host| state.credentials.target(host))
        .ok_or(ExporterError::CredentialsNotFound)?;

    let perccli = Perccli::new(state.runner.as_ref(), &target);
    let collection = collector::collect(&perccli).await?;

    let metrics = ExporterMetrics::new()?;
    metrics.record(&collection);
    let body = metrics.encode()?;
    Ok(([(header::CONTENT_TYPE, metrics.content_type())], body))
}
