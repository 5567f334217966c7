// Request-level errors and their HTTP responses

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::perccli::FetchError;

#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("Credentials not found")]
    CredentialsNotFound,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("metrics encoding failed: {0}")]
    Metrics(#[from] prometheus::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for ExporterError {
    fn into_response(self) -> Response {
        match &self {
            ExporterError::CredentialsNotFound => {
                tracing::info!("scrape rejected: no credentials for target")
            }
            _ => tracing::error!(error = %self, "scrape failed"),
        }
        let body = ErrorBody {
            message: self.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
