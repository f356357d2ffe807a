//! HTTP error mapping. Every failure is rendered as a failure envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use sg_core::envelope::ScanEnvelope;
use sg_remote::RemoteError;
use sg_tool_executor::ExecutorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Execution(#[from] ExecutorError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Execution(_) | ApiError::Remote(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Validation(msg) => tracing::info!(error = %msg, "rejected request"),
            other => tracing::warn!(error = %other, "request failed"),
        }
        (status, Json(ScanEnvelope::failure(self.to_string()))).into_response()
    }
}
