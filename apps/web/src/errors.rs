use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::warn;

use crate::export::PdfError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Clients only ever see a status code and a short human-readable body; causes
/// are logged server-side.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad gateway: {0}")]
    BadGateway(String),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn bad_gateway(msg: impl Into<String>) -> Self {
        AppError::BadGateway(msg.into())
    }
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        let message = match &e {
            LlmError::NotConfigured => return AppError::bad_request("Missing API key"),
            LlmError::Http(_) => "AI unavailable",
            LlmError::Api { .. } => "AI error",
            LlmError::Parse(_) => "Bad AI response",
            LlmError::EmptyContent => "No answer",
        };
        warn!("AI call failed: {e}");
        AppError::bad_gateway(message)
    }
}

impl From<PdfError> for AppError {
    fn from(e: PdfError) -> Self {
        let message = match &e {
            PdfError::NotConfigured => return AppError::bad_request("PDF service not configured"),
            PdfError::Http(_) => "PDF service unavailable",
            PdfError::Status(_) => "PDF generation failed",
        };
        warn!("PDF render failed: {e}");
        AppError::bad_gateway(message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Template(e) => {
                tracing::error!("Template error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Render error".to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, message).into_response()
    }
}
