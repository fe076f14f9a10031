//! Endpoint error type.
//!
//! Every failure is logged in full and answered with an opaque 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::llm::ProviderError;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Errors raised while serving a completion request.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("malformed message entry: {0}")]
    MalformedMessage(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Provider(err) => {
                error!(status = err.status(), message = %err, "chat-direct error");
                if let Some(body) = err.body() {
                    error!(body, "chat-direct response body");
                }
            }
            AppError::MalformedMessage(_) => error!(message = %self, "chat-direct error"),
        }

        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}
