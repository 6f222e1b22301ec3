use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// The `Display` strings below are the wire contract — the frontend matches
/// on them, so they must not change.
#[derive(Debug, Error)]
pub enum AppError {
    /// Caller error; not retryable by this layer.
    #[error("{0}")]
    InvalidRequest(String),

    /// Operator error; fatal until the credential is fixed. Reported before
    /// any upstream call is attempted.
    #[error("API key not configured. Please add GEMINI_API_KEY to .env file.")]
    Unconfigured,

    /// Every model candidate failed with a quota/rate-limit signature.
    /// Transient; the caller should back off and retry.
    #[error("API rate limit reached. Please wait a moment and try again.")]
    RateLimited,

    /// Every model candidate failed for some other reason. Carries the last
    /// upstream error's message verbatim for diagnosis.
    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unconfigured => {
                tracing::error!("Gemini API key not configured");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Upstream(msg) => {
                tracing::error!("Upstream failure: {msg}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        let body = Json(json!({ "error": self.to_string() }));

        (status, body).into_response()
    }
}
