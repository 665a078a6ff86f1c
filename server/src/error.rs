use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use session_core::SessionError;
use thiserror::Error;
use tracing::error;

/// Error type for HTTP handlers and the session middleware
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Session layer is not installed for this route")]
    MissingSessionLayer,

    #[error("Invalid session cookie: {0}")]
    InvalidCookie(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self, "Internal server error");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Internal server error: {}", self),
        )
            .into_response()
    }
}
