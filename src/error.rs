use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;
use tracing::error;

/// Request-level failures surfaced to the client.
///
/// Upload and relay failures are deliberately absent: both degrade in place
/// (placeholder image, user notice) and never abort the enclosing operation.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("access denied")]
    AccessDenied,

    #[error("authentication required")]
    Unauthenticated,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials.").into_response()
            }
            AppError::AccessDenied => (StatusCode::FORBIDDEN, "Access denied.").into_response(),
            AppError::Unauthenticated => Redirect::to("/admin/login").into_response(),
            AppError::NotFound(what) => {
                (StatusCode::NOT_FOUND, format!("{what} not found")).into_response()
            }
            AppError::Internal(e) => {
                error!(error = %e, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
