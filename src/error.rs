// Handler error types
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::sirius::{ClientError, ValidationError};

/// Everything a handler can fail with. Handlers return these and the
/// `error_page` middleware turns them into redirects or rendered pages.
#[derive(Debug, Error)]
pub enum AppError {
    /// No valid platform session; send the caller to sign in.
    #[error("unauthorized")]
    Unauthorized,

    /// Redirect to a path relative to the configured prefix.
    #[error("redirect to {0}")]
    Redirect(String),

    #[error("{}", .0)]
    Status(StatusCode),

    /// Field errors that the handler did not render itself.
    #[error("{0}")]
    Validation(ValidationError),

    #[error(transparent)]
    Platform(ClientError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn redirect(path: impl Into<String>) -> Self {
        AppError::Redirect(path.into())
    }

    pub fn not_found() -> Self {
        AppError::Status(StatusCode::NOT_FOUND)
    }

    pub fn forbidden() -> Self {
        AppError::Status(StatusCode::FORBIDDEN)
    }

    pub fn bad_request() -> Self {
        AppError::Status(StatusCode::BAD_REQUEST)
    }

    /// Status shown to the caller when this error is rendered as a page.
    /// Only 403 and 404 are shown as themselves; everything else is a 500.
    pub fn page_status(&self) -> StatusCode {
        let status = match self {
            AppError::Status(status) => *status,
            AppError::Platform(ClientError::Status(err)) => err.status(),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match status {
            StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Unauthorized => AppError::Unauthorized,
            ClientError::Validation(validation) => AppError::Validation(validation),
            other => AppError::Platform(other),
        }
    }
}

/// Carried on the placeholder response until `translate_errors` replaces it.
#[derive(Debug, Clone)]
pub struct UntranslatedError(pub Arc<AppError>);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response
            .extensions_mut()
            .insert(UntranslatedError(Arc::new(self)));
        response
    }
}
