use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tinylink_core::ShortenerError;
use tracing::{debug, error};

use crate::model::{ErrorKind, ErrorResponse};

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Shortener(#[from] ShortenerError),
    #[error("invalid request body: {0}")]
    Body(#[from] JsonRejection),
    /// The stored target cannot be sent as a `Location` header value.
    #[error("stored target for '{code}' is not a valid Location header")]
    InvalidLocation { code: String },
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Shortener(ShortenerError::Validation(_)) => StatusCode::BAD_REQUEST,
            AppError::Shortener(ShortenerError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Shortener(ShortenerError::Store(err)) if err.is_transient() => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Shortener(ShortenerError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Shortener(ShortenerError::Exhausted { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Body(rejection) => rejection.status(),
            AppError::InvalidLocation { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        if self.status_code().is_client_error() {
            ErrorKind::ClientError
        } else {
            ErrorKind::ServerError
        }
    }

    /// Message shown to the caller. Server-side details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            AppError::Shortener(ShortenerError::Store(err)) if err.is_transient() => {
                "storage is temporarily unavailable, try again later".to_string()
            }
            AppError::Shortener(ShortenerError::Store(_)) | AppError::InvalidLocation { .. } => {
                "internal server error".to_string()
            }
            AppError::Shortener(ShortenerError::Exhausted { .. }) => {
                "could not allocate a short code, try again".to_string()
            }
            AppError::Body(rejection) => rejection.body_text(),
            AppError::Shortener(err) => err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let kind = self.kind();

        match kind {
            ErrorKind::ServerError => {
                error!(status = status.as_u16(), error = %self, "request failed")
            }
            ErrorKind::ClientError => {
                debug!(status = status.as_u16(), error = %self, "request rejected")
            }
        }

        let body = ErrorResponse::new(kind, self.public_message());
        (status, Json(body)).into_response()
    }
}
