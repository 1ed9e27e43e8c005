//! Mapping of document errors onto HTTP responses.
//!
//! Clients only ever see a status code and one of a few fixed messages. The
//! underlying error, with its paths and OS messages, is logged here.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mdocs_protocol::ErrorBody;
use thiserror::Error;

use crate::docs::{DocsError, ResolveError};

/// Client-facing API error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Malformed or traversal-like document name.
    #[error("Invalid filename")]
    InvalidName,

    /// Name resolves outside the docs directory.
    #[error("Access denied")]
    AccessDenied,

    /// No such document.
    #[error("Documentation not found")]
    NotFound,

    /// The docs directory could not be listed.
    #[error("Failed to load documentation list")]
    ListFailed,

    /// A document could not be read.
    #[error("Failed to load documentation")]
    LoadFailed,
}

impl ApiError {
    /// Convert a listing failure, logging the cause.
    pub fn from_list(err: DocsError) -> Self {
        tracing::error!("Error reading docs directory: {}", err);
        ApiError::ListFailed
    }

    /// Convert a document failure, logging the cause.
    pub fn from_load(err: DocsError) -> Self {
        match err {
            DocsError::Resolve(ResolveError::InvalidName(name)) => {
                tracing::warn!("Rejected document name {:?}", name);
                ApiError::InvalidName
            }
            DocsError::Resolve(ResolveError::AccessDenied(path)) => {
                tracing::warn!("Denied access to {:?}", path);
                ApiError::AccessDenied
            }
            DocsError::NotFound(path) => {
                tracing::debug!("Document not found: {:?}", path);
                ApiError::NotFound
            }
            err @ DocsError::Io { .. } => {
                tracing::error!("Error reading documentation file: {}", err);
                ApiError::LoadFailed
            }
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidName => StatusCode::BAD_REQUEST,
            ApiError::AccessDenied => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::ListFailed | ApiError::LoadFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorBody::new(self.to_string()))).into_response()
    }
}
