//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use thiserror::Error;
use ytstream_core::{MediaKind, YtStreamError};

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

/// An error rendered as `{"detail": ...}` with a status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }

    /// Map a relay failure for `kind` onto 404, 400 or 500
    pub fn from_relay(kind: MediaKind, err: YtStreamError) -> Self {
        match err {
            YtStreamError::NotFound(_) => Self::not_found(err.to_string()),
            YtStreamError::InvalidUrl(_) => Self::bad_request(err.to_string()),
            other => {
                let action = match kind {
                    MediaKind::Video => "Error streaming video",
                    MediaKind::Audio => "Error downloading audio",
                };
                Self::internal(format!("{}: {}", action, other))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ytstream_core::error::ConfigError),
}
