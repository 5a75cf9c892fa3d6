//! Error types for beatshelf

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::importer::ImportError;
use crate::services::osu_client::OsuError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Import pipeline failure (status depends on the failing stage)
    #[error(transparent)]
    Import(#[from] ImportError),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Import(err) => (import_status(err), err.to_string()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            ApiError::Other(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };

        if status.is_server_error() {
            tracing::error!(status = %status, "{}", message);
        }

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// Upstream osu! API failures surface as 502; everything else is 500.
fn import_status(err: &ImportError) -> StatusCode {
    match err {
        ImportError::Osu(OsuError::Token(_)) | ImportError::Osu(OsuError::Search(_)) => {
            StatusCode::BAD_GATEWAY
        }
        ImportError::Osu(OsuError::Credentials(_)) | ImportError::Osu(OsuError::Client(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        ImportError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
