//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cipherkeep_engine::EngineError;
use cipherkeep_store::StoreError;
use tracing::{debug, error};

/// Failure of a router operation, rendered as a status code plus a short
/// text body.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed request fields (400).
    Validation(&'static str),
    /// Duplicate label (409).
    Conflict(&'static str),
    /// Unknown label or absent store (404).
    NotFound(&'static str),
    /// Engine or storage failure (500). `detail` is logged, never sent.
    Infrastructure {
        message: &'static str,
        detail: String,
    },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Infrastructure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ApiError::Validation(m) | ApiError::Conflict(m) | ApiError::NotFound(m) => m,
            ApiError::Infrastructure { message, .. } => message,
        }
    }

    pub(crate) fn server(detail: impl Into<String>) -> Self {
        ApiError::Infrastructure {
            message: "Server error.",
            detail: detail.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        if !err.is_client_error() {
            return ApiError::server(err.to_string());
        }
        debug!("store refused request: {err}");
        match err {
            StoreError::Conflict(_) => ApiError::Conflict("Label already exists."),
            StoreError::Missing(_) => ApiError::NotFound("Data file not found."),
            _ => ApiError::NotFound("Label not found."),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidRequest(_) => ApiError::Validation("Missing required fields"),
            unavailable @ EngineError::Unavailable { .. } => ApiError::Infrastructure {
                message: "Crypto engine not found",
                detail: unavailable.to_string(),
            },
            other => ApiError::Infrastructure {
                message: "Crypto engine failed",
                detail: other.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Infrastructure { detail, .. } = &self {
            error!("{detail}");
        }
        (self.status(), self.message()).into_response()
    }
}
