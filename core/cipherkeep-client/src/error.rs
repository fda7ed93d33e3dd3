//! Client error types.

use thiserror::Error;

/// Result type for router calls.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors talking to the router.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The router answered with a non-success status.
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Text suitable for showing to the user: the router's own message when
    /// it sent one, `fallback` otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Rejected { message, .. } if !message.is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Rejected { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            ClientError::Config(_) => None,
        }
    }
}

/// Why a workflow stopped. The user has already been notified when one of
/// these is returned.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Required input was missing or no record was selected.
    #[error("{0}")]
    Input(&'static str),

    /// The router rejected or failed the request.
    #[error("{0}")]
    Request(#[from] ClientError),

    /// The engine refused the request (wrong password, tampered data).
    #[error("engine refused: {0}")]
    Refused(String),

    /// The engine answered with nothing.
    #[error("{0}")]
    EmptyResult(&'static str),

    /// The clipboard could not be written.
    #[error("clipboard: {0}")]
    Clipboard(String),
}
