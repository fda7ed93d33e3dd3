//! Structured result of a crypto engine call.
//!
//! External engines report semantic failures (wrong password, tampered
//! ciphertext) by printing a line that starts with [`ERROR_MARKER`]. That
//! convention is decoded into an [`EngineOutcome`] once, where the text first
//! enters the process, so nothing downstream has to inspect prefixes.
//!
//! A legitimate result that happens to begin with the marker cannot be told
//! apart from a failure. Engines that hex- or base64-encode their ciphertext
//! never hit this on encrypt; decrypted plaintext can.

use serde::{Deserialize, Serialize};

/// Prefix an engine prints in front of a human-readable failure reason.
pub const ERROR_MARKER: &str = "ERROR:";

/// What the engine produced for a single request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum EngineOutcome {
    /// Ciphertext for encrypt, plaintext for decrypt.
    Success(String),
    /// The engine ran and rejected the request.
    Failure(String),
}

impl EngineOutcome {
    /// Decodes engine output text.
    #[must_use]
    pub fn from_wire(text: &str) -> Self {
        match text.strip_prefix(ERROR_MARKER) {
            Some(reason) => Self::Failure(reason.trim().to_string()),
            None => Self::Success(text.to_string()),
        }
    }

    /// Encodes the outcome back into the engine's text convention.
    #[must_use]
    pub fn to_wire(&self) -> String {
        match self {
            Self::Success(text) => text.clone(),
            Self::Failure(reason) => format!("{ERROR_MARKER} {reason}"),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Converts into a `Result`, with the failure reason as the error.
    pub fn into_result(self) -> Result<String, String> {
        match self {
            Self::Success(text) => Ok(text),
            Self::Failure(reason) => Err(reason),
        }
    }
}
