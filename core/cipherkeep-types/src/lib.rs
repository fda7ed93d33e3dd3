//! Core type definitions for CipherKeep.
//!
//! This crate defines the plain data shared by every other crate in the
//! workspace:
//! - Labels and the `{label, cipher}` records kept in the store
//! - Encrypt/decrypt requests handed to a crypto engine
//! - The structured outcome of an engine call, and the `ERROR:` text
//!   convention it is encoded as on the wire
//!
//! Nothing here performs I/O.

mod outcome;
mod record;
mod request;

pub use outcome::{EngineOutcome, ERROR_MARKER};
pub use record::{CipherRecord, Label};
pub use request::{CryptoMode, CryptoRequest};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when constructing core types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("label must not be empty")]
    EmptyLabel,

    #[error("cipher must not be empty")]
    EmptyCipher,

    #[error("password must not be empty")]
    EmptyPassword,

    #[error("{mode} request is missing its {field}")]
    MissingPayload { mode: CryptoMode, field: &'static str },

    #[error("unknown crypto mode: {0}")]
    UnknownMode(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
