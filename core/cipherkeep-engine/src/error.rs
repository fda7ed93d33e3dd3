//! Error types for the engine layer.
//!
//! These are infrastructure failures only. An engine that ran and refused a
//! request (wrong password, tampered ciphertext) reports that through
//! [`cipherkeep_types::EngineOutcome::Failure`], not through this enum.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that prevent an engine from producing any outcome.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine executable could not be located or is not executable.
    #[error("engine executable unavailable: {program}")]
    Unavailable { program: PathBuf },

    /// The process could not be spawned or its output could not be read.
    #[error("failed to run engine {program}: {source}")]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The request itself was malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] cipherkeep_types::Error),

    /// Key derivation or cipher setup failed inside an in-process engine.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// Serialization error while building the argument bundle.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A background task running the engine panicked or was aborted.
    #[error("engine task failed: {0}")]
    Task(String),
}
