//! Crypto engines for CipherKeep.
//!
//! - [`CryptoEngine`]: the capability the router depends on
//! - [`SubprocessEngine`]: launches an external engine program per request
//!   and relays its standard output
//! - [`NativeEngine`]: the same job done in-process
//!
//! Both engines return a structured [`cipherkeep_types::EngineOutcome`];
//! infrastructure failures surface as [`EngineError`].

mod engine;
mod error;
pub mod native;
mod subprocess;

pub use engine::CryptoEngine;
pub use error::{EngineError, EngineResult};
pub use native::{KdfParams, NativeEngine};
pub use subprocess::{EngineConfig, SubprocessEngine};

/// Environment variables read by the `cipherkeep-engine` binary to override
/// Argon2id parameters. Encrypt and decrypt must see the same values.
pub mod env_keys {
    pub const KDF_MEMORY_KIB: &str = "CIPHERKEEP_KDF_MEMORY_KIB";
    pub const KDF_TIME_COST: &str = "CIPHERKEEP_KDF_TIME_COST";
}
