//! In-process engine: Argon2id key derivation + ChaCha20-Poly1305.
//!
//! Also backs the `cipherkeep-engine` binary, which exposes the same
//! transformation through the external process contract.

mod cipher;
mod key;

pub use cipher::{open, seal, OpenError, NONCE_SIZE, TAG_SIZE};
pub use key::{KdfParams, KEY_SIZE, SALT_SIZE};

use async_trait::async_trait;
use cipherkeep_types::{CryptoMode, CryptoRequest, EngineOutcome};

use crate::engine::CryptoEngine;
use crate::error::{EngineError, EngineResult};

/// Engine that runs the cipher inside the server process.
#[derive(Debug, Clone, Default)]
pub struct NativeEngine {
    params: KdfParams,
}

impl NativeEngine {
    pub fn new(params: KdfParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &KdfParams {
        &self.params
    }

    /// Executes a request on the current thread. Key derivation is
    /// deliberately slow; async callers should go through [`CryptoEngine::run`].
    pub fn run_blocking(&self, request: &CryptoRequest) -> EngineResult<EngineOutcome> {
        match request.mode() {
            CryptoMode::Encrypt => {
                seal(request.password(), request.payload(), &self.params).map(EngineOutcome::Success)
            }
            CryptoMode::Decrypt => Ok(
                match open(request.password(), request.payload(), &self.params)? {
                    Ok(plaintext) => EngineOutcome::Success(plaintext),
                    Err(reason) => EngineOutcome::Failure(reason.to_string()),
                },
            ),
        }
    }
}

#[async_trait]
impl CryptoEngine for NativeEngine {
    fn name(&self) -> &'static str {
        "native"
    }

    async fn run(&self, request: &CryptoRequest) -> EngineResult<EngineOutcome> {
        let engine = self.clone();
        let request = request.clone();
        tokio::task::spawn_blocking(move || engine.run_blocking(&request))
            .await
            .map_err(|e| EngineError::Task(e.to_string()))?
    }
}
