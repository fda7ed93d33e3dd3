//! Engine capability interface.
//!
//! The router depends on `Arc<dyn CryptoEngine>` and never learns whether
//! requests are served in-process or by spawning an external program.

use async_trait::async_trait;
use cipherkeep_types::{CryptoRequest, EngineOutcome};

use crate::error::EngineResult;

/// Something that can encrypt and decrypt short text under a password.
#[async_trait]
pub trait CryptoEngine: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Executes a validated request.
    ///
    /// `Ok(EngineOutcome::Failure(..))` means the engine ran and refused;
    /// `Err(..)` means it could not run at all.
    async fn run(&self, request: &CryptoRequest) -> EngineResult<EngineOutcome>;

    /// Executes a request and returns the engine's text as produced,
    /// failure marker included. Engines that speak the text convention
    /// natively return it untouched; others render their outcome into it.
    async fn run_text(&self, request: &CryptoRequest) -> EngineResult<String> {
        Ok(self.run(request).await?.to_wire())
    }

    /// Encrypts `plaintext`, yielding ciphertext text on success.
    async fn encrypt(&self, password: &str, plaintext: &str) -> EngineResult<EngineOutcome> {
        let request = CryptoRequest::encrypt(password, plaintext)?;
        self.run(&request).await
    }

    /// Decrypts `ciphertext`, yielding plaintext on success.
    async fn decrypt(&self, password: &str, ciphertext: &str) -> EngineResult<EngineOutcome> {
        let request = CryptoRequest::decrypt(password, ciphertext)?;
        self.run(&request).await
    }
}
