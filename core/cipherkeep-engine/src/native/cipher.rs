//! Sealed-message encoding using ChaCha20-Poly1305.
//!
//! A sealed message is lowercase hex of `salt || nonce || ciphertext+tag`.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use rand::RngCore;

use super::key::{derive_key, random_salt, KdfParams, SALT_SIZE};
use crate::error::{EngineError, EngineResult};

/// Size of nonce in bytes (96 bits for ChaCha20-Poly1305).
pub const NONCE_SIZE: usize = 12;

/// Size of authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// Why a sealed message could not be opened. These are reported to the
/// user, not treated as infrastructure failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OpenError {
    #[error("Ciphertext is not valid hex")]
    NotHex,
    #[error("Ciphertext too short")]
    TooShort,
    #[error("Decryption failed (wrong password or tampered data)")]
    Rejected,
    #[error("Decrypted text is not valid UTF-8")]
    NotUtf8,
}

/// Encrypts `plaintext` under a key derived from `password` and a fresh salt.
pub fn seal(password: &str, plaintext: &str, params: &KdfParams) -> EngineResult<String> {
    let salt = random_salt();
    let key = derive_key(password, &salt, params)?;
    let cipher = ChaCha20Poly1305::new(key.as_bytes().into());

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|e| EngineError::Crypto(format!("encryption: {e}")))?;

    let mut sealed = Vec::with_capacity(SALT_SIZE + NONCE_SIZE + ciphertext.len());
    sealed.extend_from_slice(&salt);
    sealed.extend_from_slice(&nonce_bytes);
    sealed.extend_from_slice(&ciphertext);
    Ok(hex::encode(sealed))
}

/// Opens a message produced by [`seal`].
///
/// The outer `Result` carries infrastructure failures (KDF setup); the inner
/// one carries reasons the message itself was refused.
pub fn open(
    password: &str,
    sealed_hex: &str,
    params: &KdfParams,
) -> EngineResult<Result<String, OpenError>> {
    let Ok(bytes) = hex::decode(sealed_hex.trim()) else {
        return Ok(Err(OpenError::NotHex));
    };
    if bytes.len() < SALT_SIZE + NONCE_SIZE + TAG_SIZE {
        return Ok(Err(OpenError::TooShort));
    }

    let (salt, rest) = bytes.split_at(SALT_SIZE);
    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_SIZE);

    let key = derive_key(password, salt, params)?;
    let cipher = ChaCha20Poly1305::new(key.as_bytes().into());
    let Ok(plaintext) = cipher.decrypt(Nonce::from_slice(nonce_bytes), ciphertext) else {
        return Ok(Err(OpenError::Rejected));
    };

    Ok(String::from_utf8(plaintext).map_err(|_| OpenError::NotUtf8))
}
