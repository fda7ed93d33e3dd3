//! Encrypt/decrypt requests.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Direction of a crypto operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CryptoMode {
    #[serde(rename = "simple-encrypt", alias = "encrypt")]
    Encrypt,
    #[serde(rename = "simple-decrypt", alias = "decrypt")]
    Decrypt,
}

impl CryptoMode {
    /// Mode name passed to an external engine process.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Encrypt => "simple-encrypt",
            Self::Decrypt => "simple-decrypt",
        }
    }

    /// Name of the payload field this mode reads from a request body.
    #[must_use]
    pub const fn payload_field(self) -> &'static str {
        match self {
            Self::Encrypt => "message",
            Self::Decrypt => "ciphertext",
        }
    }
}

impl fmt::Display for CryptoMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encrypt => f.write_str("encrypt"),
            Self::Decrypt => f.write_str("decrypt"),
        }
    }
}

impl FromStr for CryptoMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "simple-encrypt" | "encrypt" => Ok(Self::Encrypt),
            "simple-decrypt" | "decrypt" => Ok(Self::Decrypt),
            other => Err(Error::UnknownMode(other.to_string())),
        }
    }
}

/// A validated request for the crypto engine.
///
/// `payload` is plaintext for [`CryptoMode::Encrypt`] and ciphertext for
/// [`CryptoMode::Decrypt`]. Neither it nor the password is ever empty.
#[derive(Clone, PartialEq, Eq)]
pub struct CryptoRequest {
    mode: CryptoMode,
    password: String,
    payload: String,
}

impl CryptoRequest {
    /// Builds a request, rejecting an empty password or payload.
    pub fn new(
        mode: CryptoMode,
        password: impl Into<String>,
        payload: impl Into<String>,
    ) -> Result<Self> {
        let password = password.into();
        let payload = payload.into();
        if password.is_empty() {
            return Err(Error::EmptyPassword);
        }
        if payload.is_empty() {
            return Err(Error::MissingPayload {
                mode,
                field: mode.payload_field(),
            });
        }
        Ok(Self {
            mode,
            password,
            payload,
        })
    }

    pub fn encrypt(password: impl Into<String>, plaintext: impl Into<String>) -> Result<Self> {
        Self::new(CryptoMode::Encrypt, password, plaintext)
    }

    pub fn decrypt(password: impl Into<String>, ciphertext: impl Into<String>) -> Result<Self> {
        Self::new(CryptoMode::Decrypt, password, ciphertext)
    }

    #[must_use]
    pub const fn mode(&self) -> CryptoMode {
        self.mode
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    #[must_use]
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Argument bundle handed to an external engine: `{password, message}`
    /// for encrypt, `{password, ciphertext}` for decrypt.
    #[must_use]
    pub fn engine_args(&self) -> serde_json::Value {
        let mut args = serde_json::Map::new();
        args.insert("password".into(), self.password.clone().into());
        args.insert(self.mode.payload_field().into(), self.payload.clone().into());
        serde_json::Value::Object(args)
    }
}

impl fmt::Debug for CryptoRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoRequest")
            .field("mode", &self.mode)
            .field("password", &"[REDACTED]")
            .field("payload_len", &self.payload.len())
            .finish()
    }
}
