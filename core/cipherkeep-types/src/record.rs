//! Labelled ciphertext records.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

/// User-chosen identifier of a stored ciphertext.
///
/// Never empty. Equality is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Label(String);

impl Label {
    /// Creates a label, rejecting the empty string.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(Error::EmptyLabel);
        }
        Ok(Self(value))
    }

    /// Returns the label text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Label {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.0
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Label {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A ciphertext saved under a label.
///
/// The cipher is opaque: whatever text the engine produced for an encrypt
/// call is stored byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherRecord {
    pub label: Label,
    pub cipher: String,
}

impl CipherRecord {
    /// Builds a record, rejecting an empty label or cipher.
    pub fn new(label: impl Into<String>, cipher: impl Into<String>) -> Result<Self> {
        let label = Label::new(label)?;
        let cipher = cipher.into();
        if cipher.is_empty() {
            return Err(Error::EmptyCipher);
        }
        Ok(Self { label, cipher })
    }
}
