//! The content identifier of a canonical preview.

use crate::error::IdentifierError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Length of a hex-encoded SHA-256 digest
pub const HOTHASH_LEN: usize = 64;

/// SHA-256 of a canonical preview's bytes, as 64 lowercase hex characters.
///
/// Only constructed by hashing or by validated parsing, so every value is
/// well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hothash(String);

impl Hothash {
    /// Hash preview bytes.
    pub fn of(bytes: &[u8]) -> Self {
        Self(format!("{:x}", Sha256::digest(bytes)))
    }

    /// Parse and validate a hex identifier.
    pub fn parse(text: &str) -> Result<Self, IdentifierError> {
        if text.len() != HOTHASH_LEN {
            return Err(IdentifierError::InvalidLength { length: text.len() });
        }
        if let Some(found) = text
            .chars()
            .find(|c| !matches!(c, '0'..='9' | 'a'..='f'))
        {
            return Err(IdentifierError::InvalidCharacter { found });
        }
        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First `len` characters, for compact display
    pub fn short(&self, len: usize) -> &str {
        &self.0[..len.min(HOTHASH_LEN)]
    }
}

impl fmt::Display for Hothash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Hothash {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Hothash {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Hothash> for String {
    fn from(hash: Hothash) -> Self {
        hash.0
    }
}

impl AsRef<str> for Hothash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
