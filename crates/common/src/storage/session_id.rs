//! Opaque session identifiers

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::error::StoreError;

/// Length of a rendered session id (hex-encoded SHA-256).
pub const SESSION_ID_LEN: usize = 64;

/// Unguessable identifier naming one end user's subtree in the store
///
/// Generated as the hex SHA-256 digest of a random UUIDv4.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh random session id.
    #[must_use]
    pub fn generate() -> Self {
        let digest = Sha256::digest(Uuid::new_v4().as_bytes());
        Self(hex::encode(digest))
    }

    /// Parse an id received from a client (e.g. from a cookie).
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidSessionId`] unless the input is exactly
    /// 64 lowercase hex characters.
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        let well_formed = raw.len() == SESSION_ID_LEN
            && raw.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));

        if well_formed {
            Ok(Self(raw.to_string()))
        } else {
            Err(StoreError::InvalidSessionId(raw.chars().take(16).collect()))
        }
    }

    /// The id as a hex string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
