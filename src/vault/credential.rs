//! The `Credential` record stored inside a vault.
//!
//! Only the password is encrypted.  Name, login, and comment stay in
//! clear so queries can run without the passphrase.  The password
//! bytes use the base64 serde helpers from `format` so they show up
//! as a string in the records JSON.

use serde::{Deserialize, Serialize};

use super::format::{base64_decode, base64_encode};
use crate::errors::{CredVaultError, Result};

/// A single credential entry.
///
/// Equality is field-wise: two records with the same name, login,
/// ciphertext, and comment are the same credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// What the credential is for (e.g. "github").  Not unique.
    pub name: String,

    /// Account or user name, may be empty.
    pub login: String,

    /// The encrypted password (nonce + ciphertext + tag).
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub password: Vec<u8>,

    /// Free-text note, may be empty.
    pub comment: String,
}

impl Credential {
    /// Build a record from clear fields and an already-encrypted password.
    pub fn new(
        name: impl Into<String>,
        login: impl Into<String>,
        password: Vec<u8>,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            login: login.into(),
            password,
            comment: comment.into(),
        }
    }

    /// Reject records the store should never persist.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CredVaultError::Validation(
                "credential name cannot be empty".into(),
            ));
        }
        Ok(())
    }
}
