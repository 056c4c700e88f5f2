//! Sub-key derivation using HKDF-SHA256.
//!
//! One Argon2id master key is expanded into two independent values:
//! - the **field key** that encrypts password fields, and
//! - the **verifier** stored in the vault header so a later passphrase
//!   can be checked without keeping the passphrase anywhere.
//!
//! Knowing the verifier tells an attacker nothing about the field key:
//! both come from HKDF with distinct `info` strings.

use hkdf::Hkdf;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, Zeroizing};

use super::kdf::{derive_master_key_with_params, Argon2Params, KEY_LEN};
use crate::errors::{CredVaultError, Result};

/// HKDF context for the password-field encryption key.
const FIELD_KEY_INFO: &[u8] = b"credvault-field-key";

/// HKDF context for the passphrase verifier.
const VERIFIER_INFO: &[u8] = b"credvault-verifier";

/// Derive the field encryption key from a master key.
pub fn derive_field_key(master_key: &[u8]) -> Result<[u8; KEY_LEN]> {
    hkdf_derive(master_key, FIELD_KEY_INFO)
}

/// Derive the passphrase verifier from a master key.
pub fn derive_verifier(master_key: &[u8]) -> Result<[u8; KEY_LEN]> {
    hkdf_derive(master_key, VERIFIER_INFO)
}

/// Internal helper: run HKDF-SHA256 expand with the given `info`.
///
/// No extract salt: the master key already came out of Argon2id.
fn hkdf_derive(ikm: &[u8], info: &[u8]) -> Result<[u8; KEY_LEN]> {
    let hk = Hkdf::<Sha256>::new(None, ikm);

    let mut okm = [0u8; KEY_LEN];
    hk.expand(info, &mut okm)
        .map_err(|e| CredVaultError::KeyDerivationFailed(format!("HKDF expand failed: {e}")))?;

    Ok(okm)
}

/// A 32-byte field encryption key that zeroes its memory when dropped.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct FieldKey {
    bytes: [u8; KEY_LEN],
}

impl FieldKey {
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FieldKey([REDACTED])")
    }
}

/// Everything a passphrase + salt yields: the field key and the verifier.
pub struct DerivedKeys {
    pub field_key: FieldKey,
    pub verifier: Zeroizing<[u8; KEY_LEN]>,
}

/// Run the full derivation: Argon2id master key, then HKDF sub-keys.
///
/// The master key never leaves this function.
pub fn derive(passphrase: &[u8], salt: &[u8], params: &Argon2Params) -> Result<DerivedKeys> {
    let mut master = derive_master_key_with_params(passphrase, salt, params)?;

    let field = derive_field_key(&master);
    let verifier = derive_verifier(&master);
    master.zeroize();

    Ok(DerivedKeys {
        field_key: FieldKey::new(field?),
        verifier: Zeroizing::new(verifier?),
    })
}

/// Compare a freshly derived verifier to the stored one in constant time.
pub fn verify(candidate: &[u8], stored: &[u8]) -> bool {
    candidate.ct_eq(stored).into()
}
