//! High-level vault operations used by CLI commands.
//!
//! `Vault` wraps the binary format layer and the crypto layer so the
//! rest of the application works with calls like
//! `vault.add(Credential::new(..))` or `vault.credential("github", None)`.
//!
//! A vault opened from disk is **locked**: records are readable and
//! queryable, but passwords stay ciphertext.  `unlock` (or `create`)
//! keeps the field key in memory for `encrypt`/`reveal` until the handle
//! is dropped or `lock` is called.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use zeroize::Zeroize;

use crate::crypto::encryption;
use crate::crypto::kdf::{generate_salt, Argon2Params};
use crate::crypto::keys::{self, DerivedKeys, FieldKey};
use crate::errors::{CredVaultError, Result};

use super::credential::Credential;
use super::format::{self, VaultHeader, CURRENT_VERSION};
use super::query;

/// The main vault handle.  Create one with `Vault::create` or
/// `Vault::open`.
pub struct Vault {
    /// The vault directory.
    dir: PathBuf,

    /// The store file inside `dir`.
    file: PathBuf,

    /// Salt, verifier, and KDF params.  Fixed after `create`.
    header: VaultHeader,

    /// Records in insertion order; passwords are ciphertext.
    records: Vec<Credential>,

    /// Present only while unlocked (zeroized on drop).
    field_key: Option<FieldKey>,
}

impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault")
            .field("dir", &self.dir)
            .field("records", &self.records.len())
            .field("unlocked", &self.field_key.is_some())
            .finish()
    }
}

impl Vault {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create a brand-new vault in directory `path`.
    ///
    /// Generates a random salt, derives the field key and verifier from
    /// the passphrase, and writes an empty record list to disk.  The
    /// returned handle is already unlocked.
    ///
    /// Pass `None` for `argon2_params` to use the defaults.
    pub fn create(path: &Path, passphrase: &[u8], argon2_params: Option<&Argon2Params>) -> Result<Self> {
        let file = format::vault_file(path);
        if file.exists() {
            return Err(CredVaultError::VaultAlreadyExists(path.to_path_buf()));
        }

        fs::create_dir_all(path)?;

        let salt = generate_salt();
        let params = argon2_params.copied().unwrap_or_default();
        let DerivedKeys {
            field_key,
            verifier,
        } = keys::derive(passphrase, &salt, &params)?;

        let header = VaultHeader {
            version: CURRENT_VERSION,
            salt: salt.to_vec(),
            verifier: verifier.to_vec(),
            created_at: Utc::now(),
            argon2_params: params,
        };

        let vault = Self {
            dir: path.to_path_buf(),
            file,
            header,
            records: Vec::new(),
            field_key: Some(field_key),
        };
        vault.save()?;

        info!(path = %path.display(), "vault created");
        Ok(vault)
    }

    /// Open an existing vault without any passphrase.
    ///
    /// Fails with `VaultNotFound` when the directory holds no store
    /// file, and with `InvalidVaultFormat`/`ChecksumMismatch` when the
    /// file is damaged.
    pub fn open(path: &Path) -> Result<Self> {
        let file = format::vault_file(path);
        if !file.exists() {
            return Err(CredVaultError::VaultNotFound(path.to_path_buf()));
        }

        let raw = format::read_vault(&file)?;
        debug!(path = %path.display(), records = raw.records.len(), "vault opened");

        Ok(Self {
            dir: path.to_path_buf(),
            file,
            header: raw.header,
            records: raw.records,
            field_key: None,
        })
    }

    // ------------------------------------------------------------------
    // Passphrase handling
    // ------------------------------------------------------------------

    /// Is `passphrase` the one this vault was created with?
    ///
    /// Never errors: a KDF failure is logged and reported as `false`.
    pub fn check(&self, passphrase: &[u8]) -> bool {
        match self.derive(passphrase) {
            Ok(derived) => keys::verify(derived.verifier.as_slice(), &self.header.verifier),
            Err(e) => {
                warn!(error = %e, "passphrase check could not derive keys");
                false
            }
        }
    }

    /// Verify `passphrase` and keep the field key for later `encrypt`
    /// and `reveal` calls.
    pub fn unlock(&mut self, passphrase: &[u8]) -> Result<()> {
        let derived = self.derive(passphrase)?;
        if !keys::verify(derived.verifier.as_slice(), &self.header.verifier) {
            return Err(CredVaultError::DecryptionFailed);
        }
        self.field_key = Some(derived.field_key);
        debug!("vault unlocked");
        Ok(())
    }

    /// Drop the in-memory field key.
    pub fn lock(&mut self) {
        self.field_key = None;
    }

    /// Returns `true` while a field key is held.
    pub fn is_unlocked(&self) -> bool {
        self.field_key.is_some()
    }

    // ------------------------------------------------------------------
    // Field encryption
    // ------------------------------------------------------------------

    /// Encrypt a plaintext password with the unlocked field key.
    pub fn encrypt(&self, plaintext: &str) -> Result<Vec<u8>> {
        let key = self.field_key.as_ref().ok_or(CredVaultError::VaultLocked)?;
        encryption::encrypt(key.as_bytes(), plaintext.as_bytes())
    }

    /// Decrypt a password field with a key derived from `passphrase`.
    ///
    /// Works on a locked vault.  A wrong passphrase fails the GCM tag
    /// check and returns `DecryptionFailed`.
    pub fn decrypt(&self, ciphertext: &[u8], passphrase: &[u8]) -> Result<String> {
        let derived = self.derive(passphrase)?;
        let plaintext = encryption::decrypt(derived.field_key.as_bytes(), ciphertext)?;
        into_utf8(plaintext)
    }

    /// Decrypt a password field with the unlocked field key.
    pub fn reveal(&self, ciphertext: &[u8]) -> Result<String> {
        let key = self.field_key.as_ref().ok_or(CredVaultError::VaultLocked)?;
        let plaintext = encryption::decrypt(key.as_bytes(), ciphertext)?;
        into_utf8(plaintext)
    }

    fn derive(&self, passphrase: &[u8]) -> Result<DerivedKeys> {
        keys::derive(passphrase, &self.header.salt, &self.header.argon2_params)
    }

    // ------------------------------------------------------------------
    // Record operations
    // ------------------------------------------------------------------

    /// Append a record and persist the whole collection.
    ///
    /// If the write fails the in-memory list is left as it was.
    pub fn add(&mut self, credential: Credential) -> Result<()> {
        credential.validate()?;

        let mut next = self.records.clone();
        next.push(credential);
        self.commit(next)?;

        info!(records = self.records.len(), "credential added");
        Ok(())
    }

    /// Remove every record matching `predicate` in one persisted write.
    ///
    /// Returns how many records were removed.  Nothing is written when
    /// nothing matches.
    pub fn remove<P>(&mut self, mut predicate: P) -> Result<usize>
    where
        P: FnMut(&Credential) -> bool,
    {
        let (removed, kept): (Vec<Credential>, Vec<Credential>) =
            self.records.iter().cloned().partition(|c| predicate(c));

        if removed.is_empty() {
            return Ok(0);
        }

        self.commit(kept)?;
        info!(removed = removed.len(), "credentials removed");
        Ok(removed.len())
    }

    /// Replace the records matching `predicate` with `credential`.
    ///
    /// Removal and append land in the same atomic write, so no reader
    /// ever sees the record missing.  Returns how many records were
    /// replaced; with zero matches nothing is written.
    pub fn update<P>(&mut self, mut predicate: P, credential: Credential) -> Result<usize>
    where
        P: FnMut(&Credential) -> bool,
    {
        credential.validate()?;

        let (removed, mut kept): (Vec<Credential>, Vec<Credential>) =
            self.records.iter().cloned().partition(|c| predicate(c));

        if removed.is_empty() {
            return Ok(0);
        }

        kept.push(credential);
        self.commit(kept)?;
        info!(replaced = removed.len(), "credential updated");
        Ok(removed.len())
    }

    /// All records, in insertion order.
    pub fn credentials(&self) -> &[Credential] {
        &self.records
    }

    /// Records with an exact name (and login, when given).
    pub fn credential(&self, name: &str, login: Option<&str>) -> Vec<&Credential> {
        query::filter(&self.records, name, login)
    }

    /// Records whose name, login, or comment contains `pattern`.
    pub fn search(&self, pattern: &str) -> Vec<&Credential> {
        query::search(&self.records, pattern)
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Write the current state to disk atomically.
    pub fn save(&self) -> Result<()> {
        format::write_vault(&self.file, &self.header, &self.records)
    }

    /// Persist `next` first, then make it the in-memory state.
    fn commit(&mut self, next: Vec<Credential>) -> Result<()> {
        format::write_vault(&self.file, &self.header, &next)?;
        self.records = next;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the vault directory.
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Returns the store file inside the vault directory.
    pub fn file_path(&self) -> &Path {
        &self.file
    }

    pub fn header(&self) -> &VaultHeader {
        &self.header
    }

    pub fn salt(&self) -> &[u8] {
        &self.header.salt
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.header.created_at
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Convert decrypted bytes to a `String`, wiping them if they are not UTF-8.
fn into_utf8(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| {
        let mut bad_bytes = e.into_bytes();
        bad_bytes.zeroize();
        CredVaultError::SerializationError("password is not valid UTF-8".to_string())
    })
}
