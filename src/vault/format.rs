//! Binary vault file format and checksum verification.
//!
//! A `credentials.vault` file has this layout:
//!
//! ```text
//! [CVLT: 4 bytes][version: 1 byte][header_len: 4 bytes LE][header JSON][records JSON][SHA-256: 32 bytes]
//! ```
//!
//! - **Magic** (`CVLT`): identifies the file as a CredVault store.
//! - **Version**: format version (currently `1`).
//! - **Header length**: little-endian u32 telling us where the header
//!   JSON ends and the records JSON begins.
//! - **Header JSON**: serialized `VaultHeader` (salt, verifier, KDF params).
//! - **Records JSON**: serialized `Vec<Credential>`, insertion order.
//! - **SHA-256**: 32-byte digest over header + records bytes.
//!
//! The trailing digest is unkeyed on purpose: `open` runs without the
//! passphrase and must still tell a corrupted file apart from a wrong
//! passphrase.  Password confidentiality and tamper detection come from
//! the per-field GCM tags.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::debug;

use super::credential::Credential;
use crate::crypto::kdf::{Argon2Params, KEY_LEN, SALT_LEN};
use crate::errors::{CredVaultError, Result};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic bytes at the start of every vault file.
const MAGIC: &[u8; 4] = b"CVLT";

/// Current binary format version.
pub const CURRENT_VERSION: u8 = 1;

/// Size of the checksum appended to the file (SHA-256 = 32 bytes).
const CHECKSUM_LEN: usize = 32;

/// Fixed-size prefix: 4 (magic) + 1 (version) + 4 (header_len).
const PREFIX_LEN: usize = 9;

/// Name of the store file inside a vault directory.
pub const VAULT_FILE_NAME: &str = "credentials.vault";

// ---------------------------------------------------------------------------
// VaultHeader
// ---------------------------------------------------------------------------

/// Metadata stored at the beginning of a vault file.
///
/// Written once by `create` and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultHeader {
    /// Format version.
    pub version: u8,

    /// The salt used for Argon2id key derivation (base64 in JSON).
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub salt: Vec<u8>,

    /// HKDF-derived passphrase verifier (base64 in JSON).
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub verifier: Vec<u8>,

    /// When this vault was first created.
    pub created_at: DateTime<Utc>,

    /// Argon2 params used at vault creation.
    pub argon2_params: Argon2Params,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Location of the store file for a vault directory.
pub fn vault_file(dir: &Path) -> PathBuf {
    dir.join(VAULT_FILE_NAME)
}

/// Location of the staging file used during an atomic write.
pub fn staging_file(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or(Path::new("."));
    parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ))
}

/// Encode header + records into the full binary envelope.
pub fn encode_vault(header: &VaultHeader, records: &[Credential]) -> Result<Vec<u8>> {
    let header_bytes = serde_json::to_vec(header)
        .map_err(|e| CredVaultError::SerializationError(format!("header: {e}")))?;
    let records_bytes = serde_json::to_vec(records)
        .map_err(|e| CredVaultError::SerializationError(format!("records: {e}")))?;

    let header_len = u32::try_from(header_bytes.len()).map_err(|_| {
        CredVaultError::SerializationError(format!(
            "header length {} exceeds u32::MAX",
            header_bytes.len()
        ))
    })?;

    let checksum = compute_checksum(&header_bytes, &records_bytes);

    let total = PREFIX_LEN + header_bytes.len() + records_bytes.len() + CHECKSUM_LEN;
    let mut buf = Vec::with_capacity(total);
    buf.extend_from_slice(MAGIC); // 4 bytes
    buf.push(CURRENT_VERSION); // 1 byte
    buf.extend_from_slice(&header_len.to_le_bytes()); // 4 bytes LE
    buf.extend_from_slice(&header_bytes);
    buf.extend_from_slice(&records_bytes);
    buf.extend_from_slice(&checksum); // 32 bytes
    Ok(buf)
}

/// First half of an atomic write: put the new state in the staging file
/// and flush it to disk.  The live vault file is not touched.
///
/// Returns the staging path to hand to `commit_staged`.
pub fn stage_vault(path: &Path, header: &VaultHeader, records: &[Credential]) -> Result<PathBuf> {
    let buf = encode_vault(header, records)?;
    let tmp_path = staging_file(path);

    let written = create_private(&tmp_path).and_then(|mut file| {
        file.write_all(&buf)?;
        file.sync_all()?;
        Ok(())
    });
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    Ok(tmp_path)
}

/// Second half of an atomic write: rename the staging file over the
/// target.  Same directory, so the rename is atomic.
pub fn commit_staged(tmp_path: &Path, path: &Path) -> Result<()> {
    fs::rename(tmp_path, path)?;
    Ok(())
}

/// Write a vault file to disk **atomically** (stage, then rename).
///
/// Readers see either the old file or the new one, never a mix.
pub fn write_vault(path: &Path, header: &VaultHeader, records: &[Credential]) -> Result<()> {
    let tmp_path = stage_vault(path, header, records)?;
    if let Err(e) = commit_staged(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    debug!(path = %path.display(), records = records.len(), "vault written");
    Ok(())
}

/// Contents of a vault file after checksum verification.
#[derive(Debug)]
pub struct RawVault {
    pub header: VaultHeader,
    pub records: Vec<Credential>,
}

/// Read and verify a vault file.
///
/// Every structural problem maps to `InvalidVaultFormat` or
/// `ChecksumMismatch`, never to a crypto error.
pub fn read_vault(path: &Path) -> Result<RawVault> {
    if !path.exists() {
        return Err(CredVaultError::VaultNotFound(path.to_path_buf()));
    }

    let data = fs::read(path)?;
    decode_vault(&data)
}

/// Parse and verify a vault envelope held in memory.
pub fn decode_vault(data: &[u8]) -> Result<RawVault> {
    if data.len() < PREFIX_LEN + CHECKSUM_LEN {
        return Err(CredVaultError::InvalidVaultFormat(
            "file too small to be a valid vault".into(),
        ));
    }

    if &data[0..4] != MAGIC {
        return Err(CredVaultError::InvalidVaultFormat(
            "missing CVLT magic bytes".into(),
        ));
    }

    let version = data[4];
    if version != CURRENT_VERSION {
        return Err(CredVaultError::InvalidVaultFormat(format!(
            "unsupported version {version}, expected {CURRENT_VERSION}"
        )));
    }

    let header_len_u32 = u32::from_le_bytes(
        data[5..9]
            .try_into()
            .map_err(|_| CredVaultError::InvalidVaultFormat("bad header length".into()))?,
    );
    let header_len = usize::try_from(header_len_u32).map_err(|_| {
        CredVaultError::InvalidVaultFormat(format!(
            "header length {header_len_u32} exceeds platform address space"
        ))
    })?;

    let header_end = PREFIX_LEN
        .checked_add(header_len)
        .filter(|end| {
            end.checked_add(CHECKSUM_LEN)
                .map_or(false, |min_len| min_len <= data.len())
        })
        .ok_or_else(|| {
            CredVaultError::InvalidVaultFormat("header length exceeds file size".into())
        })?;

    let header_bytes = &data[PREFIX_LEN..header_end];
    let records_end = data.len() - CHECKSUM_LEN;
    let records_bytes = &data[header_end..records_end];
    let stored_checksum = &data[records_end..];

    verify_checksum(header_bytes, records_bytes, stored_checksum)?;

    let header: VaultHeader = serde_json::from_slice(header_bytes)
        .map_err(|e| CredVaultError::InvalidVaultFormat(format!("header JSON: {e}")))?;
    validate_header(&header, version)?;

    let records: Vec<Credential> = serde_json::from_slice(records_bytes)
        .map_err(|e| CredVaultError::InvalidVaultFormat(format!("records JSON: {e}")))?;

    Ok(RawVault { header, records })
}

/// Reject headers that parse but could never verify a passphrase.
fn validate_header(header: &VaultHeader, version: u8) -> Result<()> {
    if header.version != version {
        return Err(CredVaultError::InvalidVaultFormat(format!(
            "header version {} does not match file version {version}",
            header.version
        )));
    }
    if header.salt.len() != SALT_LEN {
        return Err(CredVaultError::InvalidVaultFormat(format!(
            "salt is {} bytes, expected {SALT_LEN}",
            header.salt.len()
        )));
    }
    if header.verifier.len() != KEY_LEN {
        return Err(CredVaultError::InvalidVaultFormat(format!(
            "verifier is {} bytes, expected {KEY_LEN}",
            header.verifier.len()
        )));
    }
    header
        .argon2_params
        .validate()
        .map_err(CredVaultError::InvalidVaultFormat)
}

/// Compute SHA-256 over header + records bytes.
pub fn compute_checksum(header_bytes: &[u8], records_bytes: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(header_bytes);
    hasher.update(records_bytes);
    hasher.finalize().into()
}

fn verify_checksum(header_bytes: &[u8], records_bytes: &[u8], expected: &[u8]) -> Result<()> {
    let actual = compute_checksum(header_bytes, records_bytes);
    if actual.as_slice().ct_eq(expected).into() {
        Ok(())
    } else {
        Err(CredVaultError::ChecksumMismatch)
    }
}

/// Create (or truncate) a file readable only by the owner.
fn create_private(path: &Path) -> Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    Ok(options.open(path)?)
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

pub(crate) fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let encoded = BASE64.encode(data);
    serializer.serialize_str(&encoded)
}

pub(crate) fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> VaultHeader {
        VaultHeader {
            version: CURRENT_VERSION,
            salt: vec![1u8; 32],
            verifier: vec![2u8; 32],
            created_at: Utc::now(),
            argon2_params: Argon2Params::default(),
        }
    }

    fn sample_records() -> Vec<Credential> {
        vec![
            Credential::new("github", "alice", vec![9, 9, 9], "work"),
            Credential::new("github", "bob", vec![8, 8], ""),
        ]
    }

    #[test]
    fn decode_returns_what_was_encoded() {
        let header = sample_header();
        let records = sample_records();
        let buf = encode_vault(&header, &records).unwrap();

        let raw = decode_vault(&buf).unwrap();
        assert_eq!(raw.header, header);
        assert_eq!(raw.records, records);
    }

    #[test]
    fn flipped_byte_is_a_checksum_mismatch() {
        let mut buf = encode_vault(&sample_header(), &sample_records()).unwrap();
        let mid = buf.len() / 2;
        buf[mid] ^= 0xFF;
        assert!(matches!(
            decode_vault(&buf),
            Err(CredVaultError::ChecksumMismatch)
        ));
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let mut buf = encode_vault(&sample_header(), &[]).unwrap();
        buf[0] = b'X';
        assert!(matches!(
            decode_vault(&buf),
            Err(CredVaultError::InvalidVaultFormat(_))
        ));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let mut buf = encode_vault(&sample_header(), &[]).unwrap();
        buf[4] = 99;
        assert!(matches!(
            decode_vault(&buf),
            Err(CredVaultError::InvalidVaultFormat(_))
        ));
    }

    #[test]
    fn oversized_header_length_is_rejected() {
        let mut buf = encode_vault(&sample_header(), &[]).unwrap();
        buf[5..9].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            decode_vault(&buf),
            Err(CredVaultError::InvalidVaultFormat(_))
        ));
    }

    #[test]
    fn truncated_file_is_rejected() {
        assert!(matches!(
            decode_vault(b"CVLT\x01"),
            Err(CredVaultError::InvalidVaultFormat(_))
        ));
    }

    fn assert_invalid_header(header: VaultHeader) {
        let buf = encode_vault(&header, &sample_records()).unwrap();
        assert!(matches!(
            decode_vault(&buf),
            Err(CredVaultError::InvalidVaultFormat(_))
        ));
    }

    #[test]
    fn short_salt_is_rejected() {
        assert_invalid_header(VaultHeader {
            salt: vec![1u8; 16],
            ..sample_header()
        });
    }

    #[test]
    fn short_verifier_is_rejected() {
        assert_invalid_header(VaultHeader {
            verifier: vec![2u8; 16],
            ..sample_header()
        });
    }

    #[test]
    fn header_version_must_match_prefix() {
        assert_invalid_header(VaultHeader {
            version: CURRENT_VERSION + 1,
            ..sample_header()
        });
    }

    #[test]
    fn kdf_params_below_floor_are_rejected() {
        assert_invalid_header(VaultHeader {
            argon2_params: Argon2Params {
                memory_kib: 64,
                ..Argon2Params::default()
            },
            ..sample_header()
        });
    }

    #[test]
    fn kdf_params_above_ceiling_are_rejected() {
        assert_invalid_header(VaultHeader {
            argon2_params: Argon2Params {
                memory_kib: u32::MAX,
                ..Argon2Params::default()
            },
            ..sample_header()
        });
        assert_invalid_header(VaultHeader {
            argon2_params: Argon2Params {
                parallelism: u32::MAX,
                ..Argon2Params::default()
            },
            ..sample_header()
        });
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn failed_staging_write_leaves_no_temp_file() {
        let full = Path::new("/dev/full");
        if !full.exists() {
            return;
        }
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(VAULT_FILE_NAME);
        let tmp = staging_file(&path);
        // Writes through the link fail with ENOSPC.
        std::os::unix::fs::symlink(full, &tmp).unwrap();

        let result = stage_vault(&path, &sample_header(), &sample_records());
        assert!(matches!(result, Err(CredVaultError::Io(_))));
        assert!(fs::symlink_metadata(&tmp).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn staging_file_sits_next_to_target() {
        let tmp = staging_file(Path::new("/vaults/mine/credentials.vault"));
        assert_eq!(tmp, PathBuf::from("/vaults/mine/.credentials.vault.tmp"));
    }
}
