//! Cryptographic primitives for CredVault.
//!
//! This module provides:
//! - AES-256-GCM field encryption and decryption (`encryption`)
//! - Argon2id passphrase-based key derivation (`kdf`)
//! - HKDF field-key and verifier derivation (`keys`)

pub mod encryption;
pub mod kdf;
pub mod keys;

pub use encryption::{decrypt, encrypt};
pub use kdf::{derive_master_key, derive_master_key_with_params, generate_salt, Argon2Params};
pub use keys::{derive, derive_field_key, derive_verifier, verify, DerivedKeys, FieldKey};
