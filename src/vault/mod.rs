//! Vault module: encrypted credential storage.
//!
//! This module provides:
//! - The `Credential` record type (`credential`)
//! - Binary vault file format with checksum and atomic writes (`format`)
//! - Name/login filtering and text search (`query`)
//! - The high-level `Vault` handle (`store`)

pub mod credential;
pub mod format;
pub mod query;
pub mod store;

pub use credential::Credential;
pub use format::VaultHeader;
pub use store::Vault;
