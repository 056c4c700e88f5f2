//! Configuration: vault path resolution and `config.toml` settings.

pub mod settings;

pub use settings::{default_vault_path, resolve_vault_path, Settings, DEFAULT_VAULT_DIR};
