//! `credvault init`: create a new, empty vault.

use std::path::Path;

use crate::cli::output;
use crate::cli::prompt_new_passphrase;
use crate::config::Settings;
use crate::errors::{CredVaultError, Result};
use crate::vault::{format, Vault};

/// Execute the `init` command.
pub fn execute(path: &Path) -> Result<()> {
    // Fail before prompting if the vault is already there.
    if format::vault_file(path).exists() {
        output::tip("Use `credvault add` to store credentials in the existing vault.");
        return Err(CredVaultError::VaultAlreadyExists(path.to_path_buf()));
    }

    let passphrase = prompt_new_passphrase()?;

    // Argon2 params come from an optional config.toml dropped in the
    // vault directory beforehand; they are frozen into the header.
    let settings = Settings::load(path)?;
    let vault = Vault::create(path, passphrase.as_bytes(), Some(&settings.argon2_params()))?;

    output::success(&format!("Vault created at {}", vault.path().display()));
    output::tip("Run `credvault add <login@name>` to add a credential.");
    output::tip("Run `credvault list` to see all credentials.");

    Ok(())
}
