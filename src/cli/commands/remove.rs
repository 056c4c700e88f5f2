//! `credvault remove`: delete credentials matching `[login@]name`.

use std::path::Path;

use dialoguer::Confirm;

use crate::cli::fullname::parse_fullname;
use crate::cli::{open_vault, output};
use crate::errors::{CredVaultError, Result};
use crate::vault::query;

/// Execute the `remove` command.
pub fn execute(path: &Path, fullname: &str, force: bool) -> Result<()> {
    let target = parse_fullname(fullname)?;
    let mut vault = open_vault(path)?;

    let count = vault.credential(&target.name, target.login()).len();
    if count == 0 {
        return Err(CredVaultError::CredentialNotFound(target.to_string()));
    }

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove {count} credential(s) matching '{target}'?"))
            .default(false)
            .interact()
            .map_err(|e| CredVaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let removed = vault.remove(|c| query::matches(c, &target.name, target.login()))?;
    output::success(&format!("Removed {removed} credential(s) matching '{target}'"));

    Ok(())
}
