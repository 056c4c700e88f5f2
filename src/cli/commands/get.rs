//! `credvault get`: show credentials matching `[login@]name`.

use std::path::Path;

use zeroize::Zeroizing;

use crate::cli::fullname::parse_fullname;
use crate::cli::{clipboard, open_vault, output, show_credentials, unlock};
use crate::errors::{CredVaultError, Result};
use crate::vault::Credential;

/// Execute the `get` command.
pub fn execute(path: &Path, fullname: &str, show_password: bool, to_clipboard: bool) -> Result<()> {
    let target = parse_fullname(fullname)?;
    let mut vault = open_vault(path)?;

    let found: Vec<Credential> = vault
        .credential(&target.name, target.login())
        .into_iter()
        .cloned()
        .collect();

    if to_clipboard {
        let credential = match found.as_slice() {
            [only] => only,
            [] => return Err(CredVaultError::CredentialNotFound(target.to_string())),
            many => {
                return Err(CredVaultError::CommandFailed(format!(
                    "'{target}' matches {} credentials; use login@name to pick one",
                    many.len()
                )))
            }
        };

        unlock(&mut vault)?;
        let password = Zeroizing::new(vault.reveal(&credential.password)?);
        clipboard::copy(&password)?;
        output::success(&format!("Password for '{target}' copied to clipboard"));
        return Ok(());
    }

    show_credentials(&mut vault, &found, show_password)
}
