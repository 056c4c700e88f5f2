//! `credvault update`: replace one credential's fields.
//!
//! Fields not given on the command line keep their current value.  The
//! old record is removed and the new one appended in a single write.

use std::path::Path;

use crate::cli::fullname::parse_fullname;
use crate::cli::{open_vault, output, read_password_value, unlock};
use crate::errors::{CredVaultError, Result};
use crate::vault::{query, Credential};

/// Field changes requested for `update`.
#[derive(Debug, Default)]
pub struct Changes<'a> {
    pub name: Option<&'a str>,
    pub login: Option<&'a str>,
    pub comment: Option<&'a str>,
    pub password: Option<&'a str>,
    pub change_password: bool,
}

impl Changes<'_> {
    fn touches_password(&self) -> bool {
        self.password.is_some() || self.change_password
    }
}

/// Execute the `update` command.
pub fn execute(path: &Path, fullname: &str, changes: &Changes<'_>) -> Result<()> {
    let target = parse_fullname(fullname)?;
    let mut vault = open_vault(path)?;

    let existing = match vault.credential(&target.name, target.login()).as_slice() {
        [only] => (*only).clone(),
        [] => return Err(CredVaultError::CredentialNotFound(target.to_string())),
        many => {
            return Err(CredVaultError::CommandFailed(format!(
                "'{target}' matches {} credentials; use login@name to pick one",
                many.len()
            )))
        }
    };

    let password = if changes.touches_password() {
        let plaintext = read_password_value(changes.password, &format!("New password for {target}"))?;
        unlock(&mut vault)?;
        let encrypted = vault.encrypt(&plaintext)?;
        vault.lock();
        encrypted
    } else {
        existing.password.clone()
    };

    let replacement = Credential::new(
        changes.name.unwrap_or(&existing.name),
        changes.login.unwrap_or(&existing.login),
        password,
        changes.comment.unwrap_or(&existing.comment),
    );

    vault.update(|c| query::matches(c, &target.name, target.login()), replacement)?;
    output::success(&format!("Credential '{target}' updated"));

    Ok(())
}
