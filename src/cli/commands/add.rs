//! `credvault add`: encrypt and store a new credential.

use std::path::Path;

use crate::cli::fullname::parse_fullname;
use crate::cli::output;
use crate::cli::{open_vault, read_password_value, unlock};
use crate::errors::Result;
use crate::vault::Credential;

/// Execute the `add` command.
pub fn execute(path: &Path, fullname: &str, comment: &str, password: Option<&str>) -> Result<()> {
    let target = parse_fullname(fullname)?;
    let mut vault = open_vault(path)?;

    let plaintext = read_password_value(password, &format!("Password for {target}"))?;

    unlock(&mut vault)?;
    let encrypted = vault.encrypt(&plaintext)?;
    vault.lock();

    let credential = Credential::new(
        target.name.as_str(),
        target.login().unwrap_or_default(),
        encrypted,
        comment,
    );
    vault.add(credential)?;

    output::success(&format!(
        "Credential '{target}' added ({} total)",
        vault.len()
    ));

    Ok(())
}
