//! `credvault search`: find credentials by text in name, login, or comment.

use std::path::Path;

use crate::cli::{open_vault, show_credentials};
use crate::errors::Result;
use crate::vault::Credential;

/// Execute the `search` command.
pub fn execute(path: &Path, pattern: &str, show_password: bool) -> Result<()> {
    let mut vault = open_vault(path)?;
    let found: Vec<Credential> = vault.search(pattern).into_iter().cloned().collect();
    show_credentials(&mut vault, &found, show_password)
}
