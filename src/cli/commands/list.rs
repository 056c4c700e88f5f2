//! `credvault list`: display all credentials in a table.

use std::path::Path;

use crate::cli::{open_vault, output, show_credentials};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(path: &Path, show_password: bool) -> Result<()> {
    let mut vault = open_vault(path)?;
    let records = vault.credentials().to_vec();

    output::info(&format!("{} credential(s)", records.len()));
    show_credentials(&mut vault, &records, show_password)
}
