//! System clipboard access for `get --clipboard`.

use crate::errors::{CredVaultError, Result};

/// Put `text` on the system clipboard.
pub fn copy(text: &str) -> Result<()> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| CredVaultError::ClipboardError(e.to_string()))?;
    clipboard
        .set_text(text)
        .map_err(|e| CredVaultError::ClipboardError(e.to_string()))
}
