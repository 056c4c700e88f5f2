//! CLI module: Clap argument parser, prompts, output helpers, and
//! command implementations.

pub mod clipboard;
pub mod commands;
pub mod fullname;
pub mod output;

use std::path::{Path, PathBuf};

use clap::Parser;
use zeroize::Zeroizing;

use crate::errors::{CredVaultError, Result};
use crate::vault::{Credential, Vault};

use output::{CredentialRow, MASK};

/// Environment variable that supplies the passphrase non-interactively.
pub const PASSPHRASE_ENV: &str = "CREDVAULT_PASSPHRASE";

/// How many times `init` lets the user retype a mismatched passphrase.
const MAX_PASSPHRASE_ATTEMPTS: usize = 3;

/// CredVault CLI: encrypted credential manager.
#[derive(Parser)]
#[command(
    name = "credvault",
    about = "Encrypted credential manager for the terminal",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault directory (default: ~/.credvault)
    #[arg(short = 'D', long, env = "CREDVAULT_DATABASE", global = true)]
    pub database: Option<PathBuf>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Initialize a new vault
    Init,

    /// Add a credential
    Add {
        /// Credential as [login@]name
        fullname: String,
        /// Free-text comment
        #[arg(short, long, default_value = "")]
        comment: String,
        /// Password (omit for piped stdin or an interactive prompt)
        #[arg(long)]
        password: Option<String>,
    },

    /// Show credentials matching [login@]name
    Get {
        /// Credential as [login@]name
        fullname: String,
        /// Decrypt and show passwords
        #[arg(short = 'P', long)]
        show_password: bool,
        /// Copy the password to the clipboard (needs exactly one match)
        #[arg(short, long)]
        clipboard: bool,
    },

    /// List all credentials
    List {
        /// Decrypt and show passwords
        #[arg(short = 'P', long)]
        show_password: bool,
    },

    /// Search names, logins, and comments
    Search {
        /// Case-insensitive text to look for
        pattern: String,
        /// Decrypt and show passwords
        #[arg(short = 'P', long)]
        show_password: bool,
    },

    /// Replace a credential's fields
    Update {
        /// Credential as [login@]name (must match exactly one)
        fullname: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New login
        #[arg(long)]
        login: Option<String>,
        /// New comment
        #[arg(short, long)]
        comment: Option<String>,
        /// New password
        #[arg(long, conflicts_with = "change_password")]
        password: Option<String>,
        /// Prompt for a new password
        #[arg(short = 'p', long)]
        change_password: bool,
    },

    /// Remove credentials matching [login@]name
    Remove {
        /// Credential as [login@]name
        fullname: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Show version
    Version,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Resolve the vault directory from `--database`, `CREDVAULT_DATABASE`,
/// or the home directory.
pub fn vault_path(cli: &Cli) -> Result<PathBuf> {
    crate::config::resolve_vault_path(cli.database.as_deref())
}

/// The passphrase from `CREDVAULT_PASSPHRASE`, if set and non-empty.
fn passphrase_from_env() -> Option<Zeroizing<String>> {
    std::env::var(PASSPHRASE_ENV)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}

/// Get the vault passphrase, from `CREDVAULT_PASSPHRASE` or a prompt.
///
/// Returns `Zeroizing<String>` so the passphrase is wiped from memory on drop.
pub fn prompt_passphrase() -> Result<Zeroizing<String>> {
    if let Some(pw) = passphrase_from_env() {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Passphrase")
        .interact()
        .map_err(|e| CredVaultError::CommandFailed(format!("passphrase prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new passphrase and its confirmation (used by `init`).
///
/// Gives the user `MAX_PASSPHRASE_ATTEMPTS` tries to type matching,
/// non-empty entries, then fails with `PasswordMismatch`.
pub fn prompt_new_passphrase() -> Result<Zeroizing<String>> {
    if let Some(pw) = passphrase_from_env() {
        return Ok(pw);
    }

    for _ in 0..MAX_PASSPHRASE_ATTEMPTS {
        let first = Zeroizing::new(read_hidden("Passphrase for the new vault")?);
        let second = Zeroizing::new(read_hidden("Type again")?);

        if first.is_empty() {
            output::warning("Passphrase cannot be empty.");
            continue;
        }
        if *first == *second {
            return Ok(first);
        }
        output::warning("Entries don't match!");
    }

    Err(CredVaultError::PasswordMismatch)
}

fn read_hidden(prompt: &str) -> Result<String> {
    dialoguer::Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .map_err(|e| CredVaultError::CommandFailed(format!("passphrase prompt: {e}")))
}

/// Prompt for the passphrase and unlock `vault` with it.
pub fn unlock(vault: &mut Vault) -> Result<()> {
    let passphrase = prompt_passphrase()?;
    vault.unlock(passphrase.as_bytes())
}

/// Turn records into table rows, decrypting passwords when `show` is set.
///
/// Decryption needs an unlocked vault.
pub fn render_rows(vault: &Vault, records: &[Credential], show: bool) -> Result<Vec<CredentialRow>> {
    records
        .iter()
        .map(|c| {
            let password = if show {
                Zeroizing::new(vault.reveal(&c.password)?)
            } else {
                Zeroizing::new(MASK.to_string())
            };
            Ok(CredentialRow {
                name: c.name.clone(),
                login: c.login.clone(),
                password,
                comment: c.comment.clone(),
            })
        })
        .collect()
}

/// Show `records`, unlocking first if passwords are to be displayed.
pub fn show_credentials(vault: &mut Vault, records: &[Credential], show: bool) -> Result<()> {
    if show && !records.is_empty() {
        unlock(vault)?;
    }
    let rows = render_rows(vault, records, show)?;
    output::print_credentials_table(&rows);
    Ok(())
}

/// Read a new password value from a flag, piped stdin, or a prompt.
pub fn read_password_value(inline: Option<&str>, prompt: &str) -> Result<Zeroizing<String>> {
    use std::io::{self, IsTerminal, Read};

    if let Some(v) = inline {
        output::warning("Password provided on command line; it may appear in shell history.");
        return Ok(Zeroizing::new(v.to_string()));
    }

    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        return Ok(Zeroizing::new(buf.trim_end_matches(['\r', '\n']).to_string()));
    }

    let pw = dialoguer::Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .map_err(|e| CredVaultError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Open the vault at `path`, hinting at `init` when it is missing.
pub fn open_vault(path: &Path) -> Result<Vault> {
    let result = Vault::open(path);
    if let Err(CredVaultError::VaultNotFound(_)) = &result {
        output::tip("Run `credvault init` to create a vault.");
    }
    result
}
