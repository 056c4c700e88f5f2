//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;
use zeroize::Zeroizing;

/// Shown in place of a password that was not decrypted.
pub const MASK: &str = "***";

/// One table row, with the password either masked or decrypted.
pub struct CredentialRow {
    pub name: String,
    pub login: String,
    pub password: Zeroizing<String>,
    pub comment: String,
}

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of credentials (Name, Login, Password, Comment).
pub fn print_credentials_table(rows: &[CredentialRow]) {
    if rows.is_empty() {
        info("No credentials found.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Login", "Password", "Comment"]);

    for row in rows {
        table.add_row(vec![
            row.name.as_str(),
            row.login.as_str(),
            row.password.as_str(),
            row.comment.as_str(),
        ]);
    }

    println!("{table}");
}
