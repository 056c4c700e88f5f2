//! Parsing of the combined `login@name` argument.
//!
//! Grammar:
//!
//! ```text
//! fullname := [ login "@" ] name
//! login    := any characters (may itself contain '@')
//! name     := one or more of: letters, digits, '_', '.', '-', whitespace
//! ```
//!
//! The split happens at the **last** `@`, so `me@corp.com@mail` reads as
//! login `me@corp.com` on credential `mail`.  An empty login (`@github`)
//! means "any login".

use std::fmt;

use crate::errors::{CredVaultError, Result};

/// A parsed `[login@]name` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullName {
    pub name: String,
    pub login: Option<String>,
}

impl FullName {
    /// The login as a borrowed option, handy for query calls.
    pub fn login(&self) -> Option<&str> {
        self.login.as_deref()
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.login {
            Some(login) => write!(f, "{login}@{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Parse `input` as `[login@]name`.
pub fn parse_fullname(input: &str) -> Result<FullName> {
    let (login, name) = match input.rsplit_once('@') {
        Some((login, name)) => (Some(login), name),
        None => (None, input),
    };

    let name = name.trim();
    if name.is_empty() {
        return Err(CredVaultError::Validation(format!(
            "'{input}' has no credential name"
        )));
    }
    if !name.chars().all(is_name_char) {
        return Err(CredVaultError::Validation(format!(
            "'{name}' is not a valid name: only letters, digits, spaces, '_', '.', and '-' are allowed"
        )));
    }

    let login = login.filter(|l| !l.is_empty()).map(str::to_string);

    Ok(FullName {
        name: name.to_string(),
        login,
    })
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '.' | '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_name() {
        let f = parse_fullname("github").unwrap();
        assert_eq!(f.name, "github");
        assert_eq!(f.login, None);
    }

    #[test]
    fn login_and_name() {
        let f = parse_fullname("alice@github").unwrap();
        assert_eq!(f.name, "github");
        assert_eq!(f.login(), Some("alice"));
        assert_eq!(f.to_string(), "alice@github");
    }

    #[test]
    fn splits_at_last_at_sign() {
        let f = parse_fullname("alice@example.com@mail").unwrap();
        assert_eq!(f.name, "mail");
        assert_eq!(f.login(), Some("alice@example.com"));
    }

    #[test]
    fn empty_login_means_any() {
        let f = parse_fullname("@github").unwrap();
        assert_eq!(f.login, None);
    }

    #[test]
    fn names_with_spaces_dots_and_unicode() {
        assert_eq!(parse_fullname("my bank.de").unwrap().name, "my bank.de");
        assert_eq!(parse_fullname("jörg@café_2-x").unwrap().name, "café_2-x");
    }

    #[test]
    fn rejects_missing_name() {
        assert!(matches!(
            parse_fullname("alice@"),
            Err(CredVaultError::Validation(_))
        ));
        assert!(parse_fullname("").is_err());
        assert!(parse_fullname("   ").is_err());
    }

    #[test]
    fn rejects_invalid_name_characters() {
        assert!(parse_fullname("git/hub").is_err());
        assert!(parse_fullname("alice@git:hub").is_err());
    }
}
