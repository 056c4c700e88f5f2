//! Query tests: `[login@]name` parsing feeding record selection.

use credvault::cli::fullname::parse_fullname;
use credvault::vault::{query, Credential};

fn records() -> Vec<Credential> {
    vec![
        Credential::new("github", "alice", b"ct-1".to_vec(), "work"),
        Credential::new("github", "bob", b"ct-2".to_vec(), ""),
        Credential::new("mail.example", "alice@corp", b"ct-3".to_vec(), "Personal"),
    ]
}

fn select<'a>(records: &'a [Credential], fullname: &str) -> Vec<&'a Credential> {
    let target = parse_fullname(fullname).expect("valid fullname");
    query::filter(records, &target.name, target.login())
}

#[test]
fn bare_name_selects_every_login() {
    let all = records();
    let found = select(&all, "github");
    let logins: Vec<&str> = found.iter().map(|c| c.login.as_str()).collect();
    assert_eq!(logins, ["alice", "bob"]);
}

#[test]
fn login_narrows_selection() {
    let all = records();
    let found = select(&all, "bob@github");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].login, "bob");
}

#[test]
fn login_containing_at_sign_splits_at_last_one() {
    let all = records();
    let found = select(&all, "alice@corp@mail.example");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "mail.example");
}

#[test]
fn unknown_login_selects_nothing() {
    let all = records();
    assert!(select(&all, "carol@github").is_empty());
}

#[test]
fn search_spans_all_clear_fields() {
    let all = records();
    assert_eq!(query::search(&all, "ALICE").len(), 2);
    assert_eq!(query::search(&all, "personal").len(), 1);
    assert_eq!(query::search(&all, "").len(), 3);
    assert!(query::search(&all, "gitlab").is_empty());
}
