//! Record selection over the in-memory credential list.
//!
//! All queries look only at clear fields (name, login, comment), so they
//! work on a locked vault.  Results borrow from the input slice and keep
//! its order.

use super::credential::Credential;

/// Does `credential` match an exact name and, when given, an exact login?
pub fn matches(credential: &Credential, name: &str, login: Option<&str>) -> bool {
    credential.name == name && login.map_or(true, |l| credential.login == l)
}

/// Select every record whose name equals `name` (and login equals
/// `login`, if provided), in insertion order.
pub fn filter<'a>(records: &'a [Credential], name: &str, login: Option<&str>) -> Vec<&'a Credential> {
    records
        .iter()
        .filter(|c| matches(c, name, login))
        .collect()
}

/// Case-insensitive substring search across name, login, and comment.
///
/// An empty pattern matches everything.
pub fn search<'a>(records: &'a [Credential], pattern: &str) -> Vec<&'a Credential> {
    let needle = pattern.to_lowercase();
    records
        .iter()
        .filter(|c| {
            [&c.name, &c.login, &c.comment]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<Credential> {
        vec![
            Credential::new("github", "alice", vec![1], "work"),
            Credential::new("gitlab", "alice", vec![2], ""),
            Credential::new("github", "bob", vec![3], "Personal"),
            Credential::new("github", "alice", vec![4], "second alice"),
        ]
    }

    #[test]
    fn filter_by_name_keeps_order_and_duplicates() {
        let recs = records();
        let found = filter(&recs, "github", None);
        let passwords: Vec<&[u8]> = found.iter().map(|c| c.password.as_slice()).collect();
        assert_eq!(passwords, vec![&[1u8][..], &[3u8][..], &[4u8][..]]);
    }

    #[test]
    fn filter_by_name_and_login() {
        let recs = records();
        let found = filter(&recs, "github", Some("alice"));
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|c| c.login == "alice"));
    }

    #[test]
    fn filter_is_exact_not_prefix() {
        let recs = records();
        assert!(filter(&recs, "git", None).is_empty());
        assert!(filter(&recs, "GitHub", None).is_empty());
    }

    #[test]
    fn filter_without_match_is_empty() {
        let recs = records();
        assert!(filter(&recs, "github", Some("carol")).is_empty());
    }

    #[test]
    fn search_ignores_case_and_checks_comment() {
        let recs = records();
        let found = search(&recs, "personal");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].login, "bob");
    }

    #[test]
    fn search_with_empty_pattern_returns_all() {
        let recs = records();
        assert_eq!(search(&recs, "").len(), recs.len());
    }
}
