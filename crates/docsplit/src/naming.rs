// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Naming of anonymous records.

use crate::error::{Error, Result};
use crate::node::Node;
use std::collections::HashSet;
use std::path::Path;

/// Value of the first field in `priority` that is present in `record` as a
/// non-empty scalar. First match wins.
pub fn resolve_name<'a, S: AsRef<str>>(record: &'a Node, priority: &[S]) -> Option<&'a str> {
    priority
        .iter()
        .filter_map(|field| record.scalar(field.as_ref()))
        .find(|value| !value.is_empty())
}

/// True when `name` can be used as one directory entry.
pub fn is_valid_component(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

/// Reject invalid or repeated names before any directory in `dir` is
/// created for them.
pub fn check_names<S: AsRef<str>>(dir: &Path, names: &[S]) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        let name = name.as_ref();
        if !is_valid_component(name) {
            return Err(Error::InvalidName {
                dir: dir.to_path_buf(),
                name: name.to_string(),
            });
        }
        if !seen.insert(name) {
            return Err(Error::DuplicateName {
                dir: dir.to_path_buf(),
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priority() -> Vec<String> {
        vec!["Наименование".to_string(), "Код".to_string()]
    }

    #[test]
    fn test_first_match_wins() {
        let record = Node::new().with("Код", "001").with("Наименование", "Склад");
        assert_eq!(resolve_name(&record, &priority()), Some("Склад"));
    }

    #[test]
    fn test_falls_back_to_later_fields() {
        let record = Node::new().with("Код", "001");
        assert_eq!(resolve_name(&record, &priority()), Some("001"));
    }

    #[test]
    fn test_structured_and_empty_candidates_are_skipped() {
        let record = Node::new()
            .with("Наименование", Node::new().with("x", "1"))
            .with("Код", "");
        assert_eq!(resolve_name(&record, &priority()), None);
    }

    #[test]
    fn test_empty_priority_never_resolves() {
        let record = Node::new().with("Наименование", "Склад");
        let none: [&str; 0] = [];
        assert_eq!(resolve_name(&record, &none), None);
    }

    #[test]
    fn test_component_validation() {
        assert!(is_valid_component("Group One - s - t"));
        assert!(!is_valid_component(""));
        assert!(!is_valid_component(".."));
        assert!(!is_valid_component("a/b"));
    }

    #[test]
    fn test_check_names_reports_duplicate() {
        let err = check_names(Path::new("Items"), &["X", "Y", "X"]).unwrap_err();
        assert!(matches!(err, Error::DuplicateName { ref name, .. } if name == "X"));
    }
}
