// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Cross-reference renamer
//!
//! Rows named by a composite key carry the identifier of a referenced
//! entity (for example a recipient set) rather than its name, since the
//! main pass never links collections. This pass scans the referenced
//! collection's body files for `identifier -> directory name` and renames
//! referencing directories whose leading segment is a known identifier.
//!
//! It only renames, and running it again changes nothing.

use crate::body::{self, BODY_FILE};
use crate::error::{Error, IoContext, Result};
use crate::naming;
use diagnostics::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

pub const DEFAULT_IDENTIFIER_FIELD: &str = "Ссылка";

/// A 5-group dash-separated identifier leading an `a - b - c` name.
pub const DEFAULT_IDENTIFIER_PATTERN: &str = r"^(\w+-\w+-\w+-\w+-\w+) - .+ - .+$";

fn default_identifier_field() -> String {
    DEFAULT_IDENTIFIER_FIELD.to_string()
}

fn default_identifier_pattern() -> String {
    DEFAULT_IDENTIFIER_PATTERN.to_string()
}

/// Which referencing collection points at which referenced one, both
/// relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceRule {
    pub referencing: String,
    pub referenced: String,
    /// Body field of a referenced entry holding its identifier
    #[serde(default = "default_identifier_field")]
    pub identifier_field: String,
    /// Regex over referencing directory names; group 1 is the identifier
    #[serde(default = "default_identifier_pattern")]
    pub identifier_pattern: String,
}

impl ReferenceRule {
    pub fn new<A: Into<String>, B: Into<String>>(referencing: A, referenced: B) -> Self {
        Self {
            referencing: referencing.into(),
            referenced: referenced.into(),
            identifier_field: default_identifier_field(),
            identifier_pattern: default_identifier_pattern(),
        }
    }

    #[must_use]
    pub fn with_identifier_pattern<S: Into<String>>(mut self, pattern: S) -> Self {
        self.identifier_pattern = pattern.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        Relinker::new(self).map(|_| ())
    }
}

/// Outcome of one relink pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelinkReport {
    /// (old name, new name)
    pub renamed: Vec<(String, String)>,
    /// Names carrying an identifier with no referenced entry
    pub unresolved: Vec<String>,
}

/// A compiled [`ReferenceRule`].
pub struct Relinker {
    body_line: Regex,
    identifier: Regex,
}

impl Relinker {
    pub fn new(rule: &ReferenceRule) -> Result<Self> {
        if rule.identifier_field.is_empty() {
            return Err(Error::config("reference rule needs an identifier field"));
        }
        let body_line = body::field_line(&rule.identifier_field)
            .map_err(|e| Error::config(format!("bad identifier field: {e}")))?;
        let identifier = Regex::new(&rule.identifier_pattern).map_err(|e| {
            Error::config(format!(
                "bad identifier pattern '{}': {e}",
                rule.identifier_pattern
            ))
        })?;
        if identifier.captures_len() < 2 {
            return Err(Error::config(format!(
                "identifier pattern '{}' has no capture group",
                rule.identifier_pattern
            )));
        }
        Ok(Self {
            body_line,
            identifier,
        })
    }

    /// Map each identifier found in the body files of `referenced`'s
    /// subdirectories to that subdirectory's name. First occurrence wins.
    pub fn collect_names(&self, referenced: &Path) -> Result<BTreeMap<String, String>> {
        let mut names = BTreeMap::new();
        for name in subdirectories(referenced)? {
            let body_path = referenced.join(&name).join(BODY_FILE);
            let text = match std::fs::read_to_string(&body_path) {
                Ok(text) => text,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(Error::io(&body_path, e)),
            };
            if let Some(id) = body::find_value(&text, &self.body_line) {
                names.entry(id.to_string()).or_insert(name);
            }
        }
        Ok(names)
    }

    /// The new name for `name`, or `None` when it carries no identifier.
    /// `Some(Err(id))` reports an identifier missing from `names`.
    fn rewrite(
        &self,
        name: &str,
        names: &BTreeMap<String, String>,
    ) -> Option<std::result::Result<String, String>> {
        let id = self.identifier.captures(name)?.get(1)?;
        Some(match names.get(id.as_str()) {
            Some(human) => Ok(format!(
                "{}{}{}",
                &name[..id.start()],
                human,
                &name[id.end()..]
            )),
            None => Err(id.as_str().to_string()),
        })
    }

    pub fn repair(&self, referencing: &Path, referenced: &Path) -> Result<RelinkReport> {
        let names = self.collect_names(referenced)?;
        let mut report = RelinkReport::default();

        for name in subdirectories(referencing)? {
            match self.rewrite(&name, &names) {
                None => {}
                Some(Err(id)) => {
                    warn!("No referenced entry for {id}, keeping {name}");
                    report.unresolved.push(name);
                }
                Some(Ok(new_name)) if new_name == name => {}
                Some(Ok(new_name)) => {
                    if !naming::is_valid_component(&new_name) {
                        return Err(Error::InvalidName {
                            dir: referencing.to_path_buf(),
                            name: new_name,
                        });
                    }
                    let from = referencing.join(&name);
                    let to = referencing.join(&new_name);
                    if to.exists() {
                        return Err(Error::collision(&to));
                    }
                    std::fs::rename(&from, &to).at_path(&from)?;
                    info!("Renamed {name} to {new_name}");
                    report.renamed.push((name, new_name));
                }
            }
        }
        Ok(report)
    }
}

/// Sorted names of the immediate subdirectories of `dir`; empty when
/// `dir` does not exist.
fn subdirectories(dir: &Path) -> Result<Vec<String>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let dir = dir.display().to_string();
            warn!("Relink directory {dir} does not exist");
            return Ok(Vec::new());
        }
        Err(e) => return Err(Error::io(dir, e)),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.at_path(dir)?;
        if !entry.file_type().at_path(entry.path())?.is_dir() {
            continue;
        }
        // Names this tool writes are always UTF-8.
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Repair directory names in `referencing` using the names found in
/// `referenced`.
pub fn repair_references(
    referencing: &Path,
    referenced: &Path,
    rule: &ReferenceRule,
) -> Result<RelinkReport> {
    Relinker::new(rule)?.repair(referencing, referenced)
}

/// Apply every rule of a profile under `output`.
pub fn relink_output(output: &Path, rules: &[ReferenceRule]) -> Result<Vec<RelinkReport>> {
    let mut reports = Vec::with_capacity(rules.len());
    for rule in rules {
        let referencing = output.join(&rule.referencing);
        let referenced = output.join(&rule.referenced);
        let report = repair_references(&referencing, &referenced, rule)?;

        let target = rule.referencing.as_str();
        let renamed = report.renamed.len();
        let unresolved = report.unresolved.len();
        info!("Relinked {target}: {renamed} renamed, {unresolved} unresolved");
        reports.push(report);
    }
    Ok(reports)
}
