// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Naming profile
//!
//! A profile carries everything domain-specific about a conversion: the
//! priority list used to name anonymous records, the collection handler
//! table, and the cross-reference rules for the relink pass.
//!
//! ```yaml
//! name_fields: [Наименование, Код]
//! collections:
//!   - context: classData
//!     field: НаборыПолучателей
//!     key: { type: field, name: Наименование }
//! references:
//!   - referencing: classData/ПравилаЗагрузкиОбъектов
//!     referenced: classData/НаборыПолучателей
//! ```

use crate::error::{Error, IoContext, Result};
use crate::handlers::{CollectionHandler, HandlerTable, RowKey};
use crate::relink::ReferenceRule;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Context of the exchange-rules document body.
pub const EXCHANGE_RULES_CONTEXT: &str = "classData";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    /// Candidate naming fields, most preferred first
    #[serde(default)]
    pub name_fields: Vec<String>,

    #[serde(default)]
    pub collections: Vec<CollectionHandler>,

    #[serde(default)]
    pub references: Vec<ReferenceRule>,
}

impl Profile {
    /// A profile with no naming fields, handlers or references.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            name_fields: Vec::new(),
            collections: Vec::new(),
            references: Vec::new(),
        }
    }

    /// Built-in profile for data exchange rule documents.
    #[must_use]
    pub fn exchange_rules() -> Self {
        let context = EXCHANGE_RULES_CONTEXT;
        Self {
            name_fields: ["Наименование", "Имя", "Код", "ИмяАлгоритма", "ТипОбъекта"]
                .into_iter()
                .map(String::from)
                .collect(),
            collections: vec![
                CollectionHandler::new(context, "НаборыПолучателей", RowKey::field("Наименование")),
                CollectionHandler::new(
                    context,
                    "ИменованныеАлгоритмы",
                    RowKey::field("ИмяАлгоритма"),
                ),
                CollectionHandler::new(
                    context,
                    "ПравилаВыгрузкиОбъектов",
                    RowKey::field("ТипОбъекта"),
                ),
                CollectionHandler::new(
                    context,
                    "ПравилаЗагрузкиОбъектов",
                    RowKey::composite(["НаборПолучателей", "ТипОбъектаИсточника", "ТипОбъекта"]),
                ),
            ],
            references: vec![ReferenceRule::new(
                format!("{context}/ПравилаЗагрузкиОбъектов"),
                format!("{context}/НаборыПолучателей"),
            )],
        }
    }

    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).at_path(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        let profile: Profile = serde_yaml_ng::from_str(text)
            .map_err(|e| Error::config(format!("failed to parse YAML profile: {e}")))?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml_ng::to_string(self)
            .map_err(|e| Error::config(format!("failed to serialize profile: {e}")))
    }

    /// Validate configuration - ensures keys are usable and patterns compile
    pub fn validate(&self) -> Result<()> {
        if self.name_fields.iter().any(String::is_empty) {
            return Err(Error::config("name_fields contains an empty entry"));
        }

        let mut seen = HashSet::new();
        for handler in &self.collections {
            handler.validate()?;
            if !seen.insert((handler.context.as_str(), handler.field.as_str())) {
                return Err(Error::config(format!(
                    "duplicate collection handler for '{}' in '{}'",
                    handler.field, handler.context
                )));
            }
        }

        for rule in &self.references {
            rule.validate()?;
        }
        Ok(())
    }

    pub fn handler_table(&self) -> HandlerTable {
        HandlerTable::new(self.collections.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profile_is_valid() {
        let profile = Profile::exchange_rules();
        profile.validate().unwrap();
        assert_eq!(profile.name_fields[0], "Наименование");
        assert_eq!(profile.handler_table().len(), 4);
        assert!(
            profile
                .handler_table()
                .lookup("classData", "ПравилаЗагрузкиОбъектов")
                .is_some()
        );
    }

    #[test]
    fn test_yaml_roundtrip_of_builtin_profile() {
        let profile = Profile::exchange_rules();
        let yaml = profile.to_yaml().unwrap();
        assert_eq!(Profile::from_yaml(&yaml).unwrap(), profile);
    }

    #[test]
    fn test_defaults_fill_in() {
        let yaml = r#"
name_fields: [Name]
collections:
  - context: root
    field: Things
    key: { type: composite, fields: [a, b] }
references:
  - referencing: root/Things
    referenced: root/Groups
"#;
        let profile = Profile::from_yaml(yaml).unwrap();
        let handler = &profile.collections[0];
        assert_eq!(handler.rows, "row");
        assert_eq!(handler.key, RowKey::composite(["a", "b"]));
        assert_eq!(profile.references[0].identifier_field, "Ссылка");
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(Profile::from_yaml("name_feilds: [Name]\n").is_err());
    }

    #[test]
    fn test_bad_identifier_pattern_rejected() {
        let yaml = r#"
references:
  - referencing: a
    referenced: b
    identifier_pattern: "(unclosed"
"#;
        let err = Profile::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_duplicate_handlers_rejected() {
        let mut profile = Profile::exchange_rules();
        profile.collections.push(profile.collections[0].clone());
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("profile.yaml");
        std::fs::write(&path, "name_fields: [Имя]\n").unwrap();
        let profile = Profile::load(&path).unwrap();
        assert_eq!(profile.name_fields, vec!["Имя".to_string()]);
        assert!(profile.collections.is_empty());
    }
}
