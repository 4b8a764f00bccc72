// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Specialized collection handlers
//!
//! Some known collections have no generic name field but do carry a
//! business key. A handler names the rows of one such collection from a
//! designated field or from a composite of several fields, and applies
//! only below one fixed parent context.
//!
//! Handlers are configuration, looked up by (context, field name):
//! ```yaml
//! - context: classData
//!   field: ПравилаЗагрузкиОбъектов
//!   key:
//!     type: composite
//!     fields: [НаборПолучателей, ТипОбъектаИсточника, ТипОбъекта]
//! ```

use crate::error::{Error, Result};
use crate::mapper::{Context, Mapper};
use crate::naming;
use crate::node::{Node, Value};
use diagnostics::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_ROWS_FIELD: &str = "row";
pub const DEFAULT_SEPARATOR: &str = " - ";

fn default_rows() -> String {
    DEFAULT_ROWS_FIELD.to_string()
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

/// How a row directory name is derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", deny_unknown_fields)]
pub enum RowKey {
    /// A single designated field
    #[serde(rename = "field")]
    Field { name: String },

    /// Several fields joined by a separator
    #[serde(rename = "composite")]
    Composite {
        fields: Vec<String>,
        #[serde(default = "default_separator")]
        separator: String,
    },
}

impl RowKey {
    pub fn field<S: Into<String>>(name: S) -> Self {
        RowKey::Field { name: name.into() }
    }

    pub fn composite<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RowKey::Composite {
            fields: fields.into_iter().map(Into::into).collect(),
            separator: default_separator(),
        }
    }

    pub fn fields(&self) -> &[String] {
        match self {
            RowKey::Field { name } => std::slice::from_ref(name),
            RowKey::Composite { fields, .. } => fields,
        }
    }

    /// Build the name for `row`, or return the first missing key field.
    /// An empty value counts as missing.
    pub fn derive<'a>(&'a self, row: &Node) -> std::result::Result<String, &'a str> {
        let mut parts = Vec::with_capacity(self.fields().len());
        for field in self.fields() {
            match row.scalar(field) {
                Some(value) if !value.is_empty() => parts.push(value),
                _ => return Err(field.as_str()),
            }
        }
        Ok(match self {
            RowKey::Field { .. } => parts.concat(),
            RowKey::Composite { separator, .. } => parts.join(separator.as_str()),
        })
    }
}

/// One path-scoped naming override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectionHandler {
    /// Output-relative path of the directory holding the collection
    pub context: String,
    /// Name of the collection field
    pub field: String,
    /// Name of the repeated row field inside the collection
    #[serde(default = "default_rows")]
    pub rows: String,
    pub key: RowKey,
}

impl CollectionHandler {
    pub fn new<C: Into<String>, F: Into<String>>(context: C, field: F, key: RowKey) -> Self {
        Self {
            context: context.into(),
            field: field.into(),
            rows: default_rows(),
            key,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.field.is_empty() || self.rows.is_empty() {
            return Err(Error::config(format!(
                "collection handler in '{}' needs a field and a rows name",
                self.context
            )));
        }
        if self.key.fields().is_empty() || self.key.fields().iter().any(String::is_empty) {
            return Err(Error::config(format!(
                "collection handler for '{}' has an empty key",
                self.field
            )));
        }
        Ok(())
    }

    /// Materialize `collection` into the already created `dir`.
    ///
    /// The collection's own scalars go to its body file, each row becomes a
    /// directory named by the key, and any other structured field follows
    /// the generic rules.
    pub(crate) fn handle(
        &self,
        mapper: &Mapper<'_>,
        collection: &Node,
        dir: &Path,
        context: &Context,
    ) -> Result<()> {
        mapper.write_body(collection, dir)?;

        let rows: &[Node] = match collection.get(&self.rows) {
            Some(Value::RecordList(rows)) => rows,
            Some(Value::Record(row)) => std::slice::from_ref(row),
            // A scalar here is an empty <row/>.
            Some(Value::Scalar(_)) | None => &[],
        };

        let mut names = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            let name = self.key.derive(row).map_err(|field| Error::MissingKey {
                collection: dir.to_path_buf(),
                index,
                field: field.to_string(),
            })?;
            names.push(name);
        }
        naming::check_names(dir, &names)?;

        for (row, name) in rows.iter().zip(&names) {
            let row_dir = dir.join(name);
            mapper.create_dir(&row_dir)?;
            mapper.materialize_in(row, &row_dir, &context.child(name))?;
        }

        let collection_name = self.field.as_str();
        let count = rows.len();
        info!("Named {count} rows of {collection_name} by business key");

        for (name, child) in collection.records().filter(|(name, _)| *name != self.rows) {
            mapper.materialize_record(name, child, dir, context)?;
        }
        for (name, items) in collection.lists().filter(|(name, _)| *name != self.rows) {
            mapper.materialize_list(name, items, dir, context)?;
        }
        Ok(())
    }
}

/// Dispatch table from (context, field name) to handler.
#[derive(Debug, Clone, Default)]
pub struct HandlerTable {
    by_context: HashMap<String, HashMap<String, CollectionHandler>>,
}

impl HandlerTable {
    pub fn new<I: IntoIterator<Item = CollectionHandler>>(handlers: I) -> Self {
        let mut table = Self::default();
        for handler in handlers {
            table
                .by_context
                .entry(handler.context.clone())
                .or_default()
                .insert(handler.field.clone(), handler);
        }
        table
    }

    pub fn lookup(&self, context: &str, field: &str) -> Option<&CollectionHandler> {
        self.by_context.get(context)?.get(field)
    }

    pub fn len(&self) -> usize {
        self.by_context.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
