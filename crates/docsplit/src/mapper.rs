// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Tree-to-filesystem mapper
//!
//! One node becomes one directory. Scalars are written to the directory's
//! body file, records become subdirectories named after their field, and
//! record lists become a subdirectory holding one directory per element,
//! named by the naming resolver or by a collection handler.

use crate::body::{self, BODY_FILE};
use crate::config::Profile;
use crate::document;
use crate::error::{Error, IoContext, Result};
use crate::handlers::HandlerTable;
use crate::naming;
use crate::node::Node;
use diagnostics::*;
use std::io::ErrorKind;
use std::path::Path;

/// Output-relative path of the directory being filled, `/`-separated.
/// The output root has the empty context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context(String);

impl Context {
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        if self.0.is_empty() {
            Context(name.to_string())
        } else {
            Context(format!("{}/{}", self.0, name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub struct Mapper<'a> {
    name_fields: &'a [String],
    handlers: &'a HandlerTable,
}

impl<'a> Mapper<'a> {
    pub fn new(name_fields: &'a [String], handlers: &'a HandlerTable) -> Self {
        Self {
            name_fields,
            handlers,
        }
    }

    /// Materialize `node` into the existing, empty `target`.
    pub fn materialize(&self, node: &Node, target: &Path) -> Result<()> {
        self.materialize_in(node, target, &Context::root())
    }

    pub(crate) fn materialize_in(&self, node: &Node, dir: &Path, context: &Context) -> Result<()> {
        self.write_body(node, dir)?;
        for (name, child) in node.records() {
            self.materialize_record(name, child, dir, context)?;
        }
        for (name, items) in node.lists() {
            self.materialize_list(name, items, dir, context)?;
        }
        Ok(())
    }

    pub(crate) fn write_body(&self, node: &Node, dir: &Path) -> Result<()> {
        if let Some(text) = body::render(node) {
            let path = dir.join(BODY_FILE);
            std::fs::write(&path, text).at_path(&path)?;
        }
        Ok(())
    }

    pub(crate) fn materialize_record(
        &self,
        name: &str,
        child: &Node,
        dir: &Path,
        context: &Context,
    ) -> Result<()> {
        let child_dir = dir.join(name);
        self.create_dir(&child_dir)?;
        let child_context = context.child(name);
        match self.handlers.lookup(context.as_str(), name) {
            Some(handler) => handler.handle(self, child, &child_dir, &child_context),
            None => self.materialize_in(child, &child_dir, &child_context),
        }
    }

    pub(crate) fn materialize_list(
        &self,
        name: &str,
        items: &[Node],
        dir: &Path,
        context: &Context,
    ) -> Result<()> {
        let list_dir = dir.join(name);
        self.create_dir(&list_dir)?;
        let list_context = context.child(name);

        let mut names = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let item_name =
                naming::resolve_name(item, self.name_fields).ok_or_else(|| Error::Unnamed {
                    list: list_dir.clone(),
                    index,
                })?;
            names.push(item_name);
        }
        naming::check_names(&list_dir, &names)?;

        for (item, item_name) in items.iter().zip(names) {
            let item_dir = list_dir.join(item_name);
            self.create_dir(&item_dir)?;
            self.materialize_in(item, &item_dir, &list_context.child(item_name))?;
        }

        let list = list_context.as_str();
        let count = items.len();
        debug!("Materialized {count} named elements into {list}");
        Ok(())
    }

    /// Exclusive create; an existing entry is never reused.
    pub(crate) fn create_dir(&self, path: &Path) -> Result<()> {
        match std::fs::create_dir(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(Error::collision(path)),
            Err(e) => Err(Error::io(path, e)),
        }
    }
}

/// Ensure `output` exists as an empty directory.
pub fn prepare_output(output: &Path) -> Result<()> {
    match std::fs::metadata(output) {
        Ok(meta) if !meta.is_dir() => Err(Error::NotADirectory {
            path: output.to_path_buf(),
        }),
        Ok(_) => {
            let mut entries = std::fs::read_dir(output).at_path(output)?;
            if entries.next().is_some() {
                Err(Error::OutputNotEmpty {
                    path: output.to_path_buf(),
                })
            } else {
                Ok(())
            }
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            std::fs::create_dir_all(output).at_path(output)
        }
        Err(e) => Err(Error::io(output, e)),
    }
}

/// Parse `source` and materialize it under `output` using `profile`.
///
/// The document is parsed before anything is written. On a naming or
/// collision failure the partial output is left in place.
pub fn materialize_document(source: &Path, output: &Path, profile: &Profile) -> Result<()> {
    let root = document::load(source)?;
    prepare_output(output)?;

    let handlers = profile.handler_table();
    Mapper::new(&profile.name_fields, &handlers).materialize(&root, output)?;

    let output = output.display().to_string();
    info!("Materialized document into {output}");
    Ok(())
}
