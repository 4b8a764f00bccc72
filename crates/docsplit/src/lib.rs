// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Split one large XML document into a directory tree that can be
//! reviewed and diffed under version control.
//!
//! - [`document`] adapts the XML into ordered [`Node`]s
//! - [`mapper`] writes one directory per node and one `body.txt` per
//!   directory
//! - [`naming`] and [`handlers`] name the elements of repeated collections
//! - [`relink`] replaces identifier segments of directory names with the
//!   names of the entities they reference

pub mod body;
pub mod config;
pub mod document;
pub mod error;
pub mod handlers;
pub mod mapper;
pub mod naming;
pub mod node;
pub mod relink;

pub use config::Profile;
pub use error::{Error, Result};
pub use handlers::{CollectionHandler, HandlerTable, RowKey};
pub use mapper::{Mapper, materialize_document};
pub use naming::resolve_name;
pub use node::{Node, Value};
pub use relink::{ReferenceRule, RelinkReport, relink_output, repair_references};
