// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! The per-directory `body.txt` format: one `key : value` line per scalar
//! field, in field order.

use crate::node::Node;
use regex::Regex;

pub const BODY_FILE: &str = "body.txt";
pub const SEPARATOR: &str = " : ";

/// Render the scalar fields of `node`, or `None` when it has none.
pub fn render(node: &Node) -> Option<String> {
    let mut body = String::new();
    for (name, value) in node.scalars() {
        body.push_str(name);
        body.push_str(SEPARATOR);
        body.push_str(value);
        body.push('\n');
    }
    if body.is_empty() { None } else { Some(body) }
}

/// Pattern matching a whole `<field> : <value>` line, capturing the value.
pub fn field_line(field: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"(?m)^{}{}(.+?)\r?$",
        regex::escape(field),
        regex::escape(SEPARATOR)
    ))
}

/// First value of the line matched by `pattern`.
pub fn find_value<'t>(text: &'t str, pattern: &Regex) -> Option<&'t str> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
