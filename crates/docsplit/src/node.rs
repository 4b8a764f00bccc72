// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Ordered field model for a parsed document.
//!
//! Every element of the source is adapted once into a [`Node`]: an ordered
//! list of uniquely named fields, each carrying a [`Value`] whose kind is
//! fixed at adaptation time. The mapper never inspects XML again.

/// The value of one field of a [`Node`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Leaf attribute written to the body file
    Scalar(String),
    /// Singly-occurring structured child
    Record(Node),
    /// Repeated same-named children, materialized as named subdirectories
    RecordList(Vec<Node>),
}

impl Value {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Node> {
        match self {
            Value::Record(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Node]> {
        match self {
            Value::RecordList(nodes) => Some(nodes.as_slice()),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(s)
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::Record(node)
    }
}

impl From<Vec<Node>> for Value {
    fn from(nodes: Vec<Node>) -> Self {
        Value::RecordList(nodes)
    }
}

/// An ordered mapping from field name to [`Value`].
///
/// Field names are unique: inserting an existing name replaces its value
/// in place and keeps the original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    fields: Vec<(String, Value)>,
}

impl Node {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<N: Into<String>, V: Into<Value>>(&mut self, name: N, value: V) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Builder form of [`Node::insert`].
    #[must_use]
    pub fn with<N: Into<String>, V: Into<Value>>(mut self, name: N, value: V) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// The value of `name` when it is present and a scalar.
    pub fn scalar(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_scalar)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn scalars(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields()
            .filter_map(|(n, v)| v.as_scalar().map(|s| (n, s)))
    }

    pub fn records(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.fields()
            .filter_map(|(n, v)| v.as_record().map(|r| (n, r)))
    }

    pub fn lists(&self) -> impl Iterator<Item = (&str, &[Node])> {
        self.fields().filter_map(|(n, v)| v.as_list().map(|l| (n, l)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_position_on_replace() {
        let mut node = Node::new().with("a", "1").with("b", "2");
        node.insert("a", "3");
        let names: Vec<&str> = node.fields().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(node.scalar("a"), Some("3"));
    }

    #[test]
    fn test_partition_by_kind_preserves_order() {
        let node = Node::new()
            .with("z", "last letter")
            .with("child", Node::new().with("x", "1"))
            .with("items", vec![Node::new(), Node::new()])
            .with("a", "first letter");

        let scalars: Vec<_> = node.scalars().collect();
        assert_eq!(scalars, vec![("z", "last letter"), ("a", "first letter")]);
        assert_eq!(node.records().count(), 1);
        let lists: Vec<_> = node.lists().map(|(n, l)| (n, l.len())).collect();
        assert_eq!(lists, vec![("items", 2)]);
    }

    #[test]
    fn test_scalar_lookup_ignores_structured_fields() {
        let node = Node::new().with("child", Node::new());
        assert!(node.get("child").is_some());
        assert_eq!(node.scalar("child"), None);
        assert!(node.get("child").and_then(Value::as_record).is_some());
    }
}
