//! Persistent attribute scope shared by the built-in sinks.
//!
//! A scope is an `Arc`-linked list of attribute batches and group openings.
//! Deriving a child pushes one node, so its cost is independent of how many
//! attributes the parent already carries, and the parent is never modified.

use crate::record::{Attr, Value};
use serde_json::Map;
use std::sync::Arc;

/// One step in a scope chain.
#[derive(Debug, Clone, PartialEq)]
pub enum ScopeEntry {
    Attrs(Vec<Attr>),
    Group(String),
}

#[derive(Debug)]
struct Node {
    entry: ScopeEntry,
    parent: Option<Arc<Node>>,
}

/// Attributes and groups accumulated through sink derivation.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    head: Option<Arc<Node>>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, entry: ScopeEntry) -> Self {
        Self {
            head: Some(Arc::new(Node {
                entry,
                parent: self.head.clone(),
            })),
        }
    }

    pub fn with_attrs(&self, attrs: &[Attr]) -> Self {
        if attrs.is_empty() {
            return self.clone();
        }
        self.push(ScopeEntry::Attrs(attrs.to_vec()))
    }

    /// Opening an empty group name is a no-op.
    pub fn with_group(&self, name: &str) -> Self {
        if name.is_empty() {
            return self.clone();
        }
        self.push(ScopeEntry::Group(name.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Entries in derivation order, oldest first.
    pub fn entries(&self) -> Vec<&ScopeEntry> {
        let mut entries = Vec::new();
        let mut node = self.head.as_deref();
        while let Some(n) = node {
            entries.push(&n.entry);
            node = n.parent.as_deref();
        }
        entries.reverse();
        entries
    }

    /// All attributes, scope first then `fields`, with group names folded
    /// into dotted keys (`group.key`).
    pub fn flatten(&self, fields: &[Attr]) -> Vec<Attr> {
        let mut prefix = String::new();
        let mut out = Vec::with_capacity(fields.len());
        for entry in self.entries() {
            match entry {
                ScopeEntry::Attrs(attrs) => {
                    out.extend(attrs.iter().map(|a| qualify(&prefix, a)));
                }
                ScopeEntry::Group(name) => {
                    prefix.push_str(name);
                    prefix.push('.');
                }
            }
        }
        out.extend(fields.iter().map(|a| qualify(&prefix, a)));
        out
    }

    /// Insert all attributes into `root`, opening one nested object per group.
    ///
    /// A group whose name is already taken by a non-object attribute opens
    /// under `name#2` (then `name#3`, ...) so the attribute is kept.
    pub fn nest_into(&self, root: &mut Map<String, Value>, fields: &[Attr]) {
        let mut path: Vec<&str> = Vec::new();
        for entry in self.entries() {
            match entry {
                ScopeEntry::Attrs(attrs) => {
                    for a in attrs {
                        insert_at(root, &path, &a.key, a.value.clone());
                    }
                }
                ScopeEntry::Group(name) => path.push(name.as_str()),
            }
        }
        for a in fields {
            insert_at(root, &path, &a.key, a.value.clone());
        }
    }
}

fn qualify(prefix: &str, attr: &Attr) -> Attr {
    if prefix.is_empty() {
        return attr.clone();
    }
    Attr {
        key: format!("{prefix}{}", attr.key),
        value: attr.value.clone(),
    }
}

fn insert_at(root: &mut Map<String, Value>, path: &[&str], key: &str, value: Value) {
    let mut map = root;
    for group in path {
        let slot_key = group_key(map, group);
        let slot = map.entry(slot_key).or_insert_with(|| Value::Object(Map::new()));
        match slot {
            Value::Object(next) => map = next,
            _ => return,
        }
    }
    map.insert(key.to_string(), value);
}

/// The key a group opens under: its name, or the first `name#N` that is free
/// or already holds an object.
fn group_key(map: &Map<String, Value>, group: &str) -> String {
    let mut key = group.to_string();
    let mut n = 2;
    while map.get(&key).is_some_and(|v| !v.is_object()) {
        key = format!("{group}#{n}");
        n += 1;
    }
    key
}
