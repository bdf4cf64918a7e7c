// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Node collapsing: one canonical node per unique path.

use std::collections::HashMap;

use crate::document::{Attributes, RawEntry};
use crate::federate::TaggedEntry;
use crate::refmap::RefMap;

/// Per-path merge of every visible entry sharing that path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalNode {
    /// Node path.
    pub path: String,
    /// Merged attributes (later entries win per key).
    pub attributes: Attributes,
    /// Merged child slots.
    pub children: RefMap,
    /// Merged inheritance slots.
    pub inherits: RefMap,
    /// Files that contributed, in federation order, without repeats.
    pub sources: Vec<String>,
}

impl CanonicalNode {
    fn new(path: &str) -> Self {
        Self {
            path: path.to_owned(),
            ..Self::default()
        }
    }

    fn absorb(&mut self, source: &str, entry: &RawEntry) {
        self.children.assign(&entry.children);
        self.inherits.assign(&entry.inherits);
        for (key, value) in &entry.attributes {
            self.attributes.insert(key.clone(), value.clone());
        }
        if !self.sources.iter().any(|s| s == source) {
            self.sources.push(source.to_owned());
        }
    }

    /// No attributes, no children, at least one inherit.
    pub fn is_redirect(&self) -> bool {
        self.attributes.is_empty() && self.children.is_empty() && !self.inherits.is_empty()
    }
}

/// Canonical nodes keyed by path, iterable in first-encounter order.
#[derive(Debug, Clone, Default)]
pub struct NodeTable {
    order: Vec<String>,
    nodes: HashMap<String, CanonicalNode>,
}

impl NodeTable {
    /// Node at `path`.
    pub fn get(&self, path: &str) -> Option<&CanonicalNode> {
        self.nodes.get(path)
    }

    /// Nodes in first-encounter order.
    pub fn iter(&self) -> impl Iterator<Item = &CanonicalNode> + '_ {
        self.order.iter().filter_map(|p| self.nodes.get(p))
    }

    /// Number of unique paths.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when no entry was collapsed.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Group entries by path and fold each group left to right.
pub fn collapse(entries: &[TaggedEntry<'_>]) -> NodeTable {
    let mut table = NodeTable::default();
    for tagged in entries {
        let path = tagged.entry.path.as_str();
        if !table.nodes.contains_key(path) {
            table.order.push(path.to_owned());
        }
        table
            .nodes
            .entry(path.to_owned())
            .or_insert_with(|| CanonicalNode::new(path))
            .absorb(tagged.source, tagged.entry);
    }
    tracing::debug!(
        entries = entries.len(),
        nodes = table.len(),
        "collapsed entries"
    );
    table
}
