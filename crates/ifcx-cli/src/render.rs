// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Text renderings of composed trees, layers and attributes.

use std::fmt;

use comfy_table::Table;
use ifcx_app_core::prefs::TreeDisplayPrefs;
use ifcx_core::{Attributes, ComposedNode, FileInfo};
use serde_json::Value;

/// Indented outline, one node per line.
pub struct Outline<'a> {
    root: &'a ComposedNode,
    prefs: &'a TreeDisplayPrefs,
}

impl<'a> Outline<'a> {
    pub fn new(root: &'a ComposedNode, prefs: &'a TreeDisplayPrefs) -> Self {
        Self { root, prefs }
    }
}

impl fmt::Display for Outline<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefs = self.prefs;
        for (depth, node) in self.root.walk() {
            let indent = depth * prefs.indent;
            write!(f, "{:indent$}{}", "", node.name)?;
            if prefs.show_paths && !node.path.is_empty() {
                write!(f, " <{}>", node.path)?;
            }
            if prefs.show_attribute_counts && !node.attributes.is_empty() {
                write!(f, " [{} attrs]", node.attributes.len())?;
            }
            if prefs.show_sources && !node.source_files.is_empty() {
                write!(f, " ({})", node.source_files.join(", "))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Table of file layers.
pub fn layers_table(files: &[FileInfo]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "name", "visible", "entries"]);
    for file in files {
        table.add_row(vec![
            file.index.to_string(),
            file.name.clone(),
            if file.visible { "yes" } else { "no" }.to_owned(),
            file.entry_count.to_string(),
        ]);
    }
    table
}

/// Two-column key/value table.
pub fn attributes_table(attributes: &Attributes) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["attribute", "value"]);
    for (key, value) in attributes {
        let shown = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        table.add_row(vec![key.clone(), shown]);
    }
    table
}
