// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! File layers and the federation step (merge visible files in order).

use serde::{Deserialize, Serialize};

use crate::document::{IfcxDocument, RawEntry, SchemaTable};

/// One loaded file in federation order.
#[derive(Debug, Clone, PartialEq)]
pub struct FileLayer {
    /// Display name (usually the file name).
    pub name: String,
    /// Hidden layers take no part in composition.
    pub visible: bool,
    /// Position in federation order; kept equal to the list position.
    pub index: usize,
    /// Parsed content.
    pub document: IfcxDocument,
}

impl FileLayer {
    /// Metadata snapshot for observers and listings.
    pub fn info(&self) -> FileInfo {
        FileInfo {
            name: self.name.clone(),
            visible: self.visible,
            index: self.index,
            entry_count: self.document.data.len(),
        }
    }
}

/// File metadata handed out by [`crate::Federation::files`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Display name.
    pub name: String,
    /// Visibility flag.
    pub visible: bool,
    /// Position in federation order.
    pub index: usize,
    /// Number of raw entries in the file.
    pub entry_count: usize,
}

/// A raw entry tagged with the file it came from.
#[derive(Debug, Clone, Copy)]
pub struct TaggedEntry<'a> {
    /// Source file name.
    pub source: &'a str,
    /// The entry itself.
    pub entry: &'a RawEntry,
}

/// Output of [`federate`]: every visible entry plus the merged schemas.
#[derive(Debug, Clone)]
pub struct Federated<'a> {
    /// Concatenated entries in file order, then in-file order.
    pub entries: Vec<TaggedEntry<'a>>,
    /// Schemas merged in file order (later files overwrite).
    pub schemas: SchemaTable,
}

/// Merge the visible layers. Returns `None` when no layer is visible.
pub fn federate(layers: &[FileLayer]) -> Option<Federated<'_>> {
    let mut visible = layers.iter().filter(|l| l.visible).peekable();
    visible.peek()?;

    let mut entries = Vec::new();
    let mut schemas = SchemaTable::new();
    for layer in visible {
        for (id, def) in &layer.document.schemas {
            schemas.insert(id.clone(), def.clone());
        }
        entries.extend(layer.document.data.iter().map(|entry| TaggedEntry {
            source: layer.name.as_str(),
            entry,
        }));
    }
    tracing::debug!(
        entries = entries.len(),
        schemas = schemas.len(),
        "federated visible layers"
    );
    Some(Federated { entries, schemas })
}
