// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The long-lived federation: an ordered file list plus the published tree.
//!
//! Every effective mutation rebuilds the tree from scratch
//! (federate → collapse → validate → compose), replaces the published tree,
//! then notifies observers synchronously: `composition_changed` first,
//! `files_changed` second. Out-of-range indices are ignored without
//! notification.

use crate::collapse::collapse;
use crate::compose::compose;
use crate::config::{CompositionConfig, ErrorPolicy};
use crate::diagnostics::{CompositionReport, CompositionStatus};
use crate::document::{Attributes, IfcxDocument, SchemaTable};
use crate::federate::{federate, FileInfo, FileLayer};
use crate::flatten::flatten_attributes;
use crate::node::ComposedNode;
use crate::schema::validate;

/// Observer port for federation consumers (renderer, layer list, CLI).
///
/// Both hooks run synchronously inside the mutating call. The tree passed to
/// `composition_changed` is a borrowed snapshot; it is replaced, never
/// mutated, on the next rebuild.
pub trait FederationObserver {
    /// Called after every recomposition with the published root (or none).
    fn composition_changed(&mut self, _root: Option<&ComposedNode>) {}

    /// Called after every effective file-list mutation.
    fn files_changed(&mut self, _files: &[FileInfo]) {}
}

/// Owned, single-writer composition engine.
#[derive(Default)]
pub struct Federation {
    layers: Vec<FileLayer>,
    config: CompositionConfig,
    root: Option<ComposedNode>,
    schemas: SchemaTable,
    report: CompositionReport,
    observers: Vec<Box<dyn FederationObserver>>,
}

impl Federation {
    /// Empty federation with the given settings.
    pub fn new(config: CompositionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Current settings.
    pub fn config(&self) -> &CompositionConfig {
        &self.config
    }

    /// Replace the settings; takes effect on the next rebuild.
    pub fn set_config(&mut self, config: CompositionConfig) {
        self.config = config;
    }

    /// Register an observer. Observers are called in registration order.
    pub fn subscribe(&mut self, observer: impl FederationObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Append a visible file and recompose.
    pub fn add_file(&mut self, name: impl Into<String>, document: IfcxDocument) {
        let name = name.into();
        tracing::debug!(%name, entries = document.data.len(), "adding file");
        self.layers.push(FileLayer {
            name,
            visible: true,
            index: self.layers.len(),
            document,
        });
        self.changed();
    }

    /// Remove the file at `index`.
    pub fn remove_file(&mut self, index: usize) {
        if index >= self.layers.len() {
            return;
        }
        let removed = self.layers.remove(index);
        tracing::debug!(name = %removed.name, index, "removed file");
        self.changed();
    }

    /// Move the file at `from` to position `to`.
    pub fn move_file(&mut self, from: usize, to: usize) {
        let len = self.layers.len();
        if from >= len || to >= len {
            return;
        }
        let layer = self.layers.remove(from);
        self.layers.insert(to, layer);
        self.changed();
    }

    /// Show or hide the file at `index`.
    pub fn set_file_visibility(&mut self, index: usize, visible: bool) {
        let Some(layer) = self.layers.get_mut(index) else {
            return;
        };
        layer.visible = visible;
        self.changed();
    }

    /// Snapshot of file metadata in federation order.
    pub fn files(&self) -> Vec<FileInfo> {
        self.layers.iter().map(FileLayer::info).collect()
    }

    /// Currently published tree.
    pub fn composed_root(&self) -> Option<&ComposedNode> {
        self.root.as_ref()
    }

    /// Status and diagnostics of the last rebuild.
    pub fn report(&self) -> &CompositionReport {
        &self.report
    }

    /// Schemas merged by the last rebuild that completed, with or without a root.
    ///
    /// A failed rebuild replaces them under `ErrorPolicy::Clear` and keeps them under
    /// `ErrorPolicy::KeepLastGood`. Empty while no file is visible.
    pub fn schemas(&self) -> &SchemaTable {
        &self.schemas
    }

    /// Flattened, unit-annotated attributes of `node` for display.
    pub fn flattened_attributes(&self, node: &ComposedNode) -> Attributes {
        flatten_attributes(&node.attributes, &self.schemas)
    }

    /// Rebuild from the current file list and notify composition observers.
    pub fn recompose(&mut self) {
        self.rebuild();
        let root = self.root.as_ref();
        for observer in &mut self.observers {
            observer.composition_changed(root);
        }
    }

    fn changed(&mut self) {
        for (position, layer) in self.layers.iter_mut().enumerate() {
            layer.index = position;
        }
        self.recompose();
        let files = self.files();
        for observer in &mut self.observers {
            observer.files_changed(&files);
        }
    }

    fn rebuild(&mut self) {
        let Some(federated) = federate(&self.layers) else {
            tracing::info!("no visible files; composition cleared");
            self.root = None;
            self.schemas.clear();
            self.report = CompositionReport {
                status: CompositionStatus::NoVisibleFiles,
                diagnostics: Vec::new(),
            };
            return;
        };

        let table = collapse(&federated.entries);
        let mut diagnostics = if self.config.validate_schemas {
            validate(&table, &federated.schemas)
        } else {
            Vec::new()
        };
        for diagnostic in &diagnostics {
            diagnostic.emit();
        }

        let status = match compose(&table, &self.config) {
            Ok(composition) => {
                diagnostics.extend(composition.diagnostics);
                self.root = composition.root;
                self.schemas = federated.schemas;
                match &self.root {
                    Some(root) => CompositionStatus::Composed {
                        nodes: root.node_count(),
                    },
                    None => CompositionStatus::NoRoot,
                }
            }
            Err(err) => {
                tracing::error!(%err, policy = ?self.config.on_error, "composition failed");
                if self.config.on_error == ErrorPolicy::Clear {
                    self.root = None;
                    self.schemas = federated.schemas;
                }
                CompositionStatus::Failed {
                    reason: err.to_string(),
                }
            }
        };
        tracing::info!(?status, warnings = diagnostics.len(), "composition published");
        self.report = CompositionReport {
            status,
            diagnostics,
        };
    }
}
