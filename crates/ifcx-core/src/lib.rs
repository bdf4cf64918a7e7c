// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! IFCX federation core.
//!
//! Combines independently authored IFCX files into one composed tree:
//!
//! 1. [`federate`] concatenates the visible files' entries and merges their
//!    schemas in file order;
//! 2. [`collapse`] folds same-path entries into one [`CanonicalNode`]
//!    (shallow, later-wins per key);
//! 3. [`compose`] finds the roots and expands `inherits` / `children`
//!    references into a [`ComposedNode`] tree, breaking cycles locally.
//!
//! [`Federation`] owns the file list and runs the pipeline on every mutation,
//! publishing the result to [`FederationObserver`]s.

pub mod collapse;
pub mod compose;
pub mod config;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod federate;
pub mod federation;
pub mod flatten;
pub mod node;
pub mod path;
pub mod refmap;
pub mod schema;

pub use collapse::{collapse, CanonicalNode, NodeTable};
pub use compose::{compose, find_roots, Composition};
pub use config::{CompositionConfig, ErrorPolicy};
pub use diagnostics::{CompositionReport, CompositionStatus, Diagnostic};
pub use document::{Attributes, IfcxDocument, QuantityKind, RawEntry, SchemaDef, SchemaTable};
pub use error::{ComposeError, DocumentError};
pub use federate::{federate, Federated, FileInfo, FileLayer, TaggedEntry};
pub use federation::{Federation, FederationObserver};
pub use flatten::flatten_attributes;
pub use node::{ComposedNode, Walk};
pub use refmap::RefMap;
