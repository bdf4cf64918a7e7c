// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Recoverable composition findings and the per-rebuild report.

use std::fmt;

use serde::Serialize;

/// A recoverable problem found while composing. Never blocks composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// `path` is already being expanded further up the chain.
    CircularReference {
        /// Path that closed the cycle.
        path: String,
        /// Expansion chain at the point of detection (outermost first).
        chain: Vec<String>,
    },
    /// A reference head names no canonical node.
    DanglingReference {
        /// Node holding the reference (empty for root redirects).
        from: String,
        /// Missing path.
        target: String,
    },
    /// A reference tail did not match the target's children.
    TailMiss {
        /// Full reference.
        reference: String,
        /// First segment that failed to match.
        segment: String,
    },
    /// Attribute key without a schema of the same id.
    MissingSchema {
        /// Node carrying the attribute.
        path: String,
        /// Attribute key.
        key: String,
    },
    /// No root candidate among the collapsed nodes.
    NoRoot,
}

impl Diagnostic {
    pub(crate) fn emit(&self) {
        tracing::warn!("{self}");
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CircularReference { path, chain } => {
                write!(
                    f,
                    "circular reference to `{path}` via {}",
                    chain.join(" -> ")
                )
            }
            Self::DanglingReference { from, target } if from.is_empty() => {
                write!(f, "root redirect points at missing node `{target}`")
            }
            Self::DanglingReference { from, target } => {
                write!(f, "`{from}` references missing node `{target}`")
            }
            Self::TailMiss { reference, segment } => {
                write!(f, "reference `{reference}` has no child `{segment}`")
            }
            Self::MissingSchema { path, key } => {
                write!(f, "no schema for attribute `{key}` on `{path}`")
            }
            Self::NoRoot => f.write_str("no root found"),
        }
    }
}

/// Outcome class of the last recomposition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CompositionStatus {
    /// No recomposition has run yet.
    Idle,
    /// A tree was published.
    Composed {
        /// Nodes in the published tree.
        nodes: usize,
    },
    /// Every file is hidden or none is loaded.
    NoVisibleFiles,
    /// Entries exist but none qualifies as root.
    NoRoot,
    /// The rebuild aborted.
    Failed {
        /// Error message.
        reason: String,
    },
}

/// Status plus diagnostics of one recomposition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompositionReport {
    /// Outcome class.
    pub status: CompositionStatus,
    /// Recoverable findings, in discovery order.
    pub diagnostics: Vec<Diagnostic>,
}

impl Default for CompositionReport {
    fn default() -> Self {
        Self {
            status: CompositionStatus::Idle,
            diagnostics: Vec::new(),
        }
    }
}

impl CompositionReport {
    /// Findings excluding missing-schema notes.
    pub fn resolution_warnings(&self) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.diagnostics
            .iter()
            .filter(|d| !matches!(d, Diagnostic::MissingSchema { .. }))
    }
}
