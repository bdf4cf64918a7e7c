// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error types for document loading and composition.

use thiserror::Error;

/// Failure while reading or parsing an IFCX document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// I/O error while reading the source.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The source is not a well-formed IFCX JSON document.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Unexpected failure that aborts one recomposition.
///
/// Local resolution problems (cycles, dangling references, tail misses) are
/// never errors; they surface as [`crate::Diagnostic`]s instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    /// The reference chain grew past the configured depth limit.
    #[error("reference chain exceeded depth {limit} at `{path}`")]
    DepthExceeded {
        /// Path that would have been expanded next.
        path: String,
        /// Configured limit.
        limit: usize,
    },
}
