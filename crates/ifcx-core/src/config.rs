// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Composition settings (persisted by app layers as JSON).

use serde::{Deserialize, Serialize};

/// What to publish when a rebuild aborts with a [`crate::ComposeError`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Publish no tree.
    #[default]
    Clear,
    /// Keep the previously published tree.
    KeepLastGood,
}

/// Knobs for the composition pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionConfig {
    /// Longest expansion chain before the rebuild aborts.
    pub max_depth: usize,
    /// Behavior on aborted rebuilds.
    pub on_error: ErrorPolicy,
    /// Name of the synthesized root used for multi-root results.
    pub synthetic_root_name: String,
    /// Emit `MissingSchema` diagnostics.
    pub validate_schemas: bool,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            max_depth: 512,
            on_error: ErrorPolicy::Clear,
            synthetic_root_name: "Root".to_owned(),
            validate_schemas: true,
        }
    }
}
