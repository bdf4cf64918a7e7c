// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Persisted workspace preferences (composition settings + tree display).

use ifcx_core::CompositionConfig;
use serde::{Deserialize, Serialize};

/// Config key under which [`WorkspacePrefs`] is stored.
pub const PREFS_KEY: &str = "workspace";

/// Saved preferences for an IFCX front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WorkspacePrefs {
    /// Composition pipeline settings.
    pub composition: CompositionConfig,
    /// Tree outline toggles.
    pub tree: TreeDisplayPrefs,
}

/// How composed trees are printed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeDisplayPrefs {
    /// Show each node's canonical path next to its name.
    pub show_paths: bool,
    /// Show contributing files.
    pub show_sources: bool,
    /// Print attribute counts.
    pub show_attribute_counts: bool,
    /// Indentation width per level.
    pub indent: usize,
}

impl Default for TreeDisplayPrefs {
    fn default() -> Self {
        Self {
            show_paths: false,
            show_sources: false,
            show_attribute_counts: true,
            indent: 2,
        }
    }
}
