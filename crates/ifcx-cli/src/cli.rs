// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use ifcx_core::ErrorPolicy;

#[derive(Parser, Debug)]
#[command(name = "ifcx", author, version, about = "Compose federated IFCX files")]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Directory holding saved preferences (defaults to the platform config dir)
    #[arg(long, global = true, env = "IFCX_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compose the files and print the resulting tree
    Compose {
        #[command(flatten)]
        layers: LayerArgs,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Tree)]
        format: Format,
        /// Show canonical paths in the outline
        #[arg(long)]
        paths: bool,
        /// Show contributing files in the outline
        #[arg(long)]
        sources: bool,
    },
    /// List file layers in federation order
    Layers {
        #[command(flatten)]
        layers: LayerArgs,
    },
    /// Print the flattened attributes of one composed node
    Inspect {
        #[command(flatten)]
        layers: LayerArgs,
        /// Child names from the root, separated by `/` (empty for the root)
        #[arg(long, default_value = "")]
        node: String,
    },
    /// Show or change saved composition settings
    Config(ConfigArgs),
}

/// Files plus visibility/order adjustments shared by the loading commands.
#[derive(Args, Debug)]
pub struct LayerArgs {
    /// IFCX JSON files, lowest priority first
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
    /// Hide the file at this position (repeatable)
    #[arg(long)]
    pub hide: Vec<usize>,
    /// Final federation order as positions of FILES, e.g. `2,0,1`
    #[arg(long, value_delimiter = ',')]
    pub order: Option<Vec<usize>>,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Longest reference chain before a rebuild aborts
    #[arg(long)]
    pub max_depth: Option<usize>,
    /// What to publish when a rebuild aborts
    #[arg(long, value_enum)]
    pub on_error: Option<OnError>,
    /// Name of the synthesized multi-root container
    #[arg(long)]
    pub root_name: Option<String>,
    /// Report attributes without a schema
    #[arg(long)]
    pub validate_schemas: Option<bool>,
    /// Show paths in tree outlines by default
    #[arg(long)]
    pub show_paths: Option<bool>,
    /// Show contributing files in tree outlines by default
    #[arg(long)]
    pub show_sources: Option<bool>,
    /// Restore defaults before applying other flags
    #[arg(long)]
    pub reset: bool,
}

impl ConfigArgs {
    pub fn changes_anything(&self) -> bool {
        self.reset
            || self.max_depth.is_some()
            || self.on_error.is_some()
            || self.root_name.is_some()
            || self.validate_schemas.is_some()
            || self.show_paths.is_some()
            || self.show_sources.is_some()
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// Indented outline
    Tree,
    /// Pretty JSON export of the composed tree
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OnError {
    /// Publish no tree
    Clear,
    /// Keep the previous tree
    KeepLastGood,
}

impl From<OnError> for ErrorPolicy {
    fn from(value: OnError) -> Self {
        match value {
            OnError::Clear => ErrorPolicy::Clear,
            OnError::KeepLastGood => ErrorPolicy::KeepLastGood,
        }
    }
}
