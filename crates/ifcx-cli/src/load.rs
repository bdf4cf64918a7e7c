// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Build a federation from command-line file arguments.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{bail, Context, Result};
use ifcx_core::{
    ComposedNode, CompositionConfig, Federation, FederationObserver, FileInfo, IfcxDocument,
};

use crate::cli::LayerArgs;

/// Logs each notification the federation publishes.
struct TraceObserver;

impl FederationObserver for TraceObserver {
    fn composition_changed(&mut self, root: Option<&ComposedNode>) {
        let nodes = root.map_or(0, ComposedNode::node_count);
        tracing::debug!(nodes, "composition changed");
    }

    fn files_changed(&mut self, files: &[FileInfo]) {
        let visible = files.iter().filter(|f| f.visible).count();
        tracing::debug!(files = files.len(), visible, "files changed");
    }
}

fn read_document(path: &Path) -> Result<IfcxDocument> {
    let file = File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    IfcxDocument::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to load {}", path.display()))
}

fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    )
}

fn check_order(order: &[usize], len: usize) -> Result<()> {
    let unique: HashSet<_> = order.iter().copied().collect();
    if order.len() != len || unique.len() != len || order.iter().any(|&i| i >= len) {
        bail!("--order must list each position 0..{len} exactly once");
    }
    Ok(())
}

/// Load every file (in argument order), hide and reorder as requested.
pub fn federation_from_args(args: &LayerArgs, config: CompositionConfig) -> Result<Federation> {
    let len = args.files.len();
    if let Some(&bad) = args.hide.iter().find(|&&i| i >= len) {
        bail!("--hide {bad} is out of range for {len} file(s)");
    }
    if let Some(order) = &args.order {
        check_order(order, len)?;
    }

    let documents = args
        .files
        .iter()
        .map(|p| read_document(p).map(|doc| (display_name(p), doc)))
        .collect::<Result<Vec<_>>>()?;

    let mut federation = Federation::new(config);
    federation.subscribe(TraceObserver);
    for (name, document) in documents {
        federation.add_file(name, document);
    }
    for &index in &args.hide {
        federation.set_file_visibility(index, false);
    }
    if let Some(order) = &args.order {
        // Mirror of the federation's current order, as original positions.
        let mut current: Vec<usize> = (0..len).collect();
        for (target, wanted) in order.iter().enumerate() {
            let Some(from) = current.iter().position(|i| i == wanted) else {
                continue;
            };
            if from != target {
                federation.move_file(from, target);
                let moved = current.remove(from);
                current.insert(target, moved);
            }
        }
    }
    Ok(federation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_and_malformed_files_name_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let err = read_document(&missing).unwrap_err();
        assert!(err.to_string().starts_with("failed to open"));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{\"data\": [").unwrap();
        let err = read_document(&broken).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
        assert!(err
            .chain()
            .any(|cause| cause.to_string().starts_with("parse error")));
    }

    #[test]
    fn order_must_be_a_permutation() {
        assert!(check_order(&[1, 0, 2], 3).is_ok());
        assert!(check_order(&[0, 0, 1], 3).is_err());
        assert!(check_order(&[0, 1], 3).is_err());
        assert!(check_order(&[0, 1, 3], 3).is_err());
    }
}
