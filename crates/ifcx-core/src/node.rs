// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The composed tree handed to renderers and selection consumers.

use serde::Serialize;

use crate::document::Attributes;
use crate::path;

/// Fully resolved tree node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposedNode {
    /// Last path segment, or the child slot that placed this node.
    pub name: String,
    /// Canonical path (empty on a synthesized root).
    pub path: String,
    /// Own attributes over inherited ones.
    pub attributes: Attributes,
    /// Children in slot order.
    pub children: Vec<ComposedNode>,
    /// Files that contributed to this node's canonical record.
    pub source_files: Vec<String>,
}

impl ComposedNode {
    /// Synthesized container root with no path.
    pub fn synthetic(name: impl Into<String>, children: Vec<ComposedNode>) -> Self {
        Self {
            name: name.into(),
            children,
            ..Self::default()
        }
    }

    /// Direct child named `name`.
    pub fn child(&self, name: &str) -> Option<&ComposedNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Descend by `/`-separated child names; an empty path is `self`.
    pub fn find(&self, names: &str) -> Option<&ComposedNode> {
        path::segments(names).try_fold(self, |node, seg| node.child(seg))
    }

    /// Detach the descendant addressed by `names`, consuming `self`.
    ///
    /// On a miss returns the first segment that failed to match.
    pub(crate) fn into_descendant(self, names: &str) -> Result<ComposedNode, String> {
        let mut node = self;
        for seg in path::segments(names) {
            let pos = node
                .children
                .iter()
                .position(|c| c.name == seg)
                .ok_or_else(|| seg.to_owned())?;
            node = node.children.swap_remove(pos);
        }
        Ok(node)
    }

    /// Nodes in this subtree, `self` included.
    pub fn node_count(&self) -> usize {
        self.walk().count()
    }

    /// Depth-first pre-order `(depth, node)` pairs, root at depth 0.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(0, self)],
        }
    }
}

/// Iterator returned by [`ComposedNode::walk`].
#[derive(Debug, Clone)]
pub struct Walk<'a> {
    stack: Vec<(usize, &'a ComposedNode)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a ComposedNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|child| (depth + 1, child)));
        Some((depth, node))
    }
}
