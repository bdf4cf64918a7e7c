// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Reference resolution and tree expansion.
//!
//! Roots are the unreferenced plain paths of the node table. Each root is
//! expanded on an explicit work stack: `inherits` fill attribute gaps,
//! `children` become child nodes renamed to their slot. Cycles, dangling references and tail
//! misses drop only the affected branch and leave a [`Diagnostic`].

use std::collections::HashSet;

use crate::collapse::{CanonicalNode, NodeTable};
use crate::config::CompositionConfig;
use crate::diagnostics::Diagnostic;
use crate::error::ComposeError;
use crate::node::ComposedNode;
use crate::path;

/// Result of expanding a node table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composition {
    /// Composed root; `None` when no root could be built.
    pub root: Option<ComposedNode>,
    /// Findings in discovery order.
    pub diagnostics: Vec<Diagnostic>,
}

/// Plain paths that no other node names as a reference head, in table order.
pub fn find_roots(table: &NodeTable) -> Vec<&str> {
    let mut referenced = HashSet::new();
    for node in table.iter() {
        let inherited = node.inherits.references();
        for reference in node.children.references().chain(inherited) {
            let head = path::head(reference);
            if head != node.path {
                referenced.insert(head);
            }
        }
    }
    table
        .iter()
        .map(|n| n.path.as_str())
        .filter(|p| !path::is_compound(p) && !referenced.contains(p))
        .collect()
}

/// Build the composed tree for `table`.
pub fn compose(table: &NodeTable, config: &CompositionConfig) -> Result<Composition, ComposeError> {
    let roots = find_roots(table);
    tracing::debug!(candidates = roots.len(), "root detection");

    let name = config.synthetic_root_name.as_str();
    let mut expander = Expander::new(table, config.max_depth);
    let root = match roots.as_slice() {
        [] => {
            expander.note(Diagnostic::NoRoot);
            None
        }
        [only] => match table.get(only) {
            Some(canonical) if canonical.is_redirect() => {
                let mut targets = expander.expand_redirect(canonical)?;
                if canonical.inherits.len() == 1 {
                    targets.pop()
                } else {
                    Some(ComposedNode::synthetic(name, targets))
                }
            }
            _ => expander.expand(only)?,
        },
        many => {
            let mut children = Vec::new();
            for candidate in many {
                match table.get(candidate) {
                    Some(canonical) if canonical.is_redirect() => {
                        children.extend(expander.expand_redirect(canonical)?);
                    }
                    _ => children.extend(expander.expand(candidate)?),
                }
            }
            Some(ComposedNode::synthetic(name, children))
        }
    };

    Ok(Composition {
        root,
        diagnostics: expander.diagnostics,
    })
}

struct Expander<'a> {
    table: &'a NodeTable,
    max_depth: usize,
    /// Paths currently being expanded, outermost first.
    chain: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

/// A reference waiting for its head to finish expanding.
#[derive(Debug, Clone, Copy)]
struct Pending<'a> {
    /// Child slot; `None` for an inherit.
    slot: Option<&'a str>,
    reference: &'a str,
}

/// One node under construction on the work stack.
struct Frame<'a> {
    canonical: &'a CanonicalNode,
    node: ComposedNode,
    /// Next reference to visit: inherits first, then children.
    cursor: usize,
    /// Where the finished node goes in the frame below.
    delivery: Option<Pending<'a>>,
}

impl<'a> Frame<'a> {
    fn advance(&mut self) -> Option<Pending<'a>> {
        let canonical = self.canonical;
        let inherits = canonical.inherits.len();
        let pending = if self.cursor < inherits {
            canonical
                .inherits
                .at(self.cursor)
                .map(|(_, reference)| Pending {
                    slot: None,
                    reference,
                })
        } else {
            canonical
                .children
                .at(self.cursor - inherits)
                .map(|(slot, reference)| Pending {
                    slot: Some(slot),
                    reference,
                })
        };
        self.cursor += 1;
        pending
    }

    fn attach(&mut self, slot: Option<&str>, mut resolved: ComposedNode) {
        match slot {
            None => {
                for (key, value) in resolved.attributes {
                    self.node.attributes.entry(key).or_insert(value);
                }
            }
            Some(slot) => {
                slot.clone_into(&mut resolved.name);
                self.node.children.push(resolved);
            }
        }
    }
}

impl<'a> Expander<'a> {
    fn new(table: &'a NodeTable, max_depth: usize) -> Self {
        Self {
            table,
            max_depth,
            chain: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn note(&mut self, diagnostic: Diagnostic) {
        diagnostic.emit();
        self.diagnostics.push(diagnostic);
    }

    /// Start expanding `path`, or record why its branch is dropped.
    fn open(&mut self, path: &str) -> Result<Option<Frame<'a>>, ComposeError> {
        if self.chain.iter().any(|p| p == path) {
            self.note(Diagnostic::CircularReference {
                path: path.to_owned(),
                chain: self.chain.clone(),
            });
            return Ok(None);
        }
        let table = self.table;
        let Some(canonical) = table.get(path) else {
            self.note(Diagnostic::DanglingReference {
                from: self.chain.last().cloned().unwrap_or_default(),
                target: path.to_owned(),
            });
            return Ok(None);
        };
        if self.chain.len() >= self.max_depth {
            return Err(ComposeError::DepthExceeded {
                path: path.to_owned(),
                limit: self.max_depth,
            });
        }

        self.chain.push(path.to_owned());
        Ok(Some(Frame {
            canonical,
            node: ComposedNode {
                name: path::last_segment(path).to_owned(),
                path: path.to_owned(),
                attributes: canonical.attributes.clone(),
                children: Vec::new(),
                source_files: canonical.sources.clone(),
            },
            cursor: 0,
            delivery: None,
        }))
    }

    /// Expand `path` and everything it references.
    ///
    /// Runs on a heap work stack, so deep reference chains are bounded by
    /// `max_depth` rather than by the thread's stack size.
    fn expand(&mut self, path: &str) -> Result<Option<ComposedNode>, ComposeError> {
        let base = self.chain.len();
        let expanded = self.run(path);
        self.chain.truncate(base);
        expanded
    }

    fn run(&mut self, path: &str) -> Result<Option<ComposedNode>, ComposeError> {
        let Some(first) = self.open(path)? else {
            return Ok(None);
        };
        let mut stack = vec![first];
        while let Some(frame) = stack.last_mut() {
            if let Some(pending) = frame.advance() {
                if let Some(mut next) = self.open(path::head(pending.reference))? {
                    next.delivery = Some(pending);
                    stack.push(next);
                }
                continue;
            }

            let Some(done) = stack.pop() else { break };
            self.chain.pop();
            let (Some(parent), Some(pending)) = (stack.last_mut(), done.delivery) else {
                return Ok(Some(done.node));
            };
            if let Some(resolved) = self.descend(pending.reference, done.node) {
                parent.attach(pending.slot, resolved);
            }
        }
        Ok(None)
    }

    /// Detach the node the tail of `reference` addresses inside `target`.
    fn descend(&mut self, reference: &str, target: ComposedNode) -> Option<ComposedNode> {
        match target.into_descendant(path::tail(reference)) {
            Ok(node) => Some(node),
            Err(segment) => {
                self.note(Diagnostic::TailMiss {
                    reference: reference.to_owned(),
                    segment,
                });
                None
            }
        }
    }

    /// Expand the head of `reference`, then resolve its tail.
    fn resolve(&mut self, reference: &str) -> Result<Option<ComposedNode>, ComposeError> {
        let expanded = self.expand(path::head(reference))?;
        Ok(expanded.and_then(|target| self.descend(reference, target)))
    }

    /// Targets of an inherits-only root, skipping the redirect layer itself.
    fn expand_redirect(
        &mut self,
        canonical: &CanonicalNode,
    ) -> Result<Vec<ComposedNode>, ComposeError> {
        self.chain.push(canonical.path.clone());
        let mut targets = Vec::with_capacity(canonical.inherits.len());
        let mut outcome = Ok(());
        for reference in canonical.inherits.references() {
            match self.resolve(reference) {
                Ok(found) => targets.extend(found),
                Err(err) => {
                    outcome = Err(err);
                    break;
                }
            }
        }
        self.chain.pop();
        outcome.map(|()| targets)
    }
}
