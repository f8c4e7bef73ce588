//! Flattens the visible part of the outline into display order.
//!
//! # Invariants
//! - Yields the root's children first, at depth 1, then descends only into
//!   expanded nodes.
//! - Proxies contribute their wrapper list, so callers refresh visible
//!   proxies before linearizing.

use crate::model::document::Document;
use crate::model::node::NodeId;

/// One visible row: which node, and how deep below the root it sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleEntry {
    pub node: NodeId,
    pub depth: usize,
}

/// Pre-order iterator over visible nodes.
#[derive(Debug, Clone)]
pub struct Linearizer<'a> {
    document: &'a Document,
    stack: Vec<VisibleEntry>,
}

impl<'a> Linearizer<'a> {
    pub fn new(document: &'a Document) -> Self {
        let stack = document
            .children(document.root())
            .iter()
            .rev()
            .map(|node| VisibleEntry {
                node: *node,
                depth: 1,
            })
            .collect();
        Self { document, stack }
    }
}

impl Iterator for Linearizer<'_> {
    type Item = VisibleEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.stack.pop()?;
        if self.document.is_expanded(entry.node) {
            self.stack.extend(
                self.document
                    .children(entry.node)
                    .iter()
                    .rev()
                    .map(|child| VisibleEntry {
                        node: *child,
                        depth: entry.depth + 1,
                    }),
            );
        }
        Some(entry)
    }
}

impl Document {
    pub fn linearize(&self) -> Vec<VisibleEntry> {
        Linearizer::new(self).collect()
    }
}

/// Index of `node` in a linearized view.
pub fn position_of(view: &[VisibleEntry], node: NodeId) -> Option<usize> {
    view.iter().position(|entry| entry.node == node)
}
