//! Structural editing, copying, transclusion, and linearization over a
//! `Document`.
//!
//! # Responsibility
//! - Keep tree invariants across destructive edits.
//! - Report "nothing changed" as a typed reason instead of a silent no-op.
//!
//! # Invariants
//! - An `Err(EditError)` leaves the root tree unchanged.
//! - Every node in a child list is linked back to that parent.

use crate::model::node::NodeId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod copy;
pub mod linearize;
pub mod mutation;
pub mod proxy;

/// Result type used by tree edit operations.
pub type EditResult<T> = Result<T, EditError>;

/// Reasons an edit left the tree unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// Node id is not present in the document.
    NodeNotFound(NodeId),
    /// Node has no parent (root or detached).
    NoParent(NodeId),
    /// Promote needs a preceding sibling.
    NoPrecedingSibling(NodeId),
    /// Demote needs a grandparent.
    NoGrandparent(NodeId),
    /// Move is already at the first/last sibling position.
    AtBoundary(NodeId),
    /// Child lists of proxies are derived from their target and not editable.
    ProxyContainer(NodeId),
    /// Node to insert is still attached somewhere.
    NotDetached(NodeId),
    /// Node is not part of the outline.
    Detached(NodeId),
    /// Insertion would place a node below itself.
    CycleDetected { node: NodeId, parent: NodeId },
    /// Node is the target of a proxy that would be left dangling.
    TargetOfLiveProxy(NodeId),
}

impl Display for EditError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NodeNotFound(id) => write!(f, "node not found: {id}"),
            Self::NoParent(id) => write!(f, "node has no parent: {id}"),
            Self::NoPrecedingSibling(id) => write!(f, "node has no preceding sibling: {id}"),
            Self::NoGrandparent(id) => write!(f, "node has no grandparent: {id}"),
            Self::AtBoundary(id) => write!(f, "node cannot move further: {id}"),
            Self::ProxyContainer(id) => {
                write!(f, "children of transcluded node cannot be restructured: {id}")
            }
            Self::NotDetached(id) => write!(f, "node is still attached: {id}"),
            Self::Detached(id) => write!(f, "node is not part of the outline: {id}"),
            Self::CycleDetected { node, parent } => {
                write!(f, "insert would create cycle: node {node} under parent {parent}")
            }
            Self::TargetOfLiveProxy(id) => {
                write!(f, "node is transcluded elsewhere and cannot be removed: {id}")
            }
        }
    }
}

impl Error for EditError {}
