//! Outline node model.
//!
//! # Responsibility
//! - Define the node record stored in a `Document` arena.
//! - Keep plain items and proxies as one closed tagged variant.
//!
//! # Invariants
//! - `NodeId` is stable and never reused for another node.
//! - `parent` and `ProxyLink::target` are non-owning handles.
//! - `editing` is transient and never persisted.

use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for every node in an outline.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NodeId = Uuid;

/// Text given to the last top-level node when a delete would empty the outline.
pub const EMPTY_PLACEHOLDER: &str = "empty";

/// One arena slot: per-position state plus the variant body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) expanded: bool,
    pub(crate) editing: bool,
    pub(crate) body: NodeBody,
}

/// Closed set of node shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeBody {
    /// Owns content and children.
    Item(Item),
    /// Delegates content to another node (transclusion).
    Proxy(ProxyLink),
}

/// Content and owned structure of a plain node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Seconds since the Unix epoch.
    pub created_at: i64,
    /// Seconds since the Unix epoch; refreshed by content and structural edits.
    pub changed_at: i64,
    pub text: String,
    /// Auto-numbering of children. Stored only.
    pub numbered: bool,
    pub checked: bool,
    pub(crate) children: Vec<NodeId>,
    pub(crate) meta: Option<NodeId>,
}

/// Reference from a proxy to its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyLink {
    pub(crate) target: NodeId,
    /// Cached wrapper proxies, one per perceived child of the target.
    pub(crate) wrappers: Vec<NodeId>,
    /// `true` for wrappers generated under another proxy.
    pub(crate) derived: bool,
}

impl Node {
    /// Creates a detached item stamped with the current time.
    pub fn item(text: impl Into<String>) -> Self {
        let now = now_secs();
        Self::from_item(Item {
            created_at: now,
            changed_at: now,
            text: text.into(),
            numbered: false,
            checked: false,
            children: Vec::new(),
            meta: None,
        })
    }

    pub(crate) fn from_item(item: Item) -> Self {
        Self {
            parent: None,
            expanded: false,
            editing: false,
            body: NodeBody::Item(item),
        }
    }

    /// Creates a detached proxy pointing at `target`.
    pub(crate) fn proxy(target: NodeId, derived: bool) -> Self {
        Self {
            parent: None,
            expanded: false,
            editing: false,
            body: NodeBody::Proxy(ProxyLink {
                target,
                wrappers: Vec::new(),
                derived,
            }),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn body(&self) -> &NodeBody {
        &self.body
    }

    pub fn is_proxy(&self) -> bool {
        matches!(self.body, NodeBody::Proxy(_))
    }

    pub(crate) fn as_item(&self) -> Option<&Item> {
        match &self.body {
            NodeBody::Item(item) => Some(item),
            NodeBody::Proxy(_) => None,
        }
    }

    pub(crate) fn as_item_mut(&mut self) -> Option<&mut Item> {
        match &mut self.body {
            NodeBody::Item(item) => Some(item),
            NodeBody::Proxy(_) => None,
        }
    }

    pub(crate) fn as_proxy(&self) -> Option<&ProxyLink> {
        match &self.body {
            NodeBody::Proxy(link) => Some(link),
            NodeBody::Item(_) => None,
        }
    }

    pub(crate) fn as_proxy_mut(&mut self) -> Option<&mut ProxyLink> {
        match &mut self.body {
            NodeBody::Proxy(link) => Some(link),
            NodeBody::Item(_) => None,
        }
    }

    /// Child handles as seen from this node's position.
    ///
    /// Items return owned children; proxies return their wrapper cache.
    pub(crate) fn child_ids(&self) -> &[NodeId] {
        match &self.body {
            NodeBody::Item(item) => &item.children,
            NodeBody::Proxy(link) => &link.wrappers,
        }
    }
}

impl Item {
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn meta(&self) -> Option<NodeId> {
        self.meta
    }

    pub(crate) fn touch(&mut self) {
        self.changed_at = now_secs();
    }
}

impl ProxyLink {
    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn is_derived(&self) -> bool {
        self.derived
    }
}

/// Current wall-clock time in seconds since the Unix epoch.
///
/// Falls back to `0` if the clock reports a time before the epoch.
pub fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or(0)
}
