//! Outline document arena.
//!
//! # Responsibility
//! - Own every node of one outline, keyed by `NodeId`.
//! - Answer content queries (delegating through proxies) and structural
//!   queries (using each node's own position).
//!
//! # Invariants
//! - `root` always exists, has no parent, and is expanded.
//! - A node listed in `children` of X has `parent == Some(X)`.
//! - Proxy chains resolve to an item in at most `nodes.len()` hops.

use crate::model::node::{Item, Node, NodeBody, NodeId};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Root text of a fresh outline.
pub const DEFAULT_TITLE: &str = "TODO";
/// Text of the single top-level item of a fresh outline.
pub const DEFAULT_ITEM_TEXT: &str = "Item";

/// One outline: root tree, optional config node, and any detached nodes still
/// referenced by the editing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
    config: Option<NodeId>,
}

impl Document {
    /// Creates a document holding only an expanded root.
    pub fn new(title: impl Into<String>) -> Self {
        let root = Uuid::new_v4();
        let mut root_node = Node::item(title);
        root_node.expanded = true;

        let mut nodes = HashMap::new();
        nodes.insert(root, root_node);
        Self {
            nodes,
            root,
            config: None,
        }
    }

    /// Creates the startup outline: root `TODO`, one child `Item`, empty config.
    pub fn with_default_outline() -> Self {
        let mut document = Self::new(DEFAULT_TITLE);
        let item = document.insert(Node::item(DEFAULT_ITEM_TEXT));
        document.attach_last(document.root, item);
        let config = document.insert(Node::item(""));
        document.config = Some(config);
        document
    }

    /// Builds a document from decoded parts, then derives parent links and
    /// resets transient state.
    pub(crate) fn from_parts(
        nodes: HashMap<NodeId, Node>,
        root: NodeId,
        config: Option<NodeId>,
    ) -> Self {
        let mut document = Self {
            nodes,
            root,
            config,
        };
        document.link_parents();
        document.reset_transient_state();
        document
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn config(&self) -> Option<NodeId> {
        self.config
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Every id in the arena, in no particular order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Number of arena slots, including detached and wrapper nodes.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    /// Number of positions in the root tree, root included.
    ///
    /// Proxies count once; their wrappers are not positions of their own.
    pub fn tree_len(&self) -> usize {
        self.owned_subtree(self.root).len()
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Stores a detached node under a fresh id.
    pub(crate) fn insert(&mut self, node: Node) -> NodeId {
        let id = Uuid::new_v4();
        self.nodes.insert(id, node);
        id
    }

    // ---- content, delegated through proxies ----

    /// Follows proxy targets until a plain item is reached.
    pub fn resolve(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        for _ in 0..=self.nodes.len() {
            match &self.nodes.get(&current)?.body {
                NodeBody::Item(_) => return Some(current),
                NodeBody::Proxy(link) => current = link.target,
            }
        }
        None
    }

    /// Content of `id`, resolved through proxies.
    pub fn item(&self, id: NodeId) -> Option<&Item> {
        let resolved = self.resolve(id)?;
        self.nodes.get(&resolved).and_then(Node::as_item)
    }

    pub(crate) fn item_mut(&mut self, id: NodeId) -> Option<&mut Item> {
        let resolved = self.resolve(id)?;
        self.nodes.get_mut(&resolved).and_then(Node::as_item_mut)
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.item(id).map(|item| item.text.as_str())
    }

    pub fn is_checked(&self, id: NodeId) -> bool {
        self.item(id).is_some_and(|item| item.checked)
    }

    pub fn is_numbered(&self, id: NodeId) -> bool {
        self.item(id).is_some_and(|item| item.numbered)
    }

    pub fn created_at(&self, id: NodeId) -> Option<i64> {
        self.item(id).map(|item| item.created_at)
    }

    pub fn changed_at(&self, id: NodeId) -> Option<i64> {
        self.item(id).map(|item| item.changed_at)
    }

    pub fn meta(&self, id: NodeId) -> Option<NodeId> {
        self.item(id).and_then(Item::meta)
    }

    pub fn is_proxy(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(Node::is_proxy)
    }

    pub fn proxy_target(&self, id: NodeId) -> Option<NodeId> {
        self.nodes
            .get(&id)
            .and_then(Node::as_proxy)
            .map(|link| link.target)
    }

    /// Refreshes `changed_at` on the node's own item. Proxies carry no
    /// timestamps of their own, so structural stamps on them are ignored.
    pub(crate) fn touch(&mut self, id: NodeId) {
        if let Some(item) = self.nodes.get_mut(&id).and_then(Node::as_item_mut) {
            item.touch();
        }
    }

    // ---- view state, per position ----

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(|node| node.expanded)
    }

    /// Sets the expansion flag. The root stays expanded.
    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) -> bool {
        if id == self.root && !expanded {
            return false;
        }
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.expanded = expanded;
                true
            }
            None => false,
        }
    }

    pub fn is_editing(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(|node| node.editing)
    }

    pub fn set_editing(&mut self, id: NodeId, editing: bool) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.editing = editing;
        }
    }

    // ---- structure, per position ----

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|node| node.parent)
    }

    /// Perceived children: owned children for items, wrappers for proxies.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map(Node::child_ids).unwrap_or(&[])
    }

    /// Whether the node has children, looking through proxies so that an
    /// unrefreshed wrapper cache does not hide them.
    pub fn has_children(&self, id: NodeId) -> bool {
        self.item(id).is_some_and(|item| !item.children.is_empty())
    }

    /// Whether the node sits in a proxy's wrapper list.
    pub fn is_in_proxy_container(&self, id: NodeId) -> bool {
        self.parent(id).is_some_and(|parent| self.is_proxy(parent))
    }

    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|child| *child == id)
    }

    pub fn preceding_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        index
            .checked_sub(1)
            .map(|previous| self.children(parent)[previous])
    }

    pub fn is_first_sibling(&self, id: NodeId) -> bool {
        self.index_in_parent(id) == Some(0)
    }

    pub fn is_last_sibling(&self, id: NodeId) -> bool {
        match (self.parent(id), self.index_in_parent(id)) {
            (Some(parent), Some(index)) => index + 1 == self.children(parent).len(),
            _ => false,
        }
    }

    /// Number of ancestors. Top-level nodes have depth 1, the root 0.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut cursor = self.parent(id);
        while let Some(current) = cursor {
            depth += 1;
            cursor = self.parent(current);
        }
        depth
    }

    /// Parent links from `id` up to `ancestor`, or `None` when `ancestor` is
    /// not above `id`.
    pub fn depth_below(&self, id: NodeId, ancestor: NodeId) -> Option<usize> {
        let mut depth = 0;
        let mut cursor = self.parent(id);
        while let Some(current) = cursor {
            depth += 1;
            if current == ancestor {
                return Some(depth);
            }
            cursor = self.parent(current);
        }
        None
    }

    /// Whether `node` lies somewhere below `ancestor`.
    pub fn has_descendant(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.depth_below(node, ancestor).is_some()
    }

    /// Whether the node is the root or hangs below it.
    pub fn is_attached(&self, id: NodeId) -> bool {
        id == self.root || self.has_descendant(self.root, id)
    }

    /// `id` plus every node it owns through `children` and `meta`, pre-order.
    ///
    /// Proxies are leaves here: wrappers and targets are not owned.
    pub fn owned_subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(&current) else {
                continue;
            };
            out.push(current);
            if let Some(item) = node.as_item() {
                if let Some(meta) = item.meta {
                    stack.push(meta);
                }
                stack.extend(item.children.iter().rev().copied());
            }
        }
        out
    }

    // ---- raw structural primitives used by the mutation engine ----

    /// Appends `child` to `parent`'s owned children and links it.
    pub(crate) fn attach_last(&mut self, parent: NodeId, child: NodeId) {
        if let Some(item) = self.nodes.get_mut(&parent).and_then(Node::as_item_mut) {
            item.children.push(child);
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
    }

    /// Inserts `child` at `index` (clamped) in `parent`'s owned children.
    pub(crate) fn attach_at(&mut self, parent: NodeId, index: usize, child: NodeId) {
        if let Some(item) = self.nodes.get_mut(&parent).and_then(Node::as_item_mut) {
            let index = index.min(item.children.len());
            item.children.insert(index, child);
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
    }

    /// Removes `child` from its parent's owned children and clears its link.
    pub(crate) fn detach(&mut self, child: NodeId) -> Option<usize> {
        let parent = self.parent(child)?;
        let item = self.nodes.get_mut(&parent).and_then(Node::as_item_mut)?;
        let index = item.children.iter().position(|id| *id == child)?;
        item.children.remove(index);
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = None;
        }
        Some(index)
    }

    pub(crate) fn swap_children(&mut self, parent: NodeId, left: usize, right: usize) {
        if let Some(item) = self.nodes.get_mut(&parent).and_then(Node::as_item_mut) {
            item.children.swap(left, right);
        }
    }

    // ---- load-time passes ----

    /// Assigns `parent` back-references from owned child lists.
    pub(crate) fn link_parents(&mut self) {
        let mut links = Vec::new();
        for (id, node) in &self.nodes {
            if let Some(item) = node.as_item() {
                links.extend(item.children.iter().map(|child| (*child, *id)));
            }
        }
        for node in self.nodes.values_mut() {
            node.parent = None;
        }
        for (child, parent) in links {
            if let Some(node) = self.nodes.get_mut(&child) {
                node.parent = Some(parent);
            }
        }
    }

    /// Clears editing flags and wrapper caches; expands the root.
    pub(crate) fn reset_transient_state(&mut self) {
        let wrappers: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.as_proxy().is_some_and(|link| link.derived))
            .map(|(id, _)| *id)
            .collect();
        for id in wrappers {
            self.nodes.remove(&id);
        }
        for node in self.nodes.values_mut() {
            node.editing = false;
            if let Some(link) = node.as_proxy_mut() {
                link.wrappers.clear();
            }
        }
        if let Some(root) = self.nodes.get_mut(&self.root) {
            root.expanded = true;
            root.parent = None;
        }
    }

    /// Drops every node not reachable from the root, the config node, or
    /// `pinned`. Returns how many slots were released.
    pub fn retain_reachable(&mut self, pinned: &[NodeId]) -> usize {
        let mut seen = HashSet::new();
        let mut stack = vec![self.root];
        stack.extend(self.config);
        stack.extend(pinned.iter().copied());

        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            let Some(node) = self.nodes.get(&current) else {
                continue;
            };
            match &node.body {
                NodeBody::Item(item) => {
                    stack.extend(item.children.iter().copied());
                    stack.extend(item.meta);
                }
                NodeBody::Proxy(link) => {
                    stack.push(link.target);
                    stack.extend(link.wrappers.iter().copied());
                }
            }
        }

        let before = self.nodes.len();
        self.nodes.retain(|id, _| seen.contains(id));
        before - self.nodes.len()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::with_default_outline()
    }
}

#[cfg(test)]
mod tests {
    use super::{Document, DEFAULT_ITEM_TEXT, DEFAULT_TITLE};
    use crate::model::node::Node;

    fn chain() -> (Document, [uuid::Uuid; 3]) {
        let mut doc = Document::new("root");
        let opp = doc.insert(Node::item("opp"));
        let op = doc.insert(Node::item("op"));
        let o = doc.insert(Node::item("o"));
        doc.attach_last(doc.root(), opp);
        doc.attach_last(opp, op);
        doc.attach_last(op, o);
        (doc, [opp, op, o])
    }

    #[test]
    fn default_outline_has_root_and_one_item() {
        let doc = Document::with_default_outline();

        assert_eq!(doc.text(doc.root()), Some(DEFAULT_TITLE));
        assert!(doc.is_expanded(doc.root()));
        let children = doc.children(doc.root());
        assert_eq!(children.len(), 1);
        assert_eq!(doc.text(children[0]), Some(DEFAULT_ITEM_TEXT));
        assert!(doc.config().is_some());
    }

    #[test]
    fn depth_counts_parent_links() {
        let (doc, [opp, op, o]) = chain();

        assert_eq!(doc.depth(doc.root()), 0);
        assert_eq!(doc.depth(opp), 1);
        assert_eq!(doc.depth(o), 3);
        assert_eq!(doc.depth_below(o, op), Some(1));
        assert_eq!(doc.depth_below(o, opp), Some(2));
        assert_eq!(doc.depth_below(o, doc.root()), Some(doc.depth(o)));
        assert_eq!(doc.depth_below(opp, o), None);
    }

    #[test]
    fn detached_node_has_depth_zero() {
        let mut doc = Document::new("root");
        let loose = doc.insert(Node::item("loose"));

        assert_eq!(doc.depth(loose), 0);
        assert!(!doc.is_attached(loose));
    }

    #[test]
    fn sibling_flags_follow_child_order() {
        let mut doc = Document::new("root");
        let a = doc.insert(Node::item("a"));
        let b = doc.insert(Node::item("b"));
        doc.attach_last(doc.root(), a);
        doc.attach_last(doc.root(), b);

        assert!(doc.is_first_sibling(a));
        assert!(!doc.is_last_sibling(a));
        assert!(doc.is_last_sibling(b));
        assert_eq!(doc.preceding_sibling(b), Some(a));
        assert_eq!(doc.preceding_sibling(a), None);
        assert!(!doc.is_first_sibling(doc.root()));
    }

    #[test]
    fn root_cannot_be_collapsed() {
        let mut doc = Document::with_default_outline();
        let root = doc.root();

        assert!(!doc.set_expanded(root, false));
        assert!(doc.is_expanded(root));
    }

    #[test]
    fn retain_reachable_keeps_pinned_and_drops_orphans() {
        let mut doc = Document::with_default_outline();
        let pinned = doc.insert(Node::item("clipboard"));
        let orphan = doc.insert(Node::item("orphan"));

        let released = doc.retain_reachable(&[pinned]);

        assert_eq!(released, 1);
        assert!(doc.contains(pinned));
        assert!(!doc.contains(orphan));
    }

    #[test]
    fn link_parents_rebuilds_back_references() {
        let (mut doc, [opp, op, o]) = chain();
        for id in [opp, op, o] {
            doc.node_mut(id).expect("node").parent = None;
        }

        doc.link_parents();

        assert_eq!(doc.parent(opp), Some(doc.root()));
        assert_eq!(doc.parent(o), Some(op));
    }
}
