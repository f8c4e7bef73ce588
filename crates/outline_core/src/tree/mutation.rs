//! Tree mutation engine.
//!
//! # Responsibility
//! - Insert, delete, reparent, reorder, and edit content of nodes.
//! - Stamp `changed_at` on every node whose content or child list changed.
//!
//! # Invariants
//! - The last top-level node is cleared instead of removed.
//! - Child lists owned by a proxy's target are only edited through the
//!   target itself, never through wrapper positions.

use super::{EditError, EditResult};
use crate::model::document::Document;
use crate::model::node::{Node, NodeId, EMPTY_PLACEHOLDER};

/// What `Document::delete` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
    /// Node was unlinked from its parent and is now detached.
    Removed,
    /// Node was the last top-level node; the node now in its place was reset
    /// to the placeholder.
    Cleared(NodeId),
}

impl Document {
    /// Creates a detached empty-text item.
    pub fn create_item(&mut self, text: impl Into<String>) -> NodeId {
        self.insert(Node::item(text))
    }

    /// Appends a new empty item as last child of `parent` and returns the id
    /// to focus.
    ///
    /// Adding under a proxy adds to its resolved target; the returned id is
    /// the proxy's wrapper for the new child.
    pub fn add_child(&mut self, parent: NodeId) -> EditResult<NodeId> {
        let container = self
            .resolve(parent)
            .ok_or(EditError::NodeNotFound(parent))?;
        let child = self.create_item("");
        self.attach_last(container, child);
        self.touch(container);

        if container == parent {
            return Ok(child);
        }
        self.refresh_wrappers(parent);
        Ok(self
            .children(parent)
            .iter()
            .copied()
            .find(|wrapper| self.resolve(*wrapper) == Some(child))
            .unwrap_or(child))
    }

    /// Inserts detached `item` right after `sibling`.
    pub fn insert_after(&mut self, sibling: NodeId, item: NodeId) -> EditResult<()> {
        self.ensure_exists(sibling)?;
        self.ensure_exists(item)?;
        if item == self.root() || self.parent(item).is_some() {
            return Err(EditError::NotDetached(item));
        }
        let parent = self.parent(sibling).ok_or(EditError::NoParent(sibling))?;
        if self.is_proxy(parent) {
            return Err(EditError::ProxyContainer(parent));
        }
        if sibling == item || self.has_descendant(item, sibling) {
            return Err(EditError::CycleDetected { node: item, parent });
        }
        let index = self
            .index_in_parent(sibling)
            .ok_or(EditError::NoParent(sibling))?;

        self.attach_at(parent, index + 1, item);
        self.touch(parent);
        Ok(())
    }

    /// Removes `id` from its parent.
    ///
    /// The only child of the root is kept and cleared: its text becomes the
    /// placeholder and its children are detached. A proxy in that position is
    /// swapped for a fresh placeholder item.
    pub fn delete(&mut self, id: NodeId) -> EditResult<Deletion> {
        self.ensure_exists(id)?;
        let parent = self.parent(id).ok_or(EditError::NoParent(id))?;
        if self.is_proxy(parent) {
            return Err(EditError::ProxyContainer(parent));
        }
        if let Some(target) = self.live_proxy_target_within(id) {
            return Err(EditError::TargetOfLiveProxy(target));
        }

        let sole_top_level = parent == self.root() && self.children(parent).len() == 1;
        if !sole_top_level {
            self.detach(id);
            self.touch(parent);
            return Ok(Deletion::Removed);
        }

        let kept = if self.is_proxy(id) {
            let placeholder = self.create_item(EMPTY_PLACEHOLDER);
            self.detach(id);
            self.attach_at(parent, 0, placeholder);
            placeholder
        } else {
            self.clear_in_place(id);
            id
        };
        self.touch(parent);
        Ok(Deletion::Cleared(kept))
    }

    /// Makes `id` the last child of its preceding sibling and expands that
    /// sibling. Returns the new parent.
    pub fn promote(&mut self, id: NodeId) -> EditResult<NodeId> {
        self.ensure_exists(id)?;
        let parent = self.parent(id).ok_or(EditError::NoParent(id))?;
        if self.is_proxy(parent) {
            return Err(EditError::ProxyContainer(parent));
        }
        let new_parent = self
            .preceding_sibling(id)
            .ok_or(EditError::NoPrecedingSibling(id))?;
        if self.is_proxy(new_parent) {
            return Err(EditError::ProxyContainer(new_parent));
        }

        self.detach(id);
        self.attach_last(new_parent, id);
        self.set_expanded(new_parent, true);
        self.touch(parent);
        self.touch(new_parent);
        self.touch(id);
        Ok(new_parent)
    }

    /// Moves `id` out of its parent, right after that parent in the
    /// grandparent's children. Returns the new parent.
    pub fn demote(&mut self, id: NodeId) -> EditResult<NodeId> {
        self.ensure_exists(id)?;
        let parent = self.parent(id).ok_or(EditError::NoParent(id))?;
        let grandparent = self.parent(parent).ok_or(EditError::NoGrandparent(id))?;
        if self.is_proxy(parent) {
            return Err(EditError::ProxyContainer(parent));
        }
        if self.is_proxy(grandparent) {
            return Err(EditError::ProxyContainer(grandparent));
        }
        let parent_index = self
            .index_in_parent(parent)
            .ok_or(EditError::NoGrandparent(id))?;

        self.detach(id);
        self.attach_at(grandparent, parent_index + 1, id);
        self.touch(parent);
        self.touch(grandparent);
        self.touch(id);
        Ok(grandparent)
    }

    /// Swaps `id` with its preceding sibling.
    pub fn move_up(&mut self, id: NodeId) -> EditResult<()> {
        let (parent, index) = self.reorderable_position(id)?;
        if index == 0 {
            return Err(EditError::AtBoundary(id));
        }
        self.swap_children(parent, index - 1, index);
        self.touch(parent);
        Ok(())
    }

    /// Swaps `id` with its following sibling.
    pub fn move_down(&mut self, id: NodeId) -> EditResult<()> {
        let (parent, index) = self.reorderable_position(id)?;
        if index + 1 >= self.children(parent).len() {
            return Err(EditError::AtBoundary(id));
        }
        self.swap_children(parent, index, index + 1);
        self.touch(parent);
        Ok(())
    }

    /// Flips the completion flag and returns the new value.
    pub fn toggle_checked(&mut self, id: NodeId) -> EditResult<bool> {
        let item = self.item_mut(id).ok_or(EditError::NodeNotFound(id))?;
        item.checked = !item.checked;
        item.touch();
        Ok(item.checked)
    }

    /// Replaces the node's text.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> EditResult<()> {
        let item = self.item_mut(id).ok_or(EditError::NodeNotFound(id))?;
        item.text = text.into();
        item.touch();
        Ok(())
    }

    fn clear_in_place(&mut self, id: NodeId) {
        let children = self.children(id).to_vec();
        for child in children {
            self.detach(child);
        }
        if let Some(item) = self.node_mut(id).and_then(Node::as_item_mut) {
            item.text = EMPTY_PLACEHOLDER.to_string();
            item.touch();
        }
    }

    fn reorderable_position(&self, id: NodeId) -> EditResult<(NodeId, usize)> {
        self.ensure_exists(id)?;
        let parent = self.parent(id).ok_or(EditError::NoParent(id))?;
        if self.is_proxy(parent) {
            return Err(EditError::ProxyContainer(parent));
        }
        let index = self.index_in_parent(id).ok_or(EditError::NoParent(id))?;
        Ok((parent, index))
    }

    pub(crate) fn ensure_exists(&self, id: NodeId) -> EditResult<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(EditError::NodeNotFound(id))
        }
    }
}
