//! Deep copies for paste and for history snapshots.
//!
//! # Invariants
//! - `deep_copy` never shares ids with the source; copied parents point into
//!   the copy.
//! - `deep_copy_for_undo` preserves ids, timestamps, and expansion, and never
//!   carries editing flags or proxy wrapper caches.
//! - Proxies are copied by reference: the copy targets the same node.

use super::{EditError, EditResult};
use crate::model::document::Document;
use crate::model::node::{now_secs, Item, Node, NodeBody, NodeId};
use std::collections::HashMap;

impl Document {
    /// Clones `id` and everything it owns into a detached subtree with fresh
    /// ids and timestamps. Returns the clone's id.
    pub fn deep_copy(&mut self, id: NodeId) -> EditResult<NodeId> {
        let source = self.node(id).ok_or(EditError::NodeNotFound(id))?.clone();
        match source.body {
            NodeBody::Item(item) => {
                let meta = item.meta.map(|meta| self.deep_copy(meta)).transpose()?;
                let mut children = Vec::with_capacity(item.children.len());
                for child in &item.children {
                    children.push(self.deep_copy(*child)?);
                }

                let now = now_secs();
                let copy = self.insert(Node::from_item(Item {
                    created_at: now,
                    changed_at: now,
                    text: item.text,
                    numbered: item.numbered,
                    checked: item.checked,
                    children: Vec::new(),
                    meta,
                }));
                for child in children {
                    self.attach_last(copy, child);
                }
                Ok(copy)
            }
            NodeBody::Proxy(link) => Ok(self.insert(Node::proxy(link.target, false))),
        }
    }

    /// Snapshot of the whole document for the undo history.
    ///
    /// Copies the root tree, the config node, and any proxy target living
    /// outside them; detached leftovers and wrappers are not copied.
    pub fn deep_copy_for_undo(&self) -> Document {
        let mut nodes = HashMap::new();
        let mut pending = vec![self.root()];
        pending.extend(self.config());

        while let Some(start) = pending.pop() {
            if nodes.contains_key(&start) {
                continue;
            }
            for id in self.owned_subtree(start) {
                let Some(copy) = self.copy_for_undo(id) else {
                    continue;
                };
                if let NodeBody::Proxy(link) = &copy.body {
                    pending.push(link.target);
                }
                nodes.insert(id, copy);
            }
        }

        Document::from_parts(nodes, self.root(), self.config())
    }

    /// Clone of a single node keeping id-bearing fields and dropping
    /// transient state.
    fn copy_for_undo(&self, id: NodeId) -> Option<Node> {
        let node = self.node(id)?;
        let body = match &node.body {
            NodeBody::Item(item) => NodeBody::Item(item.clone()),
            NodeBody::Proxy(link) => {
                let mut link = link.clone();
                link.wrappers.clear();
                NodeBody::Proxy(link)
            }
        };
        Some(Node {
            parent: node.parent,
            expanded: node.expanded,
            editing: false,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::model::document::Document;

    #[test]
    fn deep_copy_assigns_fresh_ids_and_keeps_structure() {
        let mut doc = Document::with_default_outline();
        let item = doc.children(doc.root())[0];
        let child = doc.add_child(item).expect("add child");
        doc.set_text(child, "child").expect("set text");

        let copy = doc.deep_copy(item).expect("deep copy");

        assert_ne!(copy, item);
        assert_eq!(doc.parent(copy), None);
        let copied_children = doc.children(copy).to_vec();
        assert_eq!(copied_children.len(), 1);
        assert_ne!(copied_children[0], child);
        assert_eq!(doc.parent(copied_children[0]), Some(copy));
        assert_eq!(doc.text(copied_children[0]), Some("child"));
    }

    #[test]
    fn undo_copy_preserves_ids_and_drops_detached_nodes() {
        let mut doc = Document::with_default_outline();
        let item = doc.children(doc.root())[0];
        doc.set_expanded(item, true);
        doc.set_editing(item, true);
        let loose = doc.create_item("loose");

        let snapshot = doc.deep_copy_for_undo();

        assert_eq!(snapshot.root(), doc.root());
        assert_eq!(snapshot.children(snapshot.root()), &[item]);
        assert!(snapshot.is_expanded(item));
        assert!(!snapshot.is_editing(item));
        assert_eq!(snapshot.changed_at(item), doc.changed_at(item));
        assert!(!snapshot.contains(loose));
        assert_eq!(snapshot.config(), doc.config());
    }
}
