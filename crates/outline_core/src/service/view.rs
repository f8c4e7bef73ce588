//! Read-only projections of a session for renderers.

use super::session::Session;
use crate::model::node::NodeId;
use crate::repo::document_repo::DocumentRepository;

/// Everything a renderer needs to draw one visible row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub node: NodeId,
    /// Ancestor count; top-level rows have depth 1.
    pub depth: usize,
    pub text: String,
    pub checked: bool,
    pub expanded: bool,
    pub has_children: bool,
    pub editing: bool,
    pub proxy: bool,
    pub first_sibling: bool,
    pub last_sibling: bool,
    pub at_cursor: bool,
    /// Row lies on the path from the root to the cursor row.
    pub ancestor_of_cursor: bool,
}

impl<R: DocumentRepository> Session<R> {
    pub fn rows(&self) -> Vec<RowView> {
        let document = self.document();
        let current = self.current();
        self.view()
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let node = entry.node;
                RowView {
                    node,
                    depth: entry.depth,
                    text: document.text(node).unwrap_or_default().to_string(),
                    checked: document.is_checked(node),
                    expanded: document.is_expanded(node),
                    has_children: document.has_children(node),
                    editing: document.is_editing(node),
                    proxy: document.is_proxy(node),
                    first_sibling: document.is_first_sibling(node),
                    last_sibling: document.is_last_sibling(node),
                    at_cursor: index == self.cursor(),
                    ancestor_of_cursor: current
                        .is_some_and(|current| document.has_descendant(node, current)),
                }
            })
            .collect()
    }

    /// Root text followed by the bound file path.
    pub fn header(&self) -> String {
        let document = self.document();
        format!(
            "{} [{}]",
            document.text(document.root()).unwrap_or_default(),
            self.path().display()
        )
    }

    /// Text of the clipboard node, or `-` when the clipboard is empty.
    pub fn clipboard_text(&self) -> String {
        self.clipboard()
            .and_then(|clipboard| self.document().text(clipboard.node()))
            .unwrap_or("-")
            .to_string()
    }
}
