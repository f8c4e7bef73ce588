//! Editing session: the explicit context every key command runs against.
//!
//! # Responsibility
//! - Own the live document, its history, the visible rows, the cursor, the
//!   clipboard, and in-progress text entry.
//! - Turn each `Command` into tree edits with undo bookkeeping.
//!
//! # Invariants
//! - The cursor always indexes a visible row (or is 0 for an empty view).
//! - While a node is being edited only `ConfirmEdit`/`CancelEdit` run.
//! - A failed edit pushes no history entry.
//! - Nodes unreachable from the root, config, or clipboard are released
//!   after every command.

use super::command::{Command, CommandOutcome};
use crate::history::History;
use crate::model::document::Document;
use crate::model::node::NodeId;
use crate::repo::codec::DecodedDocument;
use crate::repo::document_repo::DocumentRepository;
use crate::tree::linearize::{position_of, VisibleEntry};
use crate::tree::mutation::Deletion;
use crate::tree::{EditError, EditResult};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Node remembered by copy or cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clipboard {
    /// Still in place; paste duplicates it, transclude references it.
    Copied(NodeId),
    /// Removed from the outline; paste puts it back.
    Cut(NodeId),
}

impl Clipboard {
    pub fn node(&self) -> NodeId {
        match self {
            Self::Copied(id) | Self::Cut(id) => *id,
        }
    }
}

/// A node freshly inserted and not yet confirmed.
#[derive(Debug)]
struct Insertion {
    /// History entry recorded if the insertion is confirmed.
    before: Document,
    /// Cursor row to return to if the insertion is dropped.
    return_to: usize,
    /// Item to delete if the insertion is dropped.
    created: NodeId,
}

#[derive(Debug)]
struct EditState {
    node: NodeId,
    insertion: Option<Insertion>,
}

/// Editing context generic over where documents are stored.
#[derive(Debug)]
pub struct Session<R: DocumentRepository> {
    repo: R,
    path: PathBuf,
    document: Document,
    history: History,
    view: Vec<VisibleEntry>,
    cursor: usize,
    focus: Option<NodeId>,
    clipboard: Option<Clipboard>,
    editing: Option<EditState>,
    notice: Option<String>,
}

impl<R: DocumentRepository> Session<R> {
    pub fn new(repo: R, path: impl Into<PathBuf>, document: Document, cursor: usize) -> Self {
        let mut session = Self {
            repo,
            path: path.into(),
            document,
            history: History::new(),
            view: Vec::new(),
            cursor,
            focus: None,
            clipboard: None,
            editing: None,
            notice: None,
        };
        session.refresh_view();
        session
    }

    /// Loads `path` through `repo`, falling back to the default outline
    /// bound to the same path when loading fails.
    pub fn open(repo: R, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match repo.load(&path) {
            Ok(DecodedDocument { document, cursor }) => Self::new(repo, path, document, cursor),
            Err(err) => {
                warn!(
                    "event=document_load module=session status=fallback error_code={} error={}",
                    err.code(),
                    err
                );
                let notice = format!("started with a new outline: {err}");
                let mut session = Self::new(repo, path, Document::with_default_outline(), 0);
                session.notice = Some(notice);
                session
            }
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn view(&self) -> &[VisibleEntry] {
        &self.view
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Node under the cursor.
    pub fn current(&self) -> Option<NodeId> {
        self.view.get(self.cursor).map(|entry| entry.node)
    }

    pub fn clipboard(&self) -> Option<Clipboard> {
        self.clipboard
    }

    pub fn editing_node(&self) -> Option<NodeId> {
        self.editing.as_ref().map(|state| state.node)
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Returns and clears the pending status message.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Runs one command and re-derives the view.
    pub fn apply(&mut self, command: Command) -> CommandOutcome {
        if self.is_editing() != command.is_edit_scoped() {
            debug!(
                "event=command module=session status=ignored command={} editing={}",
                command.name(),
                self.is_editing()
            );
            return CommandOutcome::Continue;
        }

        let name = command.name();
        let outcome = match self.current() {
            Some(current) => self.dispatch(command, current),
            None => match command {
                Command::Quit => CommandOutcome::Quit,
                Command::Save => {
                    self.save();
                    CommandOutcome::Continue
                }
                _ => CommandOutcome::Continue,
            },
        };
        self.refresh_view();
        debug!(
            "event=command module=session status=ok command={} cursor={} rows={} history={}",
            name,
            self.cursor,
            self.view.len(),
            self.history.len()
        );
        outcome
    }

    fn dispatch(&mut self, command: Command, current: NodeId) -> CommandOutcome {
        match command {
            Command::CursorUp => self.cursor = self.cursor.saturating_sub(1),
            Command::CursorDown => self.cursor += 1,
            Command::ExpandOrDescend => self.expand_or_descend(current),
            Command::CollapseOrAscend => self.collapse_or_ascend(current),
            Command::BeginEdit => return self.begin_edit(current, None),
            Command::ConfirmEdit(text) => self.confirm_edit(text),
            Command::CancelEdit => self.cancel_edit(),
            Command::ToggleChecked => {
                self.undoable("toggle_checked", |doc| doc.toggle_checked(current));
            }
            Command::Promote => self.restructure("promote", current, Document::promote),
            Command::Demote => self.restructure("demote", current, Document::demote),
            Command::MoveUp => self.restructure("move_up", current, Document::move_up),
            Command::MoveDown => self.restructure("move_down", current, Document::move_down),
            Command::InsertSibling => return self.insert_sibling(current),
            Command::InsertChild => return self.insert_child(current),
            Command::Delete => self.delete(current),
            Command::Copy => {
                self.clipboard = Some(Clipboard::Copied(self.document.unwrap_derived(current)));
            }
            Command::Cut => self.cut(current),
            Command::PasteDuplicate => self.paste_duplicate(current),
            Command::PasteTransclude => self.paste_transclude(current),
            Command::Undo => {
                if !self.history.undo(&mut self.document) {
                    debug!("event=history_undo module=session status=empty");
                }
            }
            Command::Redo => {
                if !self.history.redo(&mut self.document) {
                    debug!("event=history_redo module=session status=empty");
                }
            }
            Command::Save => self.save(),
            Command::Quit => return CommandOutcome::Quit,
        }
        CommandOutcome::Continue
    }

    fn expand_or_descend(&mut self, current: NodeId) {
        if !self.document.has_children(current) || self.document.is_expanded(current) {
            self.cursor += 1;
        } else {
            self.document.set_expanded(current, true);
        }
    }

    fn collapse_or_ascend(&mut self, current: NodeId) {
        if self.document.has_children(current) && self.document.is_expanded(current) {
            self.document.set_expanded(current, false);
            self.focus = Some(current);
            return;
        }
        if let Some(parent) = self.document.parent(current) {
            if self.document.set_expanded(parent, false) {
                self.focus = Some(parent);
            }
        }
    }

    fn begin_edit(&mut self, node: NodeId, insertion: Option<Insertion>) -> CommandOutcome {
        let text = self.document.text(node).unwrap_or_default().to_string();
        self.document.set_editing(node, true);
        self.editing = Some(EditState { node, insertion });
        self.focus = Some(node);
        CommandOutcome::Edit { text }
    }

    fn confirm_edit(&mut self, text: String) {
        let Some(state) = self.finish_edit() else {
            return;
        };
        match state.insertion {
            Some(insertion) if text.is_empty() => self.drop_insertion(insertion),
            Some(insertion) => {
                self.history.push(insertion.before);
                self.set_text(state.node, text);
            }
            None if self.document.text(state.node) != Some(text.as_str()) => {
                self.history.push_undo(&self.document);
                self.set_text(state.node, text);
            }
            None => {}
        }
    }

    fn cancel_edit(&mut self) {
        if let Some(Some(insertion)) = self.finish_edit().map(|state| state.insertion) {
            self.drop_insertion(insertion);
        }
    }

    fn finish_edit(&mut self) -> Option<EditState> {
        let state = self.editing.take()?;
        self.document.set_editing(state.node, false);
        Some(state)
    }

    fn set_text(&mut self, node: NodeId, text: String) {
        if let Err(err) = self.document.set_text(node, text) {
            self.refuse("confirm_edit", &err);
        }
    }

    fn drop_insertion(&mut self, insertion: Insertion) {
        if let Err(err) = self.document.delete(insertion.created) {
            self.refuse("cancel_edit", &err);
        }
        self.cursor = insertion.return_to;
    }

    fn insert_sibling(&mut self, current: NodeId) -> CommandOutcome {
        let before = self.document.deep_copy_for_undo();
        let item = self.document.create_item("");
        match self.document.insert_after(current, item) {
            Ok(()) => self.begin_insertion(before, item, item),
            Err(err) => {
                self.refuse("insert_sibling", &err);
                CommandOutcome::Continue
            }
        }
    }

    fn insert_child(&mut self, current: NodeId) -> CommandOutcome {
        let before = self.document.deep_copy_for_undo();
        match self.document.add_child(current) {
            Ok(child) => {
                self.document.set_expanded(current, true);
                let created = self.document.unwrap_derived(child);
                self.begin_insertion(before, child, created)
            }
            Err(err) => {
                self.refuse("insert_child", &err);
                CommandOutcome::Continue
            }
        }
    }

    fn begin_insertion(&mut self, before: Document, node: NodeId, created: NodeId) -> CommandOutcome {
        let insertion = Insertion {
            before,
            return_to: self.cursor,
            created,
        };
        self.begin_edit(node, Some(insertion))
    }

    fn restructure<T>(
        &mut self,
        name: &'static str,
        current: NodeId,
        edit: impl FnOnce(&mut Document, NodeId) -> EditResult<T>,
    ) {
        if self.undoable(name, |doc| edit(doc, current)).is_some() {
            self.focus = Some(current);
        }
    }

    fn delete(&mut self, current: NodeId) {
        let fallback = self.selection_after_removal(current);
        if let Some(deletion) = self.undoable("delete", |doc| doc.delete(current)) {
            self.focus = match deletion {
                Deletion::Cleared(kept) => Some(kept),
                Deletion::Removed => fallback,
            };
        }
    }

    fn cut(&mut self, current: NodeId) {
        let fallback = self.selection_after_removal(current);
        let sole_top_level = self.document.parent(current) == Some(self.document.root())
            && self.document.children(self.document.root()).len() == 1;

        let kept = self.undoable("cut", |doc| {
            let kept = if sole_top_level {
                doc.deep_copy(current)?
            } else {
                current
            };
            match doc.delete(current)? {
                Deletion::Cleared(placeholder) => Ok((kept, Some(placeholder))),
                Deletion::Removed => Ok((kept, fallback)),
            }
        });
        if let Some((kept, focus)) = kept {
            self.clipboard = Some(Clipboard::Cut(kept));
            self.focus = focus;
        }
    }

    /// Row to select when `node` goes away: its preceding sibling if it was
    /// the last one, its parent if it was the only one, else whatever slides
    /// into its row.
    fn selection_after_removal(&self, node: NodeId) -> Option<NodeId> {
        if !self.document.is_last_sibling(node) {
            return None;
        }
        self.document
            .preceding_sibling(node)
            .or_else(|| self.document.parent(node))
            .filter(|selected| *selected != self.document.root())
    }

    fn paste_duplicate(&mut self, current: NodeId) {
        let Some(clipboard) = self.clipboard else {
            return;
        };
        let source = clipboard.node();
        if !self.document.contains(source) {
            self.notice = Some("clipboard item no longer exists".to_string());
            self.clipboard = None;
            return;
        }

        let reinsert =
            matches!(clipboard, Clipboard::Cut(_)) && self.document.parent(source).is_none();
        let pasted = self.undoable("paste_duplicate", |doc| {
            let item = if reinsert { source } else { doc.deep_copy(source)? };
            if let Some(target) = doc.dangling_target_within(item) {
                return Err(EditError::Detached(target));
            }
            doc.insert_after(current, item)?;
            Ok(item)
        });
        if let Some(item) = pasted {
            self.clipboard = None;
            self.focus = Some(item);
        }
    }

    fn paste_transclude(&mut self, current: NodeId) {
        let Some(clipboard) = self.clipboard else {
            return;
        };
        let target = self.document.unwrap_derived(clipboard.node());
        let refusal = match clipboard {
            Clipboard::Cut(_) => Some(EditError::Detached(target)),
            Clipboard::Copied(_) if !self.document.is_attached(target) => {
                Some(EditError::Detached(target))
            }
            Clipboard::Copied(_) => None,
        };
        if let Some(err) = refusal {
            self.refuse("paste_transclude", &err);
            return;
        }

        let pasted = self.undoable("paste_transclude", |doc| {
            let proxy = doc.create_proxy(target)?;
            doc.insert_after(current, proxy)?;
            Ok(proxy)
        });
        if let Some(proxy) = pasted {
            self.clipboard = None;
            self.focus = Some(proxy);
        }
    }

    fn save(&mut self) {
        match self.repo.save(&self.path, &self.document, self.cursor) {
            Ok(()) => {
                info!(
                    "event=document_save module=session status=ok nodes={}",
                    self.document.tree_len()
                );
                self.notice = Some(format!("saved {}", self.path.display()));
            }
            Err(err) => self.notice = Some(format!("save failed: {err}")),
        }
    }

    /// Runs `edit` and records the pre-edit state in history if it succeeds.
    fn undoable<T>(
        &mut self,
        name: &'static str,
        edit: impl FnOnce(&mut Document) -> EditResult<T>,
    ) -> Option<T> {
        let snapshot = self.document.deep_copy_for_undo();
        match edit(&mut self.document) {
            Ok(value) => {
                self.history.push(snapshot);
                Some(value)
            }
            Err(err) => {
                self.refuse(name, &err);
                None
            }
        }
    }

    fn refuse(&mut self, name: &str, err: &EditError) {
        debug!(
            "event=edit_refused module=session status=noop command={} reason={}",
            name, err
        );
        let protective = matches!(
            err,
            EditError::ProxyContainer(_)
                | EditError::TargetOfLiveProxy(_)
                | EditError::Detached(_)
        );
        if protective {
            self.notice = Some(refusal_notice(err).to_string());
        }
    }

    fn refresh_view(&mut self) {
        self.document.refresh_visible_proxies();
        let pinned: Vec<NodeId> = self.clipboard.iter().map(Clipboard::node).collect();
        let released = self.document.retain_reachable(&pinned);
        if released > 0 {
            debug!(
                "event=node_release module=session status=ok released={}",
                released
            );
        }

        self.view = self.document.linearize();
        if let Some(focus) = self.focus.take() {
            if let Some(position) = position_of(&self.view, focus) {
                self.cursor = position;
            }
        }
        self.cursor = self.cursor.min(self.view.len().saturating_sub(1));
    }
}

fn refusal_notice(err: &EditError) -> &'static str {
    match err {
        EditError::ProxyContainer(_) => "children of a transcluded item cannot be restructured",
        EditError::TargetOfLiveProxy(_) => "item is transcluded elsewhere and cannot be removed",
        EditError::Detached(_) => "item is no longer part of the outline",
        _ => "edit refused",
    }
}
