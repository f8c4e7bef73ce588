//! Undo/redo over whole-document snapshots.
//!
//! # Responsibility
//! - Keep an ordered list of immutable snapshots and one cursor into it.
//! - Swap the live document for a snapshot copy on undo and redo.
//!
//! # Invariants
//! - `cursor` is `None` exactly when nothing is left to undo.
//! - While `reached_via_history` is set, the live document equals
//!   `entries[cursor + 1]` (index 0 when `cursor` is `None`).
//! - Entries are never mutated after capture; restores hand out clones.

use crate::model::document::Document;
use log::debug;

/// Snapshot history with a single cursor.
#[derive(Debug, Default, Clone)]
pub struct History {
    entries: Vec<Document>,
    cursor: Option<usize>,
    reached_via_history: bool,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots `live` and records it as the newest undo point.
    pub fn push_undo(&mut self, live: &Document) {
        self.push(live.deep_copy_for_undo());
    }

    /// Records an already captured snapshot, discarding any redo branch.
    pub fn push(&mut self, snapshot: Document) {
        self.entries.truncate(self.next_index());
        self.entries.push(snapshot);
        self.cursor = Some(self.entries.len() - 1);
        self.reached_via_history = false;
    }

    /// Replaces `live` with the entry at the cursor. Returns `false` when
    /// there is nothing to undo.
    pub fn undo(&mut self, live: &mut Document) -> bool {
        let Some(cursor) = self.cursor else {
            return false;
        };
        if !self.reached_via_history && cursor + 1 == self.entries.len() {
            self.entries.push(live.deep_copy_for_undo());
        }

        *live = self.entries[cursor].clone();
        self.cursor = cursor.checked_sub(1);
        self.reached_via_history = true;
        debug!(
            "event=history_undo module=history status=ok restored={} entries={}",
            cursor,
            self.entries.len()
        );
        true
    }

    /// Replaces `live` with the entry after it. Returns `false` when there is
    /// nothing to redo.
    pub fn redo(&mut self, live: &mut Document) -> bool {
        if !self.can_redo() {
            return false;
        }
        let next = self.next_index();

        *live = self.entries[next + 1].clone();
        self.cursor = Some(next);
        debug!(
            "event=history_redo module=history status=ok restored={} entries={}",
            next + 1,
            self.entries.len()
        );
        true
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.reached_via_history && self.next_index() + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Forgets every entry, e.g. after loading another document.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
        self.reached_via_history = false;
    }

    fn next_index(&self) -> usize {
        self.cursor.map_or(0, |cursor| cursor + 1)
    }
}
