//! Editing commands accepted by a `Session`.

/// One discrete user intent, already decoupled from key bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CursorUp,
    CursorDown,
    /// Moves down when the node is a leaf or already expanded, else expands.
    ExpandOrDescend,
    /// Collapses an expanded node with children, else collapses the parent
    /// and moves onto it.
    CollapseOrAscend,
    BeginEdit,
    /// Applies the entered text to the node being edited.
    ConfirmEdit(String),
    CancelEdit,
    ToggleChecked,
    Promote,
    Demote,
    MoveUp,
    MoveDown,
    InsertSibling,
    InsertChild,
    Delete,
    Copy,
    Cut,
    PasteDuplicate,
    PasteTransclude,
    Undo,
    Redo,
    Save,
    Quit,
}

impl Command {
    /// Stable name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CursorUp => "cursor_up",
            Self::CursorDown => "cursor_down",
            Self::ExpandOrDescend => "expand_or_descend",
            Self::CollapseOrAscend => "collapse_or_ascend",
            Self::BeginEdit => "begin_edit",
            Self::ConfirmEdit(_) => "confirm_edit",
            Self::CancelEdit => "cancel_edit",
            Self::ToggleChecked => "toggle_checked",
            Self::Promote => "promote",
            Self::Demote => "demote",
            Self::MoveUp => "move_up",
            Self::MoveDown => "move_down",
            Self::InsertSibling => "insert_sibling",
            Self::InsertChild => "insert_child",
            Self::Delete => "delete",
            Self::Copy => "copy",
            Self::Cut => "cut",
            Self::PasteDuplicate => "paste_duplicate",
            Self::PasteTransclude => "paste_transclude",
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::Save => "save",
            Self::Quit => "quit",
        }
    }

    /// Whether the command is accepted while a node is being edited.
    pub fn is_edit_scoped(&self) -> bool {
        matches!(self, Self::ConfirmEdit(_) | Self::CancelEdit)
    }
}

/// What the event loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Continue,
    /// Editing started; seed the text input with `text`.
    Edit { text: String },
    Quit,
}
