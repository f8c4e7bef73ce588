//! Key bindings.
//!
//! # Responsibility
//! - Map browse-mode keys to session commands.
//! - Classify edit-mode keys into confirm, cancel, or text input.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use outline_core::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Confirm,
    Cancel,
    Input,
}

pub fn command_for(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('p') => Some(Command::InsertChild),
            KeyCode::Char('k') => Some(Command::MoveUp),
            KeyCode::Char('j') => Some(Command::MoveDown),
            KeyCode::Char('r') => Some(Command::Redo),
            KeyCode::Char('c') => Some(Command::Quit),
            _ => None,
        };
    }

    let command = match key.code {
        KeyCode::Up | KeyCode::Char('k') => Command::CursorUp,
        KeyCode::Down | KeyCode::Char('j') => Command::CursorDown,
        KeyCode::Right | KeyCode::Char('l') => Command::ExpandOrDescend,
        KeyCode::Left | KeyCode::Char('h') => Command::CollapseOrAscend,
        KeyCode::Char('i') => Command::BeginEdit,
        KeyCode::Enter | KeyCode::Char('o') => Command::InsertSibling,
        KeyCode::Char(' ') => Command::ToggleChecked,
        KeyCode::Tab => Command::Promote,
        KeyCode::BackTab => Command::Demote,
        KeyCode::Delete | KeyCode::Backspace | KeyCode::Char('d') => Command::Delete,
        KeyCode::Char('c') => Command::Copy,
        KeyCode::Char('x') => Command::Cut,
        KeyCode::Char('v') => Command::PasteDuplicate,
        KeyCode::Char('t') => Command::PasteTransclude,
        KeyCode::Char('u') => Command::Undo,
        KeyCode::Char('s') => Command::Save,
        KeyCode::Char('q') => Command::Quit,
        _ => return None,
    };
    Some(command)
}

pub fn edit_key(key: KeyEvent) -> EditKey {
    match (key.modifiers, key.code) {
        (_, KeyCode::Enter) => EditKey::Confirm,
        (_, KeyCode::Esc) => EditKey::Cancel,
        (m, KeyCode::Char('c')) if m.contains(KeyModifiers::CONTROL) => EditKey::Cancel,
        _ => EditKey::Input,
    }
}

#[cfg(test)]
mod tests {
    use super::{command_for, edit_key, EditKey};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use outline_core::Command;

    fn plain(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn vim_keys_and_arrows_move_the_cursor() {
        assert_eq!(command_for(plain(KeyCode::Char('k'))), Some(Command::CursorUp));
        assert_eq!(command_for(plain(KeyCode::Up)), Some(Command::CursorUp));
        assert_eq!(command_for(plain(KeyCode::Char('j'))), Some(Command::CursorDown));
        assert_eq!(
            command_for(plain(KeyCode::Char('l'))),
            Some(Command::ExpandOrDescend)
        );
        assert_eq!(
            command_for(plain(KeyCode::Left)),
            Some(Command::CollapseOrAscend)
        );
    }

    #[test]
    fn control_chords_take_precedence_over_plain_letters() {
        assert_eq!(command_for(ctrl('k')), Some(Command::MoveUp));
        assert_eq!(command_for(ctrl('j')), Some(Command::MoveDown));
        assert_eq!(command_for(ctrl('p')), Some(Command::InsertChild));
        assert_eq!(command_for(ctrl('r')), Some(Command::Redo));
        assert_eq!(command_for(ctrl('c')), Some(Command::Quit));
        assert_eq!(command_for(ctrl('z')), None);
    }

    #[test]
    fn structure_and_clipboard_bindings() {
        assert_eq!(command_for(plain(KeyCode::Tab)), Some(Command::Promote));
        assert_eq!(command_for(plain(KeyCode::BackTab)), Some(Command::Demote));
        assert_eq!(command_for(plain(KeyCode::Char('x'))), Some(Command::Cut));
        assert_eq!(
            command_for(plain(KeyCode::Char('t'))),
            Some(Command::PasteTransclude)
        );
        assert_eq!(command_for(plain(KeyCode::Char('z'))), None);
    }

    #[test]
    fn edit_mode_keys() {
        assert_eq!(edit_key(plain(KeyCode::Enter)), EditKey::Confirm);
        assert_eq!(edit_key(plain(KeyCode::Esc)), EditKey::Cancel);
        assert_eq!(edit_key(ctrl('c')), EditKey::Cancel);
        assert_eq!(edit_key(plain(KeyCode::Char('q'))), EditKey::Input);
    }
}
