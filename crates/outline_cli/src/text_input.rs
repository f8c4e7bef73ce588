//! Single-line text input used while a node is being edited.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Default)]
pub struct TextInput {
    chars: Vec<char>,
    /// Caret position in chars, `0..=chars.len()`.
    caret: usize,
    focused: bool,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> String {
        self.chars.iter().collect()
    }

    /// Replaces the content and moves the caret to the end.
    pub fn set_value(&mut self, value: &str) {
        self.chars = value.chars().collect();
        self.caret = self.chars.len();
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Text before the caret, the char under it, and the rest.
    pub fn split_at_caret(&self) -> (String, Option<char>, String) {
        let before = self.chars[..self.caret].iter().collect();
        let under = self.chars.get(self.caret).copied();
        let after = self
            .chars
            .get(self.caret + 1..)
            .map(|rest| rest.iter().collect())
            .unwrap_or_default();
        (before, under, after)
    }

    /// Applies an editing key. Returns false when the key is not handled.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('a') if control => self.caret = 0,
            KeyCode::Char('e') if control => self.caret = self.chars.len(),
            KeyCode::Char('u') if control => {
                self.chars.drain(..self.caret);
                self.caret = 0;
            }
            KeyCode::Char('k') if control => self.chars.truncate(self.caret),
            KeyCode::Char(_) if control => return false,
            KeyCode::Char(c) => {
                self.chars.insert(self.caret, c);
                self.caret += 1;
            }
            KeyCode::Backspace => {
                if self.caret > 0 {
                    self.caret -= 1;
                    self.chars.remove(self.caret);
                }
            }
            KeyCode::Delete => {
                if self.caret < self.chars.len() {
                    self.chars.remove(self.caret);
                }
            }
            KeyCode::Left => self.caret = self.caret.saturating_sub(1),
            KeyCode::Right => self.caret = (self.caret + 1).min(self.chars.len()),
            KeyCode::Home => self.caret = 0,
            KeyCode::End => self.caret = self.chars.len(),
            _ => return false,
        }
        true
    }
}
