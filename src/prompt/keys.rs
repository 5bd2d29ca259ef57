//! Key Map Module
//!
//! Translates engine keys into cursor edit operations, either emacs-style
//! (every printable key inserts) or vi-style with insert and normal modes.

use crate::engine::Key;

/// One edit applied to the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    KillLine,
    DeleteWord,
    Submit,
    /// Key consumed without touching the buffer
    Noop,
}

impl EditOp {
    /// Whether the operation changes the text (as opposed to moving or nothing)
    pub fn is_edit(self) -> bool {
        matches!(
            self,
            EditOp::Insert(_)
                | EditOp::Backspace
                | EditOp::Delete
                | EditOp::KillLine
                | EditOp::DeleteWord
        )
    }
}

/// Vi editing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViMode {
    Insert,
    Normal,
}

/// Key to edit-operation translation, stateful in vi mode
#[derive(Debug, Clone)]
pub struct KeyMap {
    vim: bool,
    mode: ViMode,
}

impl KeyMap {
    pub fn new(vim: bool) -> Self {
        Self {
            vim,
            mode: ViMode::Insert,
        }
    }

    pub fn mode(&self) -> ViMode {
        self.mode
    }

    /// Translate a key, updating the vi mode when needed
    pub fn translate(&mut self, key: Key) -> EditOp {
        match key {
            Key::Enter => return EditOp::Submit,
            Key::Backspace => return EditOp::Backspace,
            Key::Delete => return EditOp::Delete,
            Key::Left => return EditOp::Left,
            Key::Right => return EditOp::Right,
            Key::Home => return EditOp::Home,
            Key::End => return EditOp::End,
            Key::KillLine => return EditOp::KillLine,
            Key::DeleteWord => return EditOp::DeleteWord,
            Key::Interrupt | Key::Eof => return EditOp::Noop,
            Key::Escape | Key::Char(_) => {}
        }

        if !self.vim {
            return match key {
                Key::Char(c) => EditOp::Insert(c),
                _ => EditOp::Noop,
            };
        }

        match (self.mode, key) {
            (_, Key::Escape) => {
                self.mode = ViMode::Normal;
                EditOp::Noop
            }
            (ViMode::Insert, Key::Char(c)) => EditOp::Insert(c),
            (ViMode::Normal, Key::Char(c)) => self.normal_mode(c),
            _ => EditOp::Noop,
        }
    }

    fn normal_mode(&mut self, c: char) -> EditOp {
        match c {
            'h' => EditOp::Left,
            'l' => EditOp::Right,
            '0' | '^' => EditOp::Home,
            '$' => EditOp::End,
            'x' => EditOp::Delete,
            'X' => EditOp::Backspace,
            'i' => {
                self.mode = ViMode::Insert;
                EditOp::Noop
            }
            'a' => {
                self.mode = ViMode::Insert;
                EditOp::Right
            }
            'I' => {
                self.mode = ViMode::Insert;
                EditOp::Home
            }
            'A' => {
                self.mode = ViMode::Insert;
                EditOp::End
            }
            _ => EditOp::Noop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emacs_keys_insert() {
        let mut keys = KeyMap::new(false);
        assert_eq!(keys.translate(Key::Char('h')), EditOp::Insert('h'));
        assert_eq!(keys.translate(Key::Escape), EditOp::Noop);
        assert_eq!(keys.translate(Key::Char('x')), EditOp::Insert('x'));
    }

    #[test]
    fn test_vi_normal_mode_moves() {
        let mut keys = KeyMap::new(true);
        assert_eq!(keys.translate(Key::Char('h')), EditOp::Insert('h'));

        assert_eq!(keys.translate(Key::Escape), EditOp::Noop);
        assert_eq!(keys.mode(), ViMode::Normal);
        assert_eq!(keys.translate(Key::Char('h')), EditOp::Left);
        assert_eq!(keys.translate(Key::Char('l')), EditOp::Right);
        assert_eq!(keys.translate(Key::Char('x')), EditOp::Delete);
        assert_eq!(keys.translate(Key::Char('q')), EditOp::Noop);

        assert_eq!(keys.translate(Key::Char('A')), EditOp::End);
        assert_eq!(keys.mode(), ViMode::Insert);
        assert_eq!(keys.translate(Key::Char('l')), EditOp::Insert('l'));
    }

    #[test]
    fn test_edit_classification() {
        assert!(EditOp::Insert('a').is_edit());
        assert!(EditOp::DeleteWord.is_edit());
        assert!(!EditOp::Right.is_edit());
        assert!(!EditOp::Submit.is_edit());
    }
}
