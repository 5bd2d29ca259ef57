//! Cursor Module
//!
//! Single-line input buffer with cursor tracking, the default-value overlay
//! and masked rendering. The displayed text is always derived from the
//! current buffer, position and flags, never from edit history.

use crossterm::style::{Attribute, SetAttribute};
use serde::{Deserialize, Serialize};

use super::keys::EditOp;
use crate::engine::ansi;

/// How the cursor is drawn inside the echoed input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pointer {
    /// Reverse-video cell over the character under the cursor
    #[default]
    Block,
    /// A `|` drawn before the character under the cursor
    Pipe,
    /// Nothing drawn
    None,
}

impl Pointer {
    /// Draw the pointer over `under`, the character at the cursor if any
    pub fn draw(self, under: Option<char>) -> String {
        match self {
            Pointer::Block => format!(
                "{}{}{}",
                ansi(SetAttribute(Attribute::Reverse)),
                under.unwrap_or(' '),
                ansi(SetAttribute(Attribute::Reset))
            ),
            Pointer::Pipe => match under {
                Some(c) => format!("|{}", c),
                None => "|".to_string(),
            },
            Pointer::None => under.map(String::from).unwrap_or_default(),
        }
    }
}

/// Input buffer of a single prompt run
#[derive(Debug, Clone)]
pub struct Cursor {
    input: Vec<char>,
    position: usize,
    pointer: Pointer,
    erase: bool,
}

impl Cursor {
    /// Start from `default` with the cursor at its end
    ///
    /// With `erase_default` set, the default is shown but the first editing
    /// key replaces it wholesale.
    pub fn new(default: &str, pointer: Pointer, erase_default: bool) -> Self {
        let input: Vec<char> = default.chars().collect();
        Self {
            position: input.len(),
            input,
            pointer,
            erase: erase_default,
        }
    }

    /// Apply one edit operation. Returns `false` once the input is submitted.
    pub fn listen(&mut self, op: EditOp) -> bool {
        if op.is_edit() && self.erase {
            self.erase = false;
            self.replace("");
        }

        match op {
            EditOp::Insert(c) => self.insert(c),
            EditOp::Backspace => self.backspace(),
            EditOp::Delete => self.delete(),
            EditOp::Left => self.move_by(-1),
            EditOp::Right => {
                // Moving into the default means the user wants to keep editing it
                self.erase = false;
                self.move_by(1);
            }
            EditOp::Home => self.start(),
            EditOp::End => self.end(),
            EditOp::KillLine => self.replace(""),
            EditOp::DeleteWord => self.delete_word_backward(),
            EditOp::Submit => return false,
            EditOp::Noop => {}
        }
        true
    }

    /// Live value, unmasked
    pub fn get(&self) -> String {
        self.input.iter().collect()
    }

    /// Final value with every character replaced by `mask`
    pub fn get_mask(&self, mask: char) -> String {
        std::iter::repeat(mask).take(self.input.len()).collect()
    }

    /// Echo without the pointer: the value itself, or its masked form
    pub fn rendered_echo(&self, mask: Option<char>) -> String {
        match mask {
            Some(mask) => self.get_mask(mask),
            None => self.get(),
        }
    }

    /// Echo with the pointer drawn at the cursor
    pub fn format(&self) -> String {
        self.format_chars(&self.input)
    }

    /// Masked echo with the pointer drawn at the cursor
    pub fn format_mask(&self, mask: char) -> String {
        let masked = vec![mask; self.input.len()];
        self.format_chars(&masked)
    }

    /// Buffer contents as handed back to the line engine
    pub fn chars(&self) -> &[char] {
        &self.input
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    pub fn len(&self) -> usize {
        self.input.len()
    }

    /// Whether the default is still waiting to be erased by the first edit
    pub fn erases_default(&self) -> bool {
        self.erase
    }

    /// Replace the whole buffer and put the cursor at the end
    pub fn replace(&mut self, input: &str) {
        self.input = input.chars().collect();
        self.end();
    }

    fn insert(&mut self, c: char) {
        self.input.insert(self.position, c);
        self.position += 1;
    }

    fn backspace(&mut self) {
        if self.position > 0 {
            self.position -= 1;
            self.input.remove(self.position);
        }
    }

    fn delete(&mut self) {
        if self.position < self.input.len() {
            self.input.remove(self.position);
        }
    }

    fn move_by(&mut self, shift: isize) {
        let target = self.position as isize + shift;
        self.position = target.clamp(0, self.input.len() as isize) as usize;
    }

    fn start(&mut self) {
        self.position = 0;
    }

    fn end(&mut self) {
        self.position = self.input.len();
    }

    /// Ctrl+W: drop trailing whitespace then the word before the cursor
    fn delete_word_backward(&mut self) {
        let mut start = self.position;
        while start > 0 && self.input[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !self.input[start - 1].is_whitespace() {
            start -= 1;
        }
        self.input.drain(start..self.position);
        self.position = start;
    }

    fn format_chars(&self, chars: &[char]) -> String {
        let mut out: String = chars[..self.position].iter().collect();
        out.push_str(&self.pointer.draw(chars.get(self.position).copied()));
        if self.position < chars.len() {
            out.extend(&chars[self.position + 1..]);
        }
        out
    }
}
