//! Line Engine Module
//!
//! The narrow interface between a prompt and whatever reads keys and paints
//! the terminal line. A prompt never touches the terminal directly: it hands a
//! [`KeyHooks`] implementation to [`LineEngine::read_line`] and the engine
//! calls back into it, strictly one key at a time.
//!
//! ## Module Structure
//!
//! - `terminal` - crossterm backed engine for real terminals
//! - `scripted` - in-memory engine replaying a fixed key sequence

pub mod scripted;
pub mod terminal;

pub use scripted::ScriptedEngine;
pub use terminal::TerminalEngine;

use std::fmt;
use std::io;

use thiserror::Error;

/// A decoded key press, independent of the terminal backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    Escape,
    /// Ctrl+U
    KillLine,
    /// Ctrl+W
    DeleteWord,
    /// Ctrl+C
    Interrupt,
    /// Ctrl+D on an empty line
    Eof,
}

/// Errors surfaced by a line engine's blocking read
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Interrupt")]
    Interrupt,

    #[error("end of input")]
    Eof,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Settings an engine is built with for one prompt run
///
/// Masking is not an engine concern: the prompt paints masked frames itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub vim_mode: bool,
}

/// Listener verdict after a key: the engine's copy of the line, its cursor
/// position and whether editing goes on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listen {
    pub line: Vec<char>,
    pub pos: usize,
    pub keep_on: bool,
}

/// The part of an engine a hook may touch while a key is being handled
pub trait PromptDisplay {
    /// Replace the text drawn on the prompt line. Takes effect on the next refresh.
    fn set_prompt(&mut self, prompt: &str);
}

/// Per-key callbacks installed by a prompt for the duration of one read
pub trait KeyHooks {
    /// Runs before the key is handled. Returning `false` swallows the key.
    fn filter_key(&mut self, key: Key, display: &mut dyn PromptDisplay) -> (Key, bool);

    /// Runs for every key the filter let through, Enter included. The read
    /// ends once the returned [`Listen::keep_on`] is `false`.
    fn on_key(&mut self, line: &[char], pos: usize, key: Key, display: &mut dyn PromptDisplay)
        -> Listen;
}

/// A blocking single-line editor the prompt loop drives
pub trait LineEngine: PromptDisplay {
    /// Block until Enter is accepted, an interrupt arrives or input ends.
    ///
    /// The returned line is the last one reported by [`KeyHooks::on_key`].
    fn read_line(&mut self, hooks: &mut dyn KeyHooks) -> Result<String, EngineError>;

    /// Repaint the prompt line with the current prompt text.
    fn refresh(&mut self) -> io::Result<()>;

    /// Write raw bytes to the output, bypassing the prompt line.
    fn write(&mut self, text: &str) -> io::Result<()>;

    /// Release the terminal. Safe to call more than once.
    fn close(&mut self) -> io::Result<()>;
}

/// Ctrl+D ends input only on an empty line and deletes under the cursor otherwise
pub fn eof_or_delete(key: Key, line: &[char]) -> Key {
    match key {
        Key::Eof if !line.is_empty() => Key::Delete,
        other => other,
    }
}

/// Render a crossterm command as its ANSI escape sequence
pub fn ansi(command: impl crossterm::Command) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = command.write_ansi(&mut out);
    out
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{}", c),
            other => write!(f, "<{:?}>", other),
        }
    }
}
