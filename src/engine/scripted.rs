//! Scripted Line Engine
//!
//! Replays a fixed sequence of keys and records everything a prompt paints,
//! so whole prompt runs can be exercised without a terminal.

use std::collections::VecDeque;
use std::io;

use super::{eof_or_delete, EngineError, Key, KeyHooks, LineEngine, PromptDisplay};

/// In-memory engine fed from a key script
#[derive(Debug, Clone, Default)]
pub struct ScriptedEngine {
    keys: VecDeque<Key>,
    prompt: String,
    line: Vec<char>,
    pos: usize,
    frames: Vec<String>,
    written: String,
    closed: bool,
}

impl ScriptedEngine {
    /// Create an engine that will deliver `keys` in order, then report end of input
    pub fn new(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Create an engine from typed text followed by Enter
    pub fn typing(text: &str) -> Self {
        Self::new(text.chars().map(Key::Char).chain(std::iter::once(Key::Enter)))
    }

    /// Every prompt line painted, in order
    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    /// The most recently painted prompt line
    pub fn last_frame(&self) -> Option<&str> {
        self.frames.last().map(String::as_str)
    }

    /// Raw output written outside the prompt line
    pub fn written(&self) -> &str {
        &self.written
    }

    /// Whether the prompt released the engine
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Keys not consumed yet
    pub fn remaining_keys(&self) -> usize {
        self.keys.len()
    }
}

impl PromptDisplay for ScriptedEngine {
    fn set_prompt(&mut self, prompt: &str) {
        self.prompt.clear();
        self.prompt.push_str(prompt);
    }
}

impl LineEngine for ScriptedEngine {
    fn read_line(&mut self, hooks: &mut dyn KeyHooks) -> Result<String, EngineError> {
        while let Some(key) = self.keys.pop_front() {
            let key = match eof_or_delete(key, &self.line) {
                Key::Interrupt => return Err(EngineError::Interrupt),
                Key::Eof => return Err(EngineError::Eof),
                key => key,
            };

            let (key, accept) = hooks.filter_key(key, self);
            if !accept {
                self.refresh()?;
                continue;
            }

            let line = std::mem::take(&mut self.line);
            let listen = hooks.on_key(&line, self.pos, key, self);
            self.line = listen.line;
            self.pos = listen.pos;
            self.refresh()?;

            if !listen.keep_on {
                return Ok(self.line.iter().collect());
            }
        }
        Err(EngineError::Eof)
    }

    fn refresh(&mut self) -> io::Result<()> {
        self.frames.push(self.prompt.clone());
        Ok(())
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.written.push_str(text);
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        Ok(())
    }
}
