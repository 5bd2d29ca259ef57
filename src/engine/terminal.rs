//! Terminal Line Engine
//!
//! Reads key events from the controlling terminal through crossterm and paints
//! the prompt line on a writer (stdout by default). Raw mode is held from
//! construction until [`LineEngine::close`] or drop, whichever comes first.

use std::io::{self, Write};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    queue,
    style::Print,
    terminal::{self, disable_raw_mode, enable_raw_mode, ClearType},
};
use tracing::{debug, trace};

use super::{
    eof_or_delete, EngineConfig, EngineError, Key, KeyHooks, LineEngine, PromptDisplay,
};

/// Crossterm backed line engine
pub struct TerminalEngine<W: Write> {
    out: W,
    config: EngineConfig,
    prompt: String,
    line: Vec<char>,
    pos: usize,
    raw: bool,
}

impl TerminalEngine<io::Stdout> {
    /// Build an engine painting on stdout
    pub fn stdout(config: EngineConfig) -> io::Result<Self> {
        Self::new(io::stdout(), config)
    }
}

impl<W: Write> TerminalEngine<W> {
    /// Build an engine painting on `out` and switch the terminal to raw mode
    pub fn new(out: W, config: EngineConfig) -> io::Result<Self> {
        enable_raw_mode()?;
        debug!(vim_mode = config.vim_mode, "terminal engine started");
        Ok(Self {
            out,
            config,
            prompt: String::new(),
            line: Vec::new(),
            pos: 0,
            raw: true,
        })
    }

    /// Wait for the next key press this engine understands
    fn next_key(&self) -> io::Result<Key> {
        loop {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(key) = decode_key(key_event, self.config.vim_mode) {
                    return Ok(key);
                }
            }
        }
    }
}

impl<W: Write> PromptDisplay for TerminalEngine<W> {
    fn set_prompt(&mut self, prompt: &str) {
        self.prompt.clear();
        self.prompt.push_str(prompt);
    }
}

impl<W: Write> LineEngine for TerminalEngine<W> {
    fn read_line(&mut self, hooks: &mut dyn KeyHooks) -> Result<String, EngineError> {
        loop {
            let key = self.next_key()?;
            trace!(%key, "key received");

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
    }

    fn refresh(&mut self) -> io::Result<()> {
        queue!(
            self.out,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            Print(&self.prompt)
        )?;
        self.out.flush()
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }

    fn close(&mut self) -> io::Result<()> {
        if self.raw {
            self.raw = false;
            disable_raw_mode()?;
            debug!("terminal engine closed");
        }
        Ok(())
    }
}

impl<W: Write> Drop for TerminalEngine<W> {
    fn drop(&mut self) {
        // Always give the terminal back, even on early returns
        if self.raw {
            let _ = disable_raw_mode();
        }
    }
}

/// Map a crossterm key event to an engine key
///
/// Escape is only delivered in vi mode, where it switches to normal mode.
pub fn decode_key(key_event: KeyEvent, vim_mode: bool) -> Option<Key> {
    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
    let key = match key_event.code {
        KeyCode::Char('c') if ctrl => Key::Interrupt,
        // Becomes Delete in read_line when the line is not empty
        KeyCode::Char('d') if ctrl => Key::Eof,
        KeyCode::Char('j') | KeyCode::Char('m') if ctrl => Key::Enter,
        KeyCode::Char('h') if ctrl => Key::Backspace,
        KeyCode::Char('b') if ctrl => Key::Left,
        KeyCode::Char('f') if ctrl => Key::Right,
        KeyCode::Char('a') if ctrl => Key::Home,
        KeyCode::Char('e') if ctrl => Key::End,
        KeyCode::Char('u') if ctrl => Key::KillLine,
        KeyCode::Char('w') if ctrl => Key::DeleteWord,
        KeyCode::Char(_) if ctrl => return None,
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Esc if vim_mode => Key::Escape,
        _ => return None,
    };
    Some(key)
}
