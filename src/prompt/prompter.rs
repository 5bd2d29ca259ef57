//! Prompt Runner
//!
//! The single-line prompt itself: configuration, and the loop that feeds keys
//! through the cursor, the validation state machine and the templates before
//! handing the painted line back to the engine.

use std::fmt;

use crossterm::{cursor, terminal};
use serde_json::Value;
use tracing::{debug, warn};

use super::confirm::{resolve, ConfirmOutcome};
use super::cursor::{Cursor, Pointer};
use super::keys::KeyMap;
use super::templates::{PromptTemplates, TemplateKind, TemplateSet};
use super::validation::{ValidateFn, Validation};
use crate::engine::{
    ansi, EngineConfig, Key, KeyHooks, LineEngine, Listen, PromptDisplay, TerminalEngine,
};
use crate::error::{PromptError, ValidationError};

/// A single-line text prompt
///
/// ```rust,no_run
/// use lineprompt::Prompt;
///
/// let name = Prompt::new("Username")
///     .with_validate(|input| {
///         if input.len() < 3 {
///             return Err("username must have at least 3 characters".into());
///         }
///         Ok(())
///     })
///     .run()?;
/// # Ok::<(), lineprompt::PromptError>(())
/// ```
pub struct Prompt {
    /// Value handed to the templates: a plain string, or a structured value
    /// whose fields templates reach with `{{ .Field }}`
    pub label: Value,
    /// Initial input. In confirm mode this is the answer used for an empty reply.
    pub default: String,
    /// Let the user edit the default. When false, any key other than Enter
    /// clears the default first.
    pub allow_edit: bool,
    pub validate: Option<ValidateFn>,
    /// Character drawn instead of the input. `'\0'` counts as no mask.
    pub mask: Option<char>,
    /// Only validate at Enter; draw the unvalidated template while editing
    pub lazy_validation: bool,
    pub templates: PromptTemplates,
    /// Ask a yes/no question instead of reading free text
    pub is_confirm: bool,
    pub is_vim_mode: bool,
    pub pointer: Pointer,
}

impl Prompt {
    /// Create a prompt with the default templates and no validation
    pub fn new(label: impl Into<Value>) -> Self {
        Self {
            label: label.into(),
            default: String::new(),
            allow_edit: false,
            validate: None,
            mask: None,
            lazy_validation: false,
            templates: PromptTemplates::default(),
            is_confirm: false,
            is_vim_mode: false,
            pointer: Pointer::default(),
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = default.into();
        self
    }

    pub fn with_allow_edit(mut self, allow_edit: bool) -> Self {
        self.allow_edit = allow_edit;
        self
    }

    pub fn with_validate<F>(mut self, validate: F) -> Self
    where
        F: Fn(&str) -> Result<(), ValidationError> + 'static,
    {
        self.validate = Some(Box::new(validate));
        self
    }

    pub fn with_mask(mut self, mask: char) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn with_lazy_validation(mut self, lazy: bool) -> Self {
        self.lazy_validation = lazy;
        self
    }

    pub fn with_templates(mut self, templates: PromptTemplates) -> Self {
        self.templates = templates;
        self
    }

    /// Turn this into a yes/no prompt
    pub fn as_confirm(mut self) -> Self {
        self.is_confirm = true;
        self
    }

    pub fn with_vim_mode(mut self, vim_mode: bool) -> Self {
        self.is_vim_mode = vim_mode;
        self
    }

    pub fn with_pointer(mut self, pointer: Pointer) -> Self {
        self.pointer = pointer;
        self
    }

    /// Effective mask character
    pub fn mask(&self) -> Option<char> {
        self.mask.filter(|&c| c != '\0')
    }

    /// Settings a line engine should be built with for this prompt
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            vim_mode: self.is_vim_mode,
        }
    }

    /// Run the prompt on the terminal and return the entered value
    ///
    /// Blocks until the user submits a valid value, presses Ctrl+C
    /// ([`PromptError::Interrupted`]) or input ends ([`PromptError::Eof`]).
    /// A confirm prompt answered no returns [`PromptError::Aborted`].
    pub fn run(&self) -> Result<String, PromptError> {
        let templates = self.compile_templates()?;
        let mut engine = TerminalEngine::stdout(self.engine_config())?;
        self.run_session(&templates, &mut engine)
    }

    /// Run the prompt on a caller supplied engine
    pub fn run_with<E: LineEngine + ?Sized>(&self, engine: &mut E) -> Result<String, PromptError> {
        let templates = self.compile_templates()?;
        self.run_session(&templates, engine)
    }

    fn compile_templates(&self) -> Result<TemplateSet, PromptError> {
        TemplateSet::compile(&self.templates, self.is_confirm, &self.default)
    }

    fn run_session<E: LineEngine + ?Sized>(
        &self,
        templates: &TemplateSet,
        engine: &mut E,
    ) -> Result<String, PromptError> {
        let result = self.drive(templates, engine);
        let closed = engine.close();
        let value = result?;
        closed?;
        Ok(value)
    }

    fn drive<E: LineEngine + ?Sized>(
        &self,
        templates: &TemplateSet,
        engine: &mut E,
    ) -> Result<String, PromptError> {
        let input = if self.is_confirm {
            ""
        } else {
            self.default.as_str()
        };
        let erase_default = !input.is_empty() && !self.allow_edit;

        let mut session = Session {
            label: &self.label,
            templates,
            mask: self.mask(),
            cursor: Cursor::new(input, self.pointer, erase_default),
            keys: KeyMap::new(self.is_vim_mode),
            validation: Validation::new(
                self.validate.as_ref(),
                self.lazy_validation,
                self.is_confirm,
            ),
        };

        debug!(
            confirm = self.is_confirm,
            lazy = self.lazy_validation,
            masked = session.mask.is_some(),
            "prompt started"
        );

        // The echo draws its own pointer
        engine.write(&ansi(cursor::Hide))?;
        engine.set_prompt(&session.frame(TemplateKind::Initial));
        engine.refresh()?;

        if let Err(err) = engine.read_line(&mut session) {
            let err = PromptError::from(err);
            debug!(error = %err, "prompt ended without a value");
            if let Err(write_err) = engine.write(&format!("\r\n{}", ansi(cursor::Show))) {
                warn!(error = %write_err, "failed to restore the cursor");
            }
            return Err(err);
        }

        let value = session.cursor.get();
        let mut line = session.success_line();
        let mut outcome = Ok(value);

        if self.is_confirm {
            let answer = session.cursor.get();
            if resolve(&self.default, &answer) == ConfirmOutcome::Aborted {
                debug!(answer = %answer, "confirmation declined");
                line = templates.render(TemplateKind::Invalid, &self.label);
                outcome = Err(PromptError::Aborted);
            }
        }

        engine.write(&format!(
            "\r{}{}\r\n{}",
            ansi(terminal::Clear(terminal::ClearType::CurrentLine)),
            line,
            ansi(cursor::Show)
        ))?;
        outcome
    }
}

impl fmt::Debug for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prompt")
            .field("label", &self.label)
            .field("default", &self.default)
            .field("allow_edit", &self.allow_edit)
            .field("validate", &self.validate.is_some())
            .field("mask", &self.mask)
            .field("lazy_validation", &self.lazy_validation)
            .field("templates", &self.templates)
            .field("is_confirm", &self.is_confirm)
            .field("is_vim_mode", &self.is_vim_mode)
            .field("pointer", &self.pointer)
            .finish()
    }
}

/// Per-run state shared with the engine callbacks
struct Session<'a> {
    label: &'a Value,
    templates: &'a TemplateSet,
    mask: Option<char>,
    cursor: Cursor,
    keys: KeyMap,
    validation: Validation<'a>,
}

impl Session<'_> {
    /// Template `kind` followed by the echo with its pointer
    fn frame(&self, kind: TemplateKind) -> String {
        let mut frame = self.templates.render(kind, self.label);
        match self.mask {
            Some(mask) => frame.push_str(&self.cursor.format_mask(mask)),
            None => frame.push_str(&self.cursor.format()),
        }
        frame
    }

    /// Line left on screen once the value is accepted
    fn success_line(&mut self) -> String {
        let kind = self.validation.succeed();
        let mut line = self.templates.render(kind, self.label);
        line.push_str(&self.cursor.rendered_echo(self.mask));
        line
    }
}

impl KeyHooks for Session<'_> {
    fn filter_key(&mut self, key: Key, display: &mut dyn PromptDisplay) -> (Key, bool) {
        if key != Key::Enter {
            return (key, true);
        }

        match self.validation.on_submit(&self.cursor.get()) {
            Ok(()) => (key, true),
            Err(err) => {
                let message = Value::String(err.message().to_string());
                display.set_prompt(&self.templates.render(TemplateKind::ValidationError, &message));
                (key, false)
            }
        }
    }

    fn on_key(
        &mut self,
        _line: &[char],
        _pos: usize,
        key: Key,
        display: &mut dyn PromptDisplay,
    ) -> Listen {
        let op = self.keys.translate(key);
        let keep_on = self.cursor.listen(op);
        let kind = self.validation.after_edit(&self.cursor.get());
        display.set_prompt(&self.frame(kind));

        Listen {
            line: self.cursor.chars().to_vec(),
            pos: self.cursor.position(),
            keep_on,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ScriptedEngine;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn plain(source: &str) -> Option<String> {
        Some(source.to_string())
    }

    fn plain_templates() -> PromptTemplates {
        PromptTemplates {
            prompt: plain("? {{ . }}: "),
            confirm: plain("{{ . }}? "),
            valid: plain("V {{ . }}: "),
            invalid: plain("X {{ . }}: "),
            success: plain("{{ . }}: "),
            unvalidated: plain("U {{ . }}: "),
            validation_error: plain(">> {{ . }}"),
            funcs: None,
        }
    }

    fn prompt(label: &str) -> Prompt {
        Prompt::new(label)
            .with_templates(plain_templates())
            .with_pointer(Pointer::None)
    }

    fn min_len(n: usize) -> impl Fn(&str) -> Result<(), ValidationError> {
        move |input: &str| {
            if input.chars().count() >= n {
                Ok(())
            } else {
                Err(format!("needs {} characters", n).into())
            }
        }
    }

    fn keys(text: &str) -> Vec<Key> {
        text.chars().map(Key::Char).collect()
    }

    #[test]
    fn test_typed_value_is_returned() {
        let mut engine = ScriptedEngine::typing("ada");
        let value = prompt("Name").run_with(&mut engine).unwrap();

        assert_eq!(value, "ada");
        assert_eq!(engine.frames()[0], "? Name: ");
        assert!(engine.written().contains("Name: ada\r\n"));
        assert!(engine.written().ends_with(&ansi(cursor::Show)));
        assert!(engine.is_closed());
    }

    #[test]
    fn test_default_returned_on_enter() {
        let mut engine = ScriptedEngine::new([Key::Enter]);
        let value = prompt("Host")
            .with_default("localhost")
            .run_with(&mut engine)
            .unwrap();
        assert_eq!(value, "localhost");
        assert_eq!(engine.frames()[0], "? Host: localhost");
    }

    #[test]
    fn test_first_key_erases_default() {
        let mut engine = ScriptedEngine::typing("x");
        let value = prompt("Host")
            .with_default("localhost")
            .run_with(&mut engine)
            .unwrap();
        assert_eq!(value, "x");
    }

    #[test]
    fn test_allow_edit_keeps_default() {
        let mut script = vec![Key::Home];
        script.extend(keys("my"));
        script.push(Key::Enter);
        let mut engine = ScriptedEngine::new(script);

        let value = prompt("Host")
            .with_default("host")
            .with_allow_edit(true)
            .run_with(&mut engine)
            .unwrap();
        assert_eq!(value, "myhost");
    }

    #[test]
    fn test_eager_validation_tracks_every_key() {
        let mut engine = ScriptedEngine::typing("abc");
        prompt("Name")
            .with_validate(min_len(2))
            .run_with(&mut engine)
            .unwrap();

        let frames = engine.frames();
        assert_eq!(frames[1], "X Name: a");
        assert_eq!(frames[2], "V Name: ab");
        assert_eq!(frames[3], "V Name: abc");
    }

    #[test]
    fn test_lazy_validation_renders_unvalidated() {
        let mut engine = ScriptedEngine::typing("abcdef");
        prompt("Name")
            .with_validate(min_len(3))
            .with_lazy_validation(true)
            .run_with(&mut engine)
            .unwrap();

        for frame in &engine.frames()[1..] {
            assert!(frame.starts_with("U Name: "), "unexpected frame {:?}", frame);
        }
    }

    #[test]
    fn test_enter_blocked_until_value_is_valid() {
        let mut script = keys("ab");
        script.push(Key::Enter);
        script.push(Key::Char('c'));
        script.push(Key::Enter);
        let mut engine = ScriptedEngine::new(script);

        let value = prompt("Name")
            .with_validate(min_len(3))
            .with_lazy_validation(true)
            .run_with(&mut engine)
            .unwrap();

        assert_eq!(value, "abc");
        let frames = engine.frames();
        assert!(frames.iter().any(|f| f == ">> needs 3 characters"));
        let blocked = frames.iter().position(|f| f == ">> needs 3 characters").unwrap();
        assert_eq!(frames[blocked + 1], "U Name: abc");
    }

    #[test]
    fn test_blocked_enter_without_fix_never_submits() {
        let mut engine = ScriptedEngine::new([Key::Char('a'), Key::Enter, Key::Enter]);
        let err = prompt("Name")
            .with_validate(min_len(3))
            .run_with(&mut engine)
            .unwrap_err();
        assert!(err.is_eof());
        assert_eq!(engine.last_frame(), Some(">> needs 3 characters"));
    }

    #[test]
    fn test_interrupt_discards_buffer() {
        let mut script = keys("secret");
        script.push(Key::Interrupt);
        let mut engine = ScriptedEngine::new(script);

        let err = prompt("Name").run_with(&mut engine).unwrap_err();
        assert!(err.is_interrupt());
        assert!(engine.is_closed());
        assert!(engine.written().ends_with(&ansi(cursor::Show)));
    }

    #[test]
    fn test_end_of_input() {
        let mut engine = ScriptedEngine::new([Key::Eof, Key::Enter]);
        let err = prompt("Name").run_with(&mut engine).unwrap_err();
        assert!(err.is_eof());
        assert!(engine.is_closed());
        assert_eq!(engine.remaining_keys(), 1);
    }

    #[test]
    fn test_ctrl_d_deletes_while_line_has_text() {
        let mut script = keys("abc");
        script.extend([Key::Left, Key::Eof, Key::Enter]);
        let mut engine = ScriptedEngine::new(script);

        let value = prompt("Name").run_with(&mut engine).unwrap();
        assert_eq!(value, "ab");
    }

    #[test]
    fn test_mask_hides_input_everywhere() {
        let mut engine = ScriptedEngine::typing("pw");
        let value = prompt("Password")
            .with_mask('*')
            .run_with(&mut engine)
            .unwrap();

        assert_eq!(value, "pw");
        assert!(engine.frames().iter().all(|f| !f.contains("pw")));
        assert!(engine.written().contains("Password: **\r\n"));
    }

    #[test]
    fn test_nul_mask_means_no_mask() {
        let prompt = prompt("Name").with_mask('\0');
        assert_eq!(prompt.mask(), None);
    }

    #[test]
    fn test_vim_mode_editing() {
        let mut script = keys("abc");
        script.extend([Key::Escape, Key::Char('h'), Key::Char('x'), Key::Enter]);
        let mut engine = ScriptedEngine::new(script);

        let value = prompt("Name")
            .with_vim_mode(true)
            .run_with(&mut engine)
            .unwrap();
        assert_eq!(value, "ab");
    }

    #[test]
    fn test_vim_mode_keeps_erase_on_edit() {
        let run = |script: Vec<Key>| {
            let mut engine = ScriptedEngine::new(script);
            prompt("Host")
                .with_default("host")
                .with_vim_mode(true)
                .run_with(&mut engine)
                .unwrap()
        };

        // Typing in insert mode replaces the default
        assert_eq!(run(vec![Key::Char('x'), Key::Enter]), "x");

        // A normal-mode delete is an edit too
        assert_eq!(run(vec![Key::Escape, Key::Char('x'), Key::Enter]), "");

        // Moving right first keeps the default for in-place editing
        let script = vec![
            Key::Escape,
            Key::Char('0'),
            Key::Char('l'),
            Key::Char('i'),
            Key::Char('o'),
            Key::Enter,
        ];
        assert_eq!(run(script), "hoost");

        // Submitting untouched from normal mode returns the default
        assert_eq!(run(vec![Key::Escape, Key::Enter]), "host");
    }

    #[test]
    fn test_empty_prompt_template_draws_default_label() {
        let templates = PromptTemplates::from_json_str(r#"{"prompt": ""}"#).unwrap();
        let mut engine = ScriptedEngine::new([Key::Enter]);

        Prompt::new("Name")
            .with_templates(templates)
            .with_pointer(Pointer::None)
            .run_with(&mut engine)
            .unwrap();

        let first = &engine.frames()[0];
        assert!(first.contains("Name"));
        assert!(first.contains('?'));
    }

    #[test]
    fn test_structured_label() {
        let mut templates = plain_templates();
        templates.prompt = plain("{{ .Name }} ({{ .Hint }}): ");
        let mut engine = ScriptedEngine::new([Key::Enter]);

        Prompt::new(json!({"Name": "Port", "Hint": "1-65535"}))
            .with_templates(templates)
            .with_pointer(Pointer::None)
            .run_with(&mut engine)
            .unwrap();
        assert_eq!(engine.frames()[0], "Port (1-65535): ");
    }

    #[test]
    fn test_bad_template_fails_before_drawing() {
        let mut templates = plain_templates();
        templates.success = plain("{{ . | nope }}");
        let mut engine = ScriptedEngine::typing("a");

        let err = prompt("Name")
            .with_templates(templates)
            .run_with(&mut engine)
            .unwrap_err();
        assert!(matches!(err, PromptError::Template { name: "success", .. }));
        assert!(engine.frames().is_empty());
        assert!(engine.written().is_empty());
    }

    #[test]
    fn test_confirm_default_no_accepts_yes() {
        let mut engine = ScriptedEngine::typing("Y");
        let value = prompt("Continue")
            .with_default("N")
            .as_confirm()
            .run_with(&mut engine)
            .unwrap();
        assert_eq!(value, "Y");
        assert_eq!(engine.frames()[0], "Continue? ");
    }

    #[test]
    fn test_confirm_default_no_aborts_on_empty() {
        let mut engine = ScriptedEngine::new([Key::Enter]);
        let err = prompt("Continue")
            .with_default("N")
            .as_confirm()
            .run_with(&mut engine)
            .unwrap_err();
        assert!(err.is_abort());
        assert!(engine.written().contains("X Continue: \r\n"));
        assert!(engine.is_closed());
    }

    #[test]
    fn test_confirm_default_yes() {
        let mut engine = ScriptedEngine::new([Key::Enter]);
        let value = prompt("Continue")
            .with_default("y")
            .as_confirm()
            .run_with(&mut engine)
            .unwrap();
        assert_eq!(value, "");

        let mut engine = ScriptedEngine::typing("n");
        let err = prompt("Continue")
            .with_default("y")
            .as_confirm()
            .run_with(&mut engine)
            .unwrap_err();
        assert!(err.is_abort());
    }

    #[test]
    fn test_confirm_ignores_default_as_input() {
        let mut engine = ScriptedEngine::typing("y");
        let value = prompt("Continue")
            .with_default("n")
            .as_confirm()
            .run_with(&mut engine)
            .unwrap();
        assert_eq!(value, "y");
    }
}
