//! Prompt Templates Module
//!
//! The six display templates a prompt switches between, their built-in
//! defaults, and the compiled set used for one run.

use std::fmt;
use std::fs;
use std::path::Path;

use crossterm::style::{Attribute, Color};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::template::{fg, styled, FuncMap, Template};
use crate::error::PromptError;

/// Icon shown while a prompt waits for input
pub fn icon_initial() -> String {
    fg("?", Color::DarkBlue)
}

/// Icon shown next to a valid value
pub fn icon_good() -> String {
    fg("✔", Color::DarkGreen)
}

pub fn icon_warn() -> String {
    fg("⚠", Color::DarkYellow)
}

/// Icon shown next to an invalid value
pub fn icon_bad() -> String {
    fg("✗", Color::DarkRed)
}

fn bold(text: &str) -> String {
    styled(text, Attribute::Bold)
}

/// Template sources for a prompt. Unset entries fall back to the defaults.
///
/// Every source uses the language described in [`super::template`]. The
/// value rendered is the prompt label, except for `validation_error` which
/// renders the validator's message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptTemplates {
    /// Label while editing, before any validation feedback
    pub prompt: Option<String>,
    /// Label of a yes/no prompt, replacing `prompt` in confirm mode
    pub confirm: Option<String>,
    pub valid: Option<String>,
    pub invalid: Option<String>,
    /// Label kept on screen after the value has been accepted
    pub success: Option<String>,
    /// Label while editing with lazy validation
    pub unvalidated: Option<String>,
    /// Shown instead of the prompt when Enter is pressed on an invalid value
    pub validation_error: Option<String>,
    /// Style functions; the default colors and attributes when unset
    #[serde(skip)]
    pub funcs: Option<FuncMap>,
}

impl PromptTemplates {
    /// Read template sources from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PromptError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, PromptError> {
        Ok(serde_json::from_str(content)?)
    }

    /// A copy with every unset source replaced by its default
    ///
    /// The confirm default shows `[Y/n]` when `default` is "y" (any case) and
    /// `[y/N]` otherwise.
    pub fn with_defaults(&self, is_confirm: bool, default: &str) -> Self {
        let initial = icon_initial();
        let colon = bold(":");
        // Empty sources count as unset
        let or_default = |source: &Option<String>, fallback: String| {
            Some(
                source
                    .as_deref()
                    .filter(|s| !s.is_empty())
                    .map_or(fallback, str::to_string),
            )
        };

        let confirm = if is_confirm {
            let choices = if default.eq_ignore_ascii_case("y") {
                "Y/n"
            } else {
                "y/N"
            };
            or_default(
                &self.confirm,
                format!(
                    r#"{{{{ "{}" | bold }}}} {{{{ . | bold }}}}? {{{{ "[{}]" | faint }}}} "#,
                    initial, choices
                ),
            )
        } else {
            self.confirm.clone()
        };

        Self {
            prompt: or_default(
                &self.prompt,
                format!("{} {{{{ . | bold }}}}{} ", bold(&initial), colon),
            ),
            confirm,
            valid: or_default(
                &self.valid,
                format!("{} {{{{ . | bold }}}}{} ", bold(&icon_good()), colon),
            ),
            invalid: or_default(
                &self.invalid,
                format!("{} {{{{ . | bold }}}}{} ", bold(&icon_bad()), colon),
            ),
            success: or_default(
                &self.success,
                format!("{{{{ . | faint }}}}{} ", styled(":", Attribute::Dim)),
            ),
            unvalidated: or_default(
                &self.unvalidated,
                format!("{} {{{{ . | bold }}}}{} ", bold(&initial), colon),
            ),
            validation_error: or_default(
                &self.validation_error,
                r#"{{ ">>" | red }} {{ . | red }} {{ "Press any key to get back to the prompt" | faint }}"#
                    .to_string(),
            ),
            funcs: Some(self.funcs.clone().unwrap_or_default()),
        }
    }
}

/// Which compiled template to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    /// The prompt (or confirm) label
    Initial,
    Valid,
    Invalid,
    Unvalidated,
    ValidationError,
    Success,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 6] = [
        TemplateKind::Initial,
        TemplateKind::Valid,
        TemplateKind::Invalid,
        TemplateKind::Unvalidated,
        TemplateKind::ValidationError,
        TemplateKind::Success,
    ];

    fn index(self) -> usize {
        match self {
            TemplateKind::Initial => 0,
            TemplateKind::Valid => 1,
            TemplateKind::Invalid => 2,
            TemplateKind::Unvalidated => 3,
            TemplateKind::ValidationError => 4,
            TemplateKind::Success => 5,
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TemplateKind::Initial => "initial",
            TemplateKind::Valid => "valid",
            TemplateKind::Invalid => "invalid",
            TemplateKind::Unvalidated => "unvalidated",
            TemplateKind::ValidationError => "validation_error",
            TemplateKind::Success => "success",
        };
        f.write_str(name)
    }
}

/// The six templates of one run, compiled up front
#[derive(Debug, Clone)]
pub struct TemplateSet {
    templates: [Template; 6],
}

impl TemplateSet {
    /// Fill in defaults and compile every template
    ///
    /// Fails on the first template that does not compile, naming it.
    pub fn compile(
        sources: &PromptTemplates,
        is_confirm: bool,
        default: &str,
    ) -> Result<Self, PromptError> {
        let sources = sources.with_defaults(is_confirm, default);
        let funcs = sources.funcs.clone().unwrap_or_default();

        let compile = |name: &'static str, source: &Option<String>| {
            Template::compile(source.as_deref().unwrap_or_default(), &funcs)
                .map_err(|source| PromptError::Template { name, source })
        };

        let initial = if is_confirm {
            compile("confirm", &sources.confirm)?
        } else {
            compile("prompt", &sources.prompt)?
        };

        Ok(Self {
            templates: [
                initial,
                compile("valid", &sources.valid)?,
                compile("invalid", &sources.invalid)?,
                compile("unvalidated", &sources.unvalidated)?,
                compile("validation_error", &sources.validation_error)?,
                compile("success", &sources.success)?,
            ],
        })
    }

    pub fn get(&self, kind: TemplateKind) -> &Template {
        &self.templates[kind.index()]
    }

    pub fn render(&self, kind: TemplateKind, value: &Value) -> String {
        self.get(kind).render(value)
    }
}
