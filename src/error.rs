//! Error types for prompt runs.

use std::io;

use thiserror::Error;

use crate::engine::EngineError;

/// Errors returned by [`Prompt::run`](crate::Prompt::run)
#[derive(Error, Debug)]
pub enum PromptError {
    /// A template source did not compile. Raised before the terminal is touched.
    #[error("failed to compile the {name} template: {source}")]
    Template {
        name: &'static str,
        #[source]
        source: TemplateError,
    },

    /// The user pressed Ctrl+C.
    #[error("^C")]
    Interrupted,

    /// Input ended (Ctrl+D or a closed stream).
    #[error("^D")]
    Eof,

    /// The user answered no to a confirmation.
    #[error("confirmation declined")]
    Aborted,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid template file: {0}")]
    Json(#[from] serde_json::Error),
}

impl PromptError {
    pub fn is_interrupt(&self) -> bool {
        matches!(self, PromptError::Interrupted)
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, PromptError::Eof)
    }

    /// True for a declined confirmation, which is an answer rather than a failure
    pub fn is_abort(&self) -> bool {
        matches!(self, PromptError::Aborted)
    }
}

impl From<EngineError> for PromptError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Interrupt => PromptError::Interrupted,
            EngineError::Eof => PromptError::Eof,
            EngineError::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof => PromptError::Eof,
            EngineError::Io(e) => PromptError::Io(e),
        }
    }
}

/// A template source that failed to compile
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TemplateError {
    message: String,
}

impl TemplateError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Returned by a validator to reject the current input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&str> for ValidationError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for ValidationError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}
