//! Validation Module
//!
//! Decides which template is drawn after each edit and whether Enter may
//! submit. Live feedback depends on the lazy/eager mode; the check at Enter
//! always runs.

use tracing::debug;

use super::templates::TemplateKind;
use crate::error::ValidationError;

/// User supplied check run against the current input
pub type ValidateFn = Box<dyn Fn(&str) -> Result<(), ValidationError>>;

/// Where the prompt stands with respect to validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationState {
    /// Lazy mode while editing
    Unvalidated,
    Valid,
    Invalid,
    /// Enter was pressed on an invalid value; lasts until the next key
    ValidationBlocked,
    /// Submitted and accepted
    Success,
}

/// Validation state machine for one prompt run
pub struct Validation<'a> {
    validate: Option<&'a ValidateFn>,
    lazy: bool,
    confirm: bool,
    state: ValidationState,
}

impl<'a> Validation<'a> {
    pub fn new(validate: Option<&'a ValidateFn>, lazy: bool, confirm: bool) -> Self {
        Self {
            validate,
            lazy,
            confirm,
            state: ValidationState::Unvalidated,
        }
    }

    pub fn state(&self) -> ValidationState {
        self.state
    }

    fn check(&self, value: &str) -> Result<(), ValidationError> {
        match self.validate {
            Some(validate) => validate(value),
            None => Ok(()),
        }
    }

    /// Update after an edit and pick the template for the next redraw
    pub fn after_edit(&mut self, value: &str) -> TemplateKind {
        if self.lazy {
            self.state = ValidationState::Unvalidated;
            return TemplateKind::Unvalidated;
        }

        match self.check(value) {
            Ok(()) => {
                self.state = ValidationState::Valid;
                if self.confirm {
                    TemplateKind::Initial
                } else {
                    TemplateKind::Valid
                }
            }
            Err(_) => {
                self.state = ValidationState::Invalid;
                TemplateKind::Invalid
            }
        }
    }

    /// Check the value at Enter, whatever the mode
    ///
    /// On failure the state becomes [`ValidationState::ValidationBlocked`] and
    /// the error is handed back for the validation-error template.
    pub fn on_submit(&mut self, value: &str) -> Result<(), ValidationError> {
        self.check(value).map_err(|err| {
            debug!(error = %err, "submission blocked by validator");
            self.state = ValidationState::ValidationBlocked;
            err
        })
    }

    /// Mark the run as accepted; returns the template kept on screen
    pub fn succeed(&mut self) -> TemplateKind {
        self.state = ValidationState::Success;
        TemplateKind::Success
    }
}
