//! Single-Line Prompt Module
//!
//! An interactive text prompt with a label, optional default value, input
//! masking, live or lazy validation and a yes/no confirm variant.
//!
//! ## Module Structure
//!
//! - `cursor` - Input buffer, cursor position and echo rendering
//! - `keys` - Key to edit-operation mapping, emacs and vi style
//! - `template` - Template language and style functions
//! - `templates` - The six prompt templates and their defaults
//! - `validation` - Template selection and submission gating
//! - `confirm` - Yes/no answer resolution
//! - `prompter` - The prompt itself and its run loop

pub mod confirm;
pub mod cursor;
pub mod keys;
pub mod prompter;
pub mod template;
pub mod templates;
pub mod validation;

// Re-export main types for convenience
pub use confirm::ConfirmOutcome;
pub use cursor::{Cursor, Pointer};
pub use keys::{EditOp, KeyMap};
pub use prompter::Prompt;
pub use template::{FuncMap, Template};
pub use templates::{PromptTemplates, TemplateKind, TemplateSet};
pub use validation::{ValidateFn, ValidationState};
