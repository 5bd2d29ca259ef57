//! lineprompt - interactive single-line prompts for command-line tools
//!
//! Displays a label, reads a line of input key by key and paints feedback as
//! the user types.
//!
//! # Features
//!
//! - **Defaults**: Pre-filled values, either editable or cleared by the first key
//! - **Masking**: Hide input behind a mask character (passwords)
//! - **Validation**: Live feedback on every key, or lazily at Enter only
//! - **Confirm Prompts**: Yes/no questions resolved against a default answer
//! - **Templates**: Customisable labels with colors and structured values
//! - **Vi Mode**: Optional vi-style normal/insert editing
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use lineprompt::{Prompt, PromptError};
//!
//! let password = Prompt::new("Password").with_mask('*').run()?;
//!
//! match Prompt::new("Deploy now").with_default("n").as_confirm().run() {
//!     Ok(_) => println!("deploying"),
//!     Err(PromptError::Aborted) => println!("skipped"),
//!     Err(e) => return Err(e),
//! }
//! # Ok::<(), PromptError>(())
//! ```
//!
//! Runs are driven through the [`engine::LineEngine`] trait. The terminal
//! engine is used by [`Prompt::run`]; [`engine::ScriptedEngine`] replays keys
//! for tests via [`Prompt::run_with`].

pub mod engine;
pub mod error;
pub mod prompt;

// Re-export commonly used types for convenience
pub use error::{PromptError, TemplateError, ValidationError};
pub use prompt::{Pointer, Prompt, PromptTemplates};
