//! Yes/no resolution for confirm prompts.

/// Outcome of a confirm prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Accepted,
    Aborted,
}

/// Resolve `answer` against the prompt's `default`, ignoring case
///
/// With a "y" default anything but "n" accepts; otherwise only "y" does.
pub fn resolve(default: &str, answer: &str) -> ConfirmOutcome {
    let default = default.to_lowercase();
    let answer = answer.to_lowercase();

    let accepted = if default == "y" {
        answer != "n"
    } else {
        answer == "y"
    };

    if accepted {
        ConfirmOutcome::Accepted
    } else {
        ConfirmOutcome::Aborted
    }
}
