//! Outcome of polling an action.
//!
//! Every poll resolves to one of five cheaply distinguishable outcomes:
//!
//! | Outcome                        | Meaning                                               |
//! |--------------------------------|-------------------------------------------------------|
//! | `Ok(Progress::Running)`        | made progress, poll again later                       |
//! | `Ok(Progress::Completed)`      | no more steps; terminal                               |
//! | `Ok(Progress::Continue(_))`    | a step failed but the action absorbs it; terminal     |
//! | `Err(ActionError::Skippable)`  | retry ceiling hit on a non-critical action            |
//! | `Err(ActionError::NoRecover)`  | retry ceiling hit; the current game cannot continue   |
//!
//! Parents treat `Completed` and `Continue` identically and bubble everything
//! else up untouched.

use std::fmt;

use thiserror::Error;

/// Result of a single poll.
pub type Poll = Result<Progress, ActionError>;

/// Non-error poll outcomes.
#[derive(Debug)]
pub enum Progress {
    /// Work was done; the action is not finished.
    Running,
    /// The action has no more steps.
    Completed,
    /// A step exhausted its retries on an action that ignores errors. The
    /// action is finished; the failure is carried for logging.
    Continue(StepFailure),
}

impl Progress {
    /// Whether a parent should move on to its next child.
    #[inline]
    pub fn is_done(&self) -> bool {
        !matches!(self, Progress::Running)
    }
}

/// A step failure annotated with the name of the failing step.
#[derive(Debug)]
pub struct StepFailure {
    pub step: &'static str,
    pub source: anyhow::Error,
}

impl StepFailure {
    pub fn new(step: &'static str, source: anyhow::Error) -> Self {
        Self { step, source }
    }
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "attempt limit reached on step {}: {}", self.step, self.source)
    }
}

#[derive(Debug, Error)]
pub enum ActionError {
    /// The action is not critical; the game can continue without it.
    #[error("action can be skipped, {0}")]
    Skippable(StepFailure),

    /// The game cannot continue; callers usually run a recovery routine.
    #[error("unrecoverable error, {0}")]
    NoRecover(StepFailure),

    /// A chain refused to run because its builder produced nothing.
    #[error("action aborted: {reason}")]
    Aborted { reason: String },
}

impl ActionError {
    /// Name of the step that exhausted its retries, if any.
    pub fn step(&self) -> Option<&'static str> {
        match self {
            ActionError::Skippable(failure) | ActionError::NoRecover(failure) => {
                Some(failure.step)
            }
            ActionError::Aborted { .. } => None,
        }
    }

    #[inline]
    pub fn is_skippable(&self) -> bool {
        matches!(self, ActionError::Skippable(_))
    }
}
