//! Per-action policy shared by every combinator.

use crate::ActionPriority;

/// Number of failed step runs an action tolerates before giving up.
pub const MAX_RETRIES: u32 = 5;

/// Policy record attached to an action at construction time.
///
/// ```rust,ignore
/// let opts = ActionOptions::new().can_be_skipped().resettable();
/// let action = StaticAction::new("pickup", build_steps).with_options(opts);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOptions {
    pub(crate) can_be_skipped: bool,
    pub(crate) reset_steps_on_error: bool,
    pub(crate) ignore_errors: bool,
    pub(crate) repeat_until_no_more_steps: bool,
    pub(crate) abort_if_empty: Option<String>,
    pub(crate) max_retries: u32,
    pub(crate) priority: ActionPriority,
}

impl Default for ActionOptions {
    fn default() -> Self {
        Self {
            can_be_skipped: false,
            reset_steps_on_error: false,
            ignore_errors: false,
            repeat_until_no_more_steps: false,
            abort_if_empty: None,
            max_retries: MAX_RETRIES,
            priority: ActionPriority::Normal,
        }
    }
}

impl ActionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give up with [`crate::ActionError::Skippable`] instead of
    /// [`crate::ActionError::NoRecover`].
    pub fn can_be_skipped(mut self) -> Self {
        self.can_be_skipped = true;
        self
    }

    /// Reset every step of the list whenever any step fails.
    pub fn resettable(mut self) -> Self {
        self.reset_steps_on_error = true;
        self
    }

    /// Finish with [`crate::Progress::Continue`] instead of failing.
    pub fn ignore_errors(mut self) -> Self {
        self.ignore_errors = true;
        self
    }

    /// Rebuild after the current steps (or children) are exhausted, until
    /// the builder produces nothing.
    pub fn repeat_until_no_more_steps(mut self) -> Self {
        self.repeat_until_no_more_steps = true;
        self
    }

    /// Make a [`crate::Chain`] fail with `reason` when its builder yields no
    /// children, instead of silently finishing.
    pub fn abort_if_empty(mut self, reason: impl Into<String>) -> Self {
        self.abort_if_empty = Some(reason.into());
        self
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries.max(1);
        self
    }

    pub fn priority(mut self, priority: ActionPriority) -> Self {
        self.priority = priority;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fail_hard_after_five_attempts() {
        let options = ActionOptions::new();
        assert_eq!(options.max_retries, MAX_RETRIES);
        assert!(!options.can_be_skipped && !options.ignore_errors);
        assert_eq!(options.priority, ActionPriority::Normal);
    }

    #[test]
    fn at_least_one_attempt() {
        assert_eq!(ActionOptions::new().max_retries(0).max_retries, 1);
        assert_eq!(ActionOptions::new().max_retries(3).max_retries, 3);
    }
}
