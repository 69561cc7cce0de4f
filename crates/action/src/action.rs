//! Core action trait.
//!
//! An [`Action`] is polled repeatedly by a driver against the latest world
//! state snapshot `D`. Each poll performs at most one step increment and
//! reports a [`Poll`] outcome.

use crate::Poll;

/// Ordering tag used by drivers that poll several actions per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ActionPriority {
    High,
    #[default]
    Normal,
}

/// A resumable unit of bot work.
pub trait Action<D>: Send {
    /// Name used in logs and debug markers.
    fn name(&self) -> &str;

    /// Advance the action by one increment against `data`.
    ///
    /// Once a poll returned [`crate::Progress::Completed`] or
    /// [`crate::Progress::Continue`], every later poll returns `Completed`.
    fn next_step(&mut self, data: &D) -> Poll;

    /// Mark the action permanently finished. Later polls return
    /// [`crate::Progress::Completed`] without running any step.
    fn skip(&mut self);

    fn priority(&self) -> ActionPriority {
        ActionPriority::Normal
    }
}

impl<D> Action<D> for Box<dyn Action<D>> {
    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline]
    fn next_step(&mut self, data: &D) -> Poll {
        (**self).next_step(data)
    }

    #[inline]
    fn skip(&mut self) {
        (**self).skip()
    }

    #[inline]
    fn priority(&self) -> ActionPriority {
        (**self).priority()
    }
}

/// An absent action polls as finished.
impl<D, A: Action<D>> Action<D> for Option<A> {
    fn name(&self) -> &str {
        self.as_ref().map_or("none", |action| action.name())
    }

    fn next_step(&mut self, data: &D) -> Poll {
        match self {
            Some(action) => action.next_step(data),
            None => Ok(crate::Progress::Completed),
        }
    }

    fn skip(&mut self) {
        if let Some(action) = self {
            action.skip();
        }
    }

    fn priority(&self) -> ActionPriority {
        self.as_ref()
            .map_or(ActionPriority::Normal, |action| action.priority())
    }
}
