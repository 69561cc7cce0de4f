//! Ordered composition of child actions.

use crate::{Action, ActionError, ActionOptions, ActionPriority, Poll, Progress};

/// Boxed action as stored by the combinators.
pub type BoxedAction<D> = Box<dyn Action<D>>;

/// Polls children in order, one active child at a time.
///
/// The child list is built lazily from the first snapshot. Children that
/// report [`Progress::Completed`] or [`Progress::Continue`] are passed over;
/// any other outcome is returned to the caller untouched.
pub struct Chain<D, F> {
    name: String,
    builder: F,
    children: Option<Vec<BoxedAction<D>>>,
    options: ActionOptions,
    rounds: u32,
    finished: bool,
}

impl<D, F> Chain<D, F>
where
    F: FnMut(&D) -> Vec<BoxedAction<D>> + Send,
{
    pub fn new(name: impl Into<String>, builder: F) -> Self {
        Self {
            name: name.into(),
            builder,
            children: None,
            options: ActionOptions::default(),
            rounds: 0,
            finished: false,
        }
    }

    pub fn with_options(mut self, options: ActionOptions) -> Self {
        self.options = options;
        self
    }
}

impl<D, F> Action<D> for Chain<D, F>
where
    F: FnMut(&D) -> Vec<BoxedAction<D>> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn next_step(&mut self, data: &D) -> Poll {
        if self.finished {
            return Ok(Progress::Completed);
        }

        let children = match self.children.take() {
            Some(children) => children,
            None => {
                let children = (self.builder)(data);
                self.rounds += 1;
                if children.is_empty() {
                    if let (1, Some(reason)) = (self.rounds, &self.options.abort_if_empty) {
                        return Err(ActionError::Aborted {
                            reason: reason.clone(),
                        });
                    }
                    self.finished = true;
                    return Ok(Progress::Completed);
                }
                children
            }
        };
        let children = self.children.insert(children);

        for child in children.iter_mut() {
            match child.next_step(data) {
                Ok(Progress::Completed) => continue,
                Ok(Progress::Continue(failure)) => {
                    tracing::debug!(action = child.name(), %failure, "continuing after ignored failure");
                    continue;
                }
                other => return other,
            }
        }

        if self.options.repeat_until_no_more_steps {
            self.children = None;
            return Ok(Progress::Running);
        }

        self.finished = true;
        Ok(Progress::Completed)
    }

    fn skip(&mut self) {
        self.finished = true;
    }

    fn priority(&self) -> ActionPriority {
        self.options.priority
    }
}
