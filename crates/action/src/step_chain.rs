//! Step list run once, or repeatedly until the builder has nothing left.

use crate::{
    Action, ActionOptions, ActionPriority, Poll, Progress,
    step_list::{Advance, BoxedStep, StepList, give_up},
};

/// Step list built on first poll. With
/// [`ActionOptions::repeat_until_no_more_steps`] the builder is asked again
/// each time the list is exhausted; otherwise the action finishes.
///
/// Wrap in `Option` where an absent chain must read as finished.
pub struct StepChainAction<D, F> {
    name: String,
    builder: F,
    steps: StepList<D>,
    options: ActionOptions,
    built: bool,
    finished: bool,
}

impl<D, F> StepChainAction<D, F>
where
    F: FnMut(&D) -> Vec<BoxedStep<D>> + Send,
{
    pub fn new(name: impl Into<String>, builder: F) -> Self {
        Self {
            name: name.into(),
            builder,
            steps: StepList::default(),
            options: ActionOptions::default(),
            built: false,
            finished: false,
        }
    }

    pub fn with_options(mut self, options: ActionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn retries(&self) -> u32 {
        self.steps.retries()
    }
}

impl<D, F> Action<D> for StepChainAction<D, F>
where
    F: FnMut(&D) -> Vec<BoxedStep<D>> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn next_step(&mut self, data: &D) -> Poll {
        if self.finished {
            return Ok(Progress::Completed);
        }

        if !self.built {
            self.built = true;
            self.steps.replace((self.builder)(data));
        }

        match self.steps.advance(data, &self.options) {
            Advance::Running => Ok(Progress::Running),
            Advance::GaveUp(failure) => {
                let (poll, finished) = give_up(failure, &self.options);
                self.finished = finished;
                poll
            }
            Advance::Exhausted => {
                if self.options.repeat_until_no_more_steps {
                    let steps = (self.builder)(data);
                    if !steps.is_empty() {
                        self.steps.replace(steps);
                        return Ok(Progress::Running);
                    }
                }
                self.finished = true;
                Ok(Progress::Completed)
            }
        }
    }

    fn skip(&mut self) {
        self.finished = true;
    }

    fn priority(&self) -> ActionPriority {
        self.options.priority
    }
}
