//! Step list built once on first poll.

use crate::{
    Action, ActionOptions, ActionPriority, Poll, Progress,
    step_list::{Advance, BoxedStep, StepList, give_up},
};

/// Runs a fixed list of steps built from the first snapshot it sees.
pub struct StaticAction<D, F> {
    name: String,
    builder: Option<F>,
    steps: StepList<D>,
    options: ActionOptions,
    finished: bool,
}

impl<D, F> StaticAction<D, F>
where
    F: FnOnce(&D) -> Vec<BoxedStep<D>> + Send,
{
    pub fn new(name: impl Into<String>, builder: F) -> Self {
        Self {
            name: name.into(),
            builder: Some(builder),
            steps: StepList::default(),
            options: ActionOptions::default(),
            finished: false,
        }
    }

    pub fn with_options(mut self, options: ActionOptions) -> Self {
        self.options = options;
        self
    }

    /// Failed step runs counted so far.
    pub fn retries(&self) -> u32 {
        self.steps.retries()
    }
}

impl<D, F> Action<D> for StaticAction<D, F>
where
    F: FnOnce(&D) -> Vec<BoxedStep<D>> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn next_step(&mut self, data: &D) -> Poll {
        if self.finished {
            return Ok(Progress::Completed);
        }

        if let Some(build) = self.builder.take() {
            self.steps.replace(build(data));
        }

        match self.steps.advance(data, &self.options) {
            Advance::Running => Ok(Progress::Running),
            Advance::Exhausted => {
                self.finished = true;
                Ok(Progress::Completed)
            }
            Advance::GaveUp(failure) => {
                let (poll, finished) = give_up(failure, &self.options);
                self.finished = finished;
                poll
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
