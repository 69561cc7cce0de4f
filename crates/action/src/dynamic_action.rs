//! Step list rebuilt every time it runs out.

use crate::{
    Action, ActionOptions, ActionPriority, Poll, Progress,
    step_list::{Advance, BoxedStep, StepList, give_up},
};

/// Runs steps from `builder`, asking for a fresh list whenever the current
/// one is exhausted. Finishes once the builder returns no steps.
pub struct DynamicAction<D, F> {
    name: String,
    builder: F,
    steps: StepList<D>,
    options: ActionOptions,
    built: bool,
    finished: bool,
}

impl<D, F> DynamicAction<D, F>
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

    /// Replaces the step list. Returns `false` when the builder is out of steps.
    fn rebuild(&mut self, data: &D) -> bool {
        let steps = (self.builder)(data);
        if steps.is_empty() {
            self.finished = true;
            return false;
        }
        tracing::trace!(action = %self.name, steps = steps.len(), "steps rebuilt");
        self.steps.replace(steps);
        true
    }
}

impl<D, F> Action<D> for DynamicAction<D, F>
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
            if !self.rebuild(data) {
                return Ok(Progress::Completed);
            }
        }

        match self.steps.advance(data, &self.options) {
            Advance::Running => Ok(Progress::Running),
            Advance::Exhausted => {
                if self.rebuild(data) {
                    Ok(Progress::Running)
                } else {
                    Ok(Progress::Completed)
                }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step_list::test_steps::{Counted, Failing};

    #[test]
    fn rebuilds_until_builder_is_empty() {
        let mut rounds = 0;
        let mut action = DynamicAction::new("kill", move |_: &()| {
            rounds += 1;
            if rounds > 2 {
                return Vec::new();
            }
            vec![Box::new(Counted::new("Attack", 1).0) as BoxedStep<()>]
        });

        // round 1: run, exhausted => rebuild round 2
        assert!(matches!(action.next_step(&()), Ok(Progress::Running)));
        assert!(matches!(action.next_step(&()), Ok(Progress::Running)));
        // round 2: run, exhausted => builder empty
        assert!(matches!(action.next_step(&()), Ok(Progress::Running)));
        assert!(matches!(action.next_step(&()), Ok(Progress::Completed)));
        assert!(matches!(action.next_step(&()), Ok(Progress::Completed)));
    }

    #[test]
    fn ignored_errors_finish_with_continue() {
        let mut attempt = 0;
        let mut action = DynamicAction::new("flaky", move |_: &()| {
            attempt += 1;
            match attempt {
                1 => vec![Box::new(Failing("Flaky")) as BoxedStep<()>],
                _ => Vec::new(),
            }
        })
        .with_options(ActionOptions::new().ignore_errors().max_retries(3));

        assert!(matches!(action.next_step(&()), Ok(Progress::Running)));
        assert_eq!(action.retries(), 1);
        assert!(matches!(action.next_step(&()), Ok(Progress::Running)));
        assert!(matches!(action.next_step(&()), Ok(Progress::Continue(_))));
        assert!(matches!(action.next_step(&()), Ok(Progress::Completed)));
    }
}
