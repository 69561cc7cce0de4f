//! Step-list driver shared by the step-driving actions.

use crate::{ActionError, ActionOptions, Poll, Progress, Step, StepFailure};

/// Boxed step as stored by the step-driving actions.
pub type BoxedStep<D> = Box<dyn Step<D>>;

/// Result of advancing a step list by one increment.
pub(crate) enum Advance {
    /// A step ran (successfully, or failing below the retry ceiling).
    Running,
    /// Every step reports completed.
    Exhausted,
    /// The retry ceiling was reached on the named step.
    GaveUp(StepFailure),
}

pub(crate) struct StepList<D> {
    steps: Vec<BoxedStep<D>>,
    retries: u32,
}

impl<D> Default for StepList<D> {
    fn default() -> Self {
        Self {
            steps: Vec::new(),
            retries: 0,
        }
    }
}

impl<D> StepList<D> {
    /// Installs a freshly built list. The retry counter starts over.
    pub(crate) fn replace(&mut self, steps: Vec<BoxedStep<D>>) {
        self.steps = steps;
        self.retries = 0;
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub(crate) fn retries(&self) -> u32 {
        self.retries
    }

    /// Runs the first step that is not completed.
    pub(crate) fn advance(&mut self, data: &D, options: &ActionOptions) -> Advance {
        let Some(step) = self
            .steps
            .iter_mut()
            .find(|step| !step.status(data).is_completed())
        else {
            return Advance::Exhausted;
        };

        let name = step.name();
        let Err(source) = step.run(data) else {
            tracing::trace!(step = name, "step executed");
            return Advance::Running;
        };

        self.retries += 1;
        tracing::debug!(step = name, retries = self.retries, error = %source, "step failed");

        if options.reset_steps_on_error {
            self.steps.iter_mut().for_each(|step| step.reset());
        }

        if self.retries >= options.max_retries {
            Advance::GaveUp(StepFailure::new(name, source))
        } else {
            Advance::Running
        }
    }
}

/// Resolves a give-up according to the action's disposition.
///
/// Returns the poll outcome and whether the action is now permanently
/// finished (only the ignore-errors disposition finishes the action).
pub(crate) fn give_up(failure: StepFailure, options: &ActionOptions) -> (Poll, bool) {
    if options.ignore_errors {
        (Ok(Progress::Continue(failure)), true)
    } else if options.can_be_skipped {
        (Err(ActionError::Skippable(failure)), false)
    } else {
        (Err(ActionError::NoRecover(failure)), false)
    }
}

#[cfg(test)]
pub(crate) mod test_steps {
    //! Scripted steps shared by the unit tests of this crate.

    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use crate::{Step, StepStatus};

    /// Completes after `runs_needed` successful runs; counts every run.
    pub struct Counted {
        pub name: &'static str,
        pub runs_needed: usize,
        pub runs: Arc<AtomicUsize>,
        done: usize,
    }

    impl Counted {
        pub fn new(name: &'static str, runs_needed: usize) -> (Self, Arc<AtomicUsize>) {
            let runs = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    name,
                    runs_needed,
                    runs: runs.clone(),
                    done: 0,
                },
                runs,
            )
        }
    }

    impl<D> Step<D> for Counted {
        fn name(&self) -> &'static str {
            self.name
        }

        fn status(&self, _: &D) -> StepStatus {
            if self.done >= self.runs_needed {
                StepStatus::Completed
            } else if self.done > 0 {
                StepStatus::InProgress
            } else {
                StepStatus::NotStarted
            }
        }

        fn run(&mut self, _: &D) -> anyhow::Result<()> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            self.done += 1;
            Ok(())
        }

        fn reset(&mut self) {
            self.done = 0;
        }
    }

    /// Always fails.
    pub struct Failing(pub &'static str);

    impl<D> Step<D> for Failing {
        fn name(&self) -> &'static str {
            self.0
        }

        fn status(&self, _: &D) -> StepStatus {
            StepStatus::InProgress
        }

        fn run(&mut self, _: &D) -> anyhow::Result<()> {
            anyhow::bail!("{} failed", self.0)
        }

        fn reset(&mut self) {}
    }
}
