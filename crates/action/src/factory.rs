//! Reactive single-child action.

use crate::{Action, ActionOptions, ActionPriority, Poll, Progress, chain::BoxedAction};

/// Holds at most one child built from the latest snapshot.
///
/// A completed child is dropped and the factory reports
/// [`Progress::Running`], so the next poll builds a fresh child against the
/// world as it is then. The factory itself finishes only when the builder
/// returns `None`. Of its [`ActionOptions`] only the priority applies; the
/// child carries its own failure policy.
pub struct Factory<D, F> {
    name: String,
    builder: F,
    child: Option<BoxedAction<D>>,
    options: ActionOptions,
    finished: bool,
}

impl<D, F> Factory<D, F>
where
    F: FnMut(&D) -> Option<BoxedAction<D>> + Send,
{
    pub fn new(name: impl Into<String>, builder: F) -> Self {
        Self {
            name: name.into(),
            builder,
            child: None,
            options: ActionOptions::default(),
            finished: false,
        }
    }

    pub fn with_options(mut self, options: ActionOptions) -> Self {
        self.options = options;
        self
    }
}

impl<D, F> Action<D> for Factory<D, F>
where
    F: FnMut(&D) -> Option<BoxedAction<D>> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn next_step(&mut self, data: &D) -> Poll {
        if self.finished {
            return Ok(Progress::Completed);
        }

        let mut child = match self.child.take() {
            Some(child) => child,
            None => match (self.builder)(data) {
                Some(child) => child,
                None => {
                    self.finished = true;
                    return Ok(Progress::Completed);
                }
            },
        };

        match child.next_step(data) {
            Ok(Progress::Completed) => Ok(Progress::Running),
            other => {
                self.child = Some(child);
                other
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
    use crate::{
        StaticAction,
        step_list::{BoxedStep, test_steps::Counted},
    };

    #[test]
    fn completed_child_is_replaced() {
        let mut builds = 0;
        let mut factory = Factory::new("follow", move |_: &()| {
            builds += 1;
            (builds <= 2).then(|| {
                Box::new(StaticAction::new("step", |_: &()| {
                    vec![Box::new(Counted::new("Move", 1).0) as BoxedStep<()>]
                })) as BoxedAction<()>
            })
        });

        // child 1 runs, then completes
        assert!(matches!(factory.next_step(&()), Ok(Progress::Running)));
        assert!(matches!(factory.next_step(&()), Ok(Progress::Running)));
        // child 2
        assert!(matches!(factory.next_step(&()), Ok(Progress::Running)));
        assert!(matches!(factory.next_step(&()), Ok(Progress::Running)));
        // builder exhausted
        assert!(matches!(factory.next_step(&()), Ok(Progress::Completed)));
        assert!(matches!(factory.next_step(&()), Ok(Progress::Completed)));
    }

    #[test]
    fn priority_comes_from_options() {
        let factory = Factory::new("escape", |_: &()| None::<BoxedAction<()>>);
        assert_eq!(factory.priority(), ActionPriority::Normal);

        let factory = factory.with_options(ActionOptions::new().priority(ActionPriority::High));
        assert_eq!(factory.priority(), ActionPriority::High);
    }
}
