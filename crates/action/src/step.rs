//! The smallest unit of work driven by an action.
//!
//! Steps are implemented outside this crate (press a key, move toward a tile,
//! interact with an object). The engine treats them opaquely through the
//! [`Step`] trait and never looks past its three operations.

use std::time::Instant;

/// Progress of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StepStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl StepStatus {
    #[inline]
    pub fn is_completed(self) -> bool {
        matches!(self, StepStatus::Completed)
    }
}

/// A unit of work that an action advances one increment at a time.
///
/// # Contract
///
/// - [`Step::status`] has no side effects.
/// - [`Step::run`] performs one bounded increment of work. The engine never
///   calls it on a completed step, but implementations must tolerate it.
/// - [`Step::reset`] clears progress so the step can be retried from scratch.
pub trait Step<D>: Send {
    /// Static name used to identify the step in diagnostics.
    fn name(&self) -> &'static str;

    fn status(&self, data: &D) -> StepStatus;

    fn run(&mut self, data: &D) -> anyhow::Result<()>;

    fn reset(&mut self);
}

impl<D> Step<D> for Box<dyn Step<D>> {
    #[inline]
    fn name(&self) -> &'static str {
        (**self).name()
    }

    #[inline]
    fn status(&self, data: &D) -> StepStatus {
        (**self).status(data)
    }

    #[inline]
    fn run(&mut self, data: &D) -> anyhow::Result<()> {
        (**self).run(data)
    }

    #[inline]
    fn reset(&mut self) {
        (**self).reset()
    }
}

/// Bookkeeping shared by most step implementations.
///
/// Status transitions are guarded: `Completed` is sticky and `InProgress` can
/// only move forward to `Completed`. Only [`StepState::reset`] goes back.
#[derive(Debug, Clone, Default)]
pub struct StepState {
    status: StepStatus,
    last_run: Option<Instant>,
}

impl StepState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> StepStatus {
        self.status
    }

    /// Attempts to move to `to` and returns the resulting status.
    pub fn try_transition(&mut self, to: StepStatus) -> StepStatus {
        match (self.status, to) {
            (StepStatus::Completed, _) => StepStatus::Completed,
            (StepStatus::InProgress, StepStatus::NotStarted) => StepStatus::InProgress,
            _ => {
                self.status = to;
                to
            }
        }
    }

    /// Records that the step issued work now.
    pub fn mark_run(&mut self) {
        self.last_run = Some(Instant::now());
    }

    pub fn last_run(&self) -> Option<Instant> {
        self.last_run
    }

    pub fn reset(&mut self) {
        self.status = StepStatus::NotStarted;
        self.last_run = None;
    }
}
