//! Per-routine execution contexts.
//!
//! A [`Context`] bundles everything a step needs to act: the latest world
//! snapshot, the input handle, the path finder and debug markers. Routines
//! reach their context through the [`ContextRegistry`] using the task id in
//! scope, and receive it as a [`Status`] carrying the priority the routine
//! was attached with.
mod registry;
mod task;

pub use registry::{ContextRegistry, attach, create_context, current_context, detach};
pub use task::TaskId;

use std::{
    ops::Deref,
    sync::{
        Arc, Mutex, PoisonError, RwLock,
        atomic::{AtomicU8, Ordering},
    },
};

use game_data::Data;
use pather::PathFinder;

use crate::{
    config::PauseConfig,
    error::{Result, RuntimeError},
    input::{GameReader, InputDispatch},
    priority::Priority,
};

/// Names of the last action and step a routine started.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebugMarkers {
    pub last_action: String,
    pub last_step: String,
}

pub struct Context {
    name: String,
    data: RwLock<Data>,
    execution_priority: AtomicU8,
    paused_from: AtomicU8,
    debug: Mutex<DebugMarkers>,
    span: tracing::Span,
    input: Option<Arc<dyn InputDispatch>>,
    path_finder: PathFinder,
    pause: PauseConfig,
}

impl Context {
    /// New context with an empty snapshot, executing at `Normal`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let span = tracing::info_span!("bot", name = %name);
        Self {
            name,
            data: RwLock::new(Data::default()),
            execution_priority: AtomicU8::new(Priority::Normal.as_u8()),
            paused_from: AtomicU8::new(Priority::Normal.as_u8()),
            debug: Mutex::new(DebugMarkers::default()),
            span,
            input: None,
            path_finder: PathFinder::new(),
            pause: PauseConfig::default(),
        }
    }

    pub fn with_input(mut self, input: Arc<dyn InputDispatch>) -> Self {
        self.input = Some(input);
        self
    }

    pub fn with_pause_config(mut self, pause: PauseConfig) -> Self {
        self.pause = pause;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Copy of the current snapshot.
    pub fn data(&self) -> Data {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Reads the snapshot in place.
    pub fn read_data<R>(&self, f: impl FnOnce(&Data) -> R) -> R {
        f(&self.data.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replaces the snapshot with a fresh read.
    pub fn refresh_data(&self, reader: &dyn GameReader) {
        let data = reader.get_data();
        *self.data.write().unwrap_or_else(PoisonError::into_inner) = data;
    }

    pub fn set_data(&self, data: Data) {
        *self.data.write().unwrap_or_else(PoisonError::into_inner) = data;
    }

    /// Changes the priority routines of this context are allowed to run at
    /// and returns the previous one. `Stop` is final.
    pub fn switch_priority(&self, priority: Priority) -> Priority {
        let previous = self
            .execution_priority
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                (current != Priority::Stop.as_u8()).then_some(priority.as_u8())
            })
            .unwrap_or_else(|current| current);
        let previous = Priority::from_repr(previous).unwrap_or(Priority::Stop);
        if previous != priority && !previous.is_stop() {
            tracing::debug!(parent: &self.span, from = %previous, to = %priority, "execution priority switched");
        }
        previous
    }

    /// Switches to `to` only while the execution priority is still `from`.
    pub fn switch_priority_if(&self, from: Priority, to: Priority) -> bool {
        if from.is_stop() {
            return false;
        }
        let switched = self
            .execution_priority
            .compare_exchange(from.as_u8(), to.as_u8(), Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();
        if switched && from != to {
            tracing::debug!(parent: &self.span, %from, %to, "execution priority switched");
        }
        switched
    }

    /// Pauses every routine of this context, remembering what was running.
    pub fn pause(&self) {
        let previous = self.switch_priority(Priority::Pause);
        if previous != Priority::Pause && !previous.is_stop() {
            self.paused_from.store(previous.as_u8(), Ordering::SeqCst);
        }
    }

    /// Undoes [`Context::pause`]. Returns `false` if the context was not paused.
    pub fn resume(&self) -> bool {
        let resume_to = Priority::from_repr(self.paused_from.load(Ordering::SeqCst))
            .unwrap_or(Priority::Normal);
        self.switch_priority_if(Priority::Pause, resume_to)
    }

    pub fn execution_priority(&self) -> Priority {
        Priority::from_repr(self.execution_priority.load(Ordering::SeqCst)).unwrap_or(Priority::Stop)
    }

    pub fn set_last_action(&self, action: &str) {
        let mut debug = self.debug.lock().unwrap_or_else(PoisonError::into_inner);
        debug.last_action.clear();
        debug.last_action.push_str(action);
    }

    pub fn set_last_step(&self, step: &str) {
        let mut debug = self.debug.lock().unwrap_or_else(PoisonError::into_inner);
        debug.last_step.clear();
        debug.last_step.push_str(step);
    }

    pub fn debug(&self) -> DebugMarkers {
        self.debug
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn input(&self) -> Option<&Arc<dyn InputDispatch>> {
        self.input.as_ref()
    }

    pub fn path_finder(&self) -> &PathFinder {
        &self.path_finder
    }

    pub fn pause_config(&self) -> PauseConfig {
        self.pause
    }

    pub fn span(&self) -> &tracing::Span {
        &self.span
    }
}

/// A context as seen by one routine: the shared [`Context`] plus the
/// priority that routine was attached with.
#[derive(Clone)]
pub struct Status {
    context: Arc<Context>,
    priority: Priority,
}

impl Status {
    pub fn new(context: Arc<Context>, priority: Priority) -> Self {
        Self { context, priority }
    }

    /// Priority this routine was attached with.
    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn context(&self) -> &Arc<Context> {
        &self.context
    }

    /// Waits until the context's execution priority matches this routine's.
    ///
    /// While the loading screen is shown, sleeps briefly first. Returns
    /// [`RuntimeError::Cancelled`] as soon as either priority is `Stop`;
    /// callers propagate it with `?` and do no further work.
    pub async fn pause_if_not_priority(&self) -> Result<()> {
        let pause = self.context.pause;

        if self.context.read_data(Data::is_loading) {
            tokio::time::sleep(pause.loading_screen_delay).await;
        }

        loop {
            let execution = self.context.execution_priority();
            if self.priority.is_stop() || execution.is_stop() {
                return Err(RuntimeError::Cancelled);
            }
            if execution == self.priority {
                return Ok(());
            }
            tokio::time::sleep(pause.poll_interval).await;
        }
    }
}

impl Deref for Status {
    type Target = Context;

    fn deref(&self) -> &Context {
        &self.context
    }
}
