//! Process-wide map from task id to context.
//!
//! The map lock is held only for the insert, lookup or removal itself,
//! never while a routine polls an action or waits on its priority.

use std::{
    collections::HashMap,
    sync::{Arc, LazyLock, Mutex, MutexGuard},
};

use super::{Context, Status, TaskId};
use crate::{
    error::{Result, RuntimeError},
    priority::Priority,
};

static GLOBAL: LazyLock<Arc<ContextRegistry>> = LazyLock::new(|| Arc::new(ContextRegistry::new()));

#[derive(Default)]
pub struct ContextRegistry {
    contexts: Mutex<HashMap<TaskId, Status>>,
}

impl ContextRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry shared by the whole process.
    pub fn global() -> Arc<ContextRegistry> {
        Arc::clone(&GLOBAL)
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<TaskId, Status>>> {
        self.contexts.lock().map_err(|_| RuntimeError::LockPoisoned)
    }

    /// Creates a context and registers it for the current task at `Normal`.
    pub fn create_context(&self, name: impl Into<String>) -> Result<Status> {
        self.attach(Arc::new(Context::new(name)), Priority::Normal)
    }

    /// Registers `context` for the current task.
    pub fn attach(&self, context: Arc<Context>, priority: Priority) -> Result<Status> {
        self.register(TaskId::current()?, context, priority)
    }

    /// Registers `context` for an explicit task, replacing any previous entry.
    pub fn register(&self, task: TaskId, context: Arc<Context>, priority: Priority) -> Result<Status> {
        let status = Status::new(context, priority);
        self.lock()?.insert(task, status.clone());
        tracing::trace!(%task, bot = status.name(), %priority, "context attached");
        Ok(status)
    }

    /// Context registered for the current task.
    pub fn current(&self) -> Result<Status> {
        self.get(TaskId::current()?)
    }

    pub fn get(&self, task: TaskId) -> Result<Status> {
        self.lock()?
            .get(&task)
            .cloned()
            .ok_or(RuntimeError::ContextNotFound { task })
    }

    /// Removes the registration of the current task.
    pub fn detach(&self) -> Result<()> {
        self.detach_task(TaskId::current()?);
        Ok(())
    }

    /// Removes the registration of `task`, if any. Runs during teardown, so a
    /// poisoned map is recovered rather than reported.
    pub fn detach_task(&self, task: TaskId) {
        let removed = self
            .contexts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(&task);
        if removed.is_some() {
            tracing::trace!(%task, "context detached");
        }
    }

    pub fn len(&self) -> usize {
        self.lock().map(|contexts| contexts.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// [`ContextRegistry::create_context`] on the global registry.
pub fn create_context(name: impl Into<String>) -> Result<Status> {
    GLOBAL.create_context(name)
}

/// [`ContextRegistry::current`] on the global registry.
pub fn current_context() -> Result<Status> {
    GLOBAL.current()
}

/// [`ContextRegistry::attach`] on the global registry.
pub fn attach(context: Arc<Context>, priority: Priority) -> Result<Status> {
    GLOBAL.attach(context, priority)
}

/// [`ContextRegistry::detach`] on the global registry.
pub fn detach() -> Result<()> {
    GLOBAL.detach()
}
