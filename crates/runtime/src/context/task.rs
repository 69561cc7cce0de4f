//! Task identity.
//!
//! Each bot routine runs inside a [`TaskId::scope`]; context lookups inside
//! that routine resolve against the scoped id without passing it around.

use std::{
    fmt,
    future::Future,
    sync::atomic::{AtomicU64, Ordering},
};

use crate::error::{Result, RuntimeError};

tokio::task_local! {
    static CURRENT_TASK: TaskId;
}

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one routine, used as the context registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

impl TaskId {
    /// Allocates a process-unique id.
    pub fn next() -> Self {
        Self(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Id of the enclosing scope.
    pub fn current() -> Result<Self> {
        CURRENT_TASK
            .try_with(|task| *task)
            .map_err(|_| RuntimeError::NoTaskIdentity)
    }

    /// Runs `future` with `self` as the current task id.
    pub async fn scope<F: Future>(self, future: F) -> F::Output {
        CURRENT_TASK.scope(self, future).await
    }

    /// Synchronous variant of [`TaskId::scope`].
    pub fn sync_scope<R>(self, f: impl FnOnce() -> R) -> R {
        CURRENT_TASK.sync_scope(self, f)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}
