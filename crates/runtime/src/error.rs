//! Error types surfaced by the runtime API.
use thiserror::Error;

use action::ActionError;

use crate::context::TaskId;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("no task identity in scope; run inside TaskId::scope")]
    NoTaskIdentity,

    #[error("no context registered for {task}")]
    ContextNotFound { task: TaskId },

    #[error("context registry lock poisoned")]
    LockPoisoned,

    /// The task was told to stop. Propagate it without further work.
    #[error("bot is stopped")]
    Cancelled,

    #[error("max game length reached after {elapsed_secs}s")]
    MaxGameLength { elapsed_secs: u64 },

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error("bot routine join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

impl RuntimeError {
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RuntimeError::Cancelled)
    }
}
