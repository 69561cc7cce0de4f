//! Broadcast bus for bot lifecycle events.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BotEvent {
    RunStarted {
        bot: String,
        run: String,
    },
    RunFinished {
        bot: String,
        run: String,
        elapsed_ms: u64,
    },
    /// A skippable action exhausted its retries and was dropped.
    ActionSkipped {
        bot: String,
        run: String,
        action: String,
        reason: String,
    },
    RunFailed {
        bot: String,
        run: String,
        reason: String,
    },
}

/// Cloneable publisher; every clone feeds the same subscribers.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<BotEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes best-effort; events without subscribers are dropped.
    pub fn publish(&self, event: BotEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("no subscribers for bot event");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BotEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
