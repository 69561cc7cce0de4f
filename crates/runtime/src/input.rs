//! Boundary traits implemented by the embedding application.

use game_data::{Data, Position};

/// Produces fresh world-state snapshots.
pub trait GameReader: Send + Sync {
    fn get_data(&self) -> Data;
}

/// Emits simulated input. Steps reach it through their context; the engine
/// itself never calls it.
pub trait InputDispatch: Send + Sync {
    fn press_key(&self, key: &str) -> anyhow::Result<()>;

    /// Clicks the world tile at `at`.
    fn click(&self, at: Position) -> anyhow::Result<()>;
}
