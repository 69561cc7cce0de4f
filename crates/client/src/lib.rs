//! Bot binary support: a simulated game, demo steps and runs, and logging.
//!
//! # Architecture
//!
//! ```text
//! bot (binary)
//!   ├─→ SimulatedGame (GameReader + InputDispatch)
//!   ├─→ Bot (runtime: refresher, hooks, main loop)
//!   │     └─→ demo runs (action combinators over MoveTo / PressKey / WaitFor)
//!   └─→ event printer (BotEvent as JSON lines)
//! ```
pub mod logging;
pub mod runs;
pub mod sim;
pub mod steps;

pub use runs::{POTION_THRESHOLD, PotionHook, demo_runs};
pub use sim::SimulatedGame;
