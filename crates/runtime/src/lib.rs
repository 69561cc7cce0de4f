//! Runtime for polling bots.
//!
//! Each bot is a set of cooperating routines that share one [`Context`] and
//! coordinate through its execution [`Priority`]. Routines find their context
//! through the [`ContextRegistry`] using the [`TaskId`] in scope, so steps deep
//! inside an action can call [`current_context`] without threading a handle.
//!
//! Modules are organized by responsibility:
//! - [`context`] hosts contexts, task identity and the registry
//! - [`bot`] drives runs and priority hooks
//! - [`events`] broadcasts run lifecycle events
//! - [`input`] declares the traits the embedding application implements
pub mod bot;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod input;
pub mod priority;

pub use bot::{Bot, BotHandle, PriorityHook, Run, RunningBot};
pub use config::{BotConfig, PauseConfig};
pub use context::{
    Context, ContextRegistry, DebugMarkers, Status, TaskId, attach, create_context,
    current_context, detach,
};
pub use error::{Result, RuntimeError};
pub use events::{BotEvent, EventBus};
pub use input::{GameReader, InputDispatch};
pub use priority::Priority;
