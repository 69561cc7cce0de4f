//! Resumable action engine for polling bots.
//!
//! Bot behaviour is expressed as [`Action`] values that a driver polls once
//! per tick against the latest world-state snapshot. Each poll advances the
//! action by at most one [`Step`] increment, so long waits are many short
//! polls and nothing inside an action blocks.
//!
//! # Architecture
//!
//! - [`Step`]: externally implemented unit of work (status, run, reset)
//! - [`Action`]: core trait for every combinator
//! - [`Poll`]: tagged outcome, see [`outcome`] for the table
//! - Composition: [`Chain`], [`Factory`]
//! - Step drivers: [`StaticAction`], [`DynamicAction`], [`StepChainAction`]
//! - [`ActionOptions`]: retry ceiling and failure disposition per action
//!
//! The engine is generic over the snapshot type `D` and never logs above
//! `debug`; deciding what a failure means is left to the caller.

pub mod action;
pub mod builder;
pub mod chain;
pub mod dynamic_action;
pub mod factory;
pub mod options;
pub mod outcome;
pub mod static_action;
pub mod step;
pub mod step_chain;
mod step_list;

pub use action::{Action, ActionPriority};
pub use chain::{BoxedAction, Chain};
pub use dynamic_action::DynamicAction;
pub use factory::Factory;
pub use options::{ActionOptions, MAX_RETRIES};
pub use outcome::{ActionError, Poll, Progress, StepFailure};
pub use static_action::StaticAction;
pub use step::{Step, StepState, StepStatus};
pub use step_chain::StepChainAction;
pub use step_list::BoxedStep;
