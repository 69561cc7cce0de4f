//! Shorthands for building boxed actions.
//!
//! Instead of `Box::new(Chain::new(name, builder))` run scripts can write
//! `chain(name, options, builder)` and mix the results in one `Vec<BoxedAction<D>>`.

use crate::{
    ActionOptions, BoxedAction, BoxedStep, Chain, DynamicAction, Factory, StaticAction,
    StepChainAction,
};

/// Creates a chain node.
///
/// Shorthand for `Box::new(Chain::new(name, builder).with_options(options))`.
#[inline]
pub fn chain<D: 'static>(
    name: &str,
    options: ActionOptions,
    builder: impl FnMut(&D) -> Vec<BoxedAction<D>> + Send + 'static,
) -> BoxedAction<D> {
    Box::new(Chain::new(name, builder).with_options(options))
}

/// Creates a factory node.
#[inline]
pub fn factory<D: 'static>(
    name: &str,
    options: ActionOptions,
    builder: impl FnMut(&D) -> Option<BoxedAction<D>> + Send + 'static,
) -> BoxedAction<D> {
    Box::new(Factory::new(name, builder).with_options(options))
}

/// Creates a static step action.
#[inline]
pub fn static_action<D: 'static>(
    name: &str,
    options: ActionOptions,
    builder: impl FnOnce(&D) -> Vec<BoxedStep<D>> + Send + 'static,
) -> BoxedAction<D> {
    Box::new(StaticAction::new(name, builder).with_options(options))
}

/// Creates a dynamic step action.
#[inline]
pub fn dynamic_action<D: 'static>(
    name: &str,
    options: ActionOptions,
    builder: impl FnMut(&D) -> Vec<BoxedStep<D>> + Send + 'static,
) -> BoxedAction<D> {
    Box::new(DynamicAction::new(name, builder).with_options(options))
}

/// Creates a step chain.
#[inline]
pub fn step_chain<D: 'static>(
    name: &str,
    options: ActionOptions,
    builder: impl FnMut(&D) -> Vec<BoxedStep<D>> + Send + 'static,
) -> BoxedAction<D> {
    Box::new(StepChainAction::new(name, builder).with_options(options))
}
