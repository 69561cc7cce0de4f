//! World-state snapshot consumed by the bot engine.
//!
//! An external reader produces a fresh [`Data`] between driver ticks; nothing
//! in the engine mutates it. The types here are the boundary between the game
//! client and everything that decides what to do next:
//!
//! - [`Position`] and [`AreaId`] locate things in the world
//! - [`Grid`] classifies every tile of the current area for pathfinding
//! - [`Data`] bundles player, monsters, objects, menus and the area grid
pub mod data;
pub mod error;
pub mod grid;
pub mod position;

pub use data::{Data, Monster, Object, OpenMenus, PlayerUnit};
pub use error::GridError;
pub use grid::{CollisionType, Grid};
pub use position::{AreaId, Position};
