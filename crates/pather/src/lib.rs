//! Pathfinding for the bot engine.
//!
//! - [`astar`] runs A* over a grid in grid-relative coordinates
//! - [`PathFinder`] answers world-coordinate queries against a [`game_data::Data`]
//!   snapshot, overlaying monsters and objects on a copy of the area grid
//!
//! Neither keeps state between calls, so concurrent searches never interfere.
pub mod astar;
pub mod path_finder;

pub use astar::{DIRECTION_CHANGE_PENALTY, Path, calculate_path, tile_cost};
pub use path_finder::PathFinder;
