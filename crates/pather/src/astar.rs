//! A* search over a collision [`Grid`].
//!
//! Movement is 8-connected. Each step pays the cost of the tile it enters
//! ([`tile_cost`]) plus [`DIRECTION_CHANGE_PENALTY`] whenever the direction of
//! travel differs from the direction used to reach the current tile, which
//! keeps paths from zig-zagging around obstacles.
//!
//! The heuristic is Manhattan distance. With diagonal moves costing 1 it
//! overestimates, so a returned path is not guaranteed to be the cheapest one;
//! the search expands far fewer nodes in exchange.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use arrayvec::ArrayVec;
use game_data::{CollisionType, Grid, Position};

/// Extra cost for changing direction between two consecutive moves.
pub const DIRECTION_CHANGE_PENALTY: u32 = 2;

/// Cost of entering a walkable tile.
pub const WALKABLE_COST: u32 = 1;

/// Cost of entering a tile occupied by a monster or marked low priority.
pub const SOFT_BLOCKER_COST: u32 = 100;

const DIRECTIONS: [Position; 8] = [
    Position::new(0, 1),   // down
    Position::new(1, 0),   // right
    Position::new(0, -1),  // up
    Position::new(-1, 0),  // left
    Position::new(1, 1),   // down-right
    Position::new(-1, 1),  // down-left
    Position::new(1, -1),  // up-right
    Position::new(-1, -1), // up-left
];

/// Result of a successful search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    /// Tiles from start to goal, both included.
    pub tiles: Vec<Position>,
    /// Accumulated traversal cost, penalties included.
    pub cost: u32,
}

impl Path {
    /// Number of moves (tiles minus the starting one).
    pub fn moves(&self) -> usize {
        self.tiles.len().saturating_sub(1)
    }

    pub fn start(&self) -> Option<Position> {
        self.tiles.first().copied()
    }

    pub fn goal(&self) -> Option<Position> {
        self.tiles.last().copied()
    }
}

/// Cost of entering a tile, or `None` when it cannot be entered at all.
pub fn tile_cost(tile: CollisionType) -> Option<u32> {
    match tile {
        CollisionType::Walkable => Some(WALKABLE_COST),
        CollisionType::Monster | CollisionType::LowPriority => Some(SOFT_BLOCKER_COST),
        CollisionType::Blocked => None,
    }
}

fn heuristic(a: Position, b: Position) -> u32 {
    a.manhattan(b)
}

/// Open-set entry. Ordered so that [`BinaryHeap`] pops the lowest priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Node {
    position: Position,
    index: usize,
    cost: u32,
    priority: u32,
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.cost.cmp(&self.cost))
            .then_with(|| other.position.cmp(&self.position))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Finds a path between two grid-relative tiles.
///
/// Returns `None` when either endpoint is outside the grid, the goal is
/// blocked, or the open set is exhausted without reaching the goal.
pub fn calculate_path(grid: &Grid, start: Position, goal: Position) -> Option<Path> {
    let start_index = grid.index(start)?;
    let goal_index = grid.index(goal)?;
    if !grid.tile(goal)?.is_walkable() {
        return None;
    }

    let len = grid.width() * grid.height();
    let mut cost_so_far = vec![u32::MAX; len];
    let mut came_from: Vec<Option<usize>> = vec![None; len];
    let mut direction_into: Vec<Option<Position>> = vec![None; len];

    let mut open = BinaryHeap::new();
    cost_so_far[start_index] = 0;
    open.push(Node {
        position: start,
        index: start_index,
        cost: 0,
        priority: heuristic(start, goal),
    });

    let mut explored = 0usize;
    while let Some(current) = open.pop() {
        // Stale entry superseded by a cheaper push.
        if current.cost > cost_so_far[current.index] {
            continue;
        }
        explored += 1;

        if current.index == goal_index {
            tracing::trace!(explored, cost = current.cost, "path found");
            return Some(Path {
                tiles: reconstruct_path(grid, &came_from, start_index, goal_index),
                cost: current.cost,
            });
        }

        for (neighbor, direction, step_cost) in neighbors(grid, current.position) {
            let Some(index) = grid.index(neighbor) else {
                continue;
            };

            let penalty = match direction_into[current.index] {
                Some(previous) if previous != direction => DIRECTION_CHANGE_PENALTY,
                _ => 0,
            };
            let new_cost = current.cost + step_cost + penalty;

            if new_cost < cost_so_far[index] {
                cost_so_far[index] = new_cost;
                came_from[index] = Some(current.index);
                direction_into[index] = Some(direction);
                open.push(Node {
                    position: neighbor,
                    index,
                    cost: new_cost,
                    priority: new_cost + heuristic(neighbor, goal),
                });
            }
        }
    }

    tracing::trace!(explored, "goal unreachable");
    None
}

/// Enterable neighbors of `position` with the move direction and tile cost.
fn neighbors(grid: &Grid, position: Position) -> ArrayVec<(Position, Position, u32), 8> {
    let mut out = ArrayVec::new();
    for direction in DIRECTIONS {
        let neighbor = Position::new(position.x + direction.x, position.y + direction.y);
        if let Some(cost) = grid.tile(neighbor).and_then(tile_cost) {
            out.push((neighbor, direction, cost));
        }
    }
    out
}

fn reconstruct_path(
    grid: &Grid,
    came_from: &[Option<usize>],
    start: usize,
    goal: usize,
) -> Vec<Position> {
    let mut tiles = vec![grid.position(goal)];
    let mut current = goal;
    while current != start {
        match came_from[current] {
            Some(previous) => {
                tiles.push(grid.position(previous));
                current = previous;
            }
            None => break,
        }
    }
    tiles.reverse();
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use CollisionType::{Blocked as B, Walkable as W};

    fn open_grid(width: usize, height: usize) -> Grid {
        Grid::walkable(width, height, Position::ORIGIN)
    }

    #[test]
    fn diagonal_on_open_grid() {
        let grid = open_grid(5, 5);
        let path = calculate_path(&grid, Position::new(0, 0), Position::new(4, 4)).unwrap();

        assert_eq!(path.tiles.len(), 5);
        assert_eq!(path.cost, 4);
        assert_eq!(path.start(), Some(Position::new(0, 0)));
        assert_eq!(path.goal(), Some(Position::new(4, 4)));
    }

    #[test]
    fn move_count_matches_chebyshev_distance() {
        let grid = open_grid(10, 10);
        let cases = [
            (Position::new(0, 2), Position::new(6, 2)),
            (Position::new(3, 9), Position::new(3, 1)),
            (Position::new(9, 0), Position::new(2, 7)),
            (Position::new(1, 1), Position::new(8, 8)),
        ];

        for (start, goal) in cases {
            let path = calculate_path(&grid, start, goal).unwrap();
            assert_eq!(path.moves(), start.chebyshev(goal) as usize, "{start} -> {goal}");
            assert_eq!(path.cost, start.chebyshev(goal), "{start} -> {goal}");
        }
    }

    #[test]
    fn start_equals_goal() {
        let grid = open_grid(3, 3);
        let path = calculate_path(&grid, Position::new(1, 1), Position::new(1, 1)).unwrap();
        assert_eq!(path.tiles, vec![Position::new(1, 1)]);
        assert_eq!(path.cost, 0);
    }

    #[test]
    fn blocked_goal_is_not_found() {
        let mut grid = open_grid(5, 5);
        grid.set(Position::new(4, 4), B);
        assert_eq!(
            calculate_path(&grid, Position::new(0, 0), Position::new(4, 4)),
            None
        );
    }

    #[test]
    fn out_of_bounds_endpoints_are_not_found() {
        let grid = open_grid(3, 3);
        assert_eq!(
            calculate_path(&grid, Position::new(-1, 0), Position::new(2, 2)),
            None
        );
        assert_eq!(
            calculate_path(&grid, Position::new(0, 0), Position::new(3, 0)),
            None
        );
    }

    #[test]
    fn enclosed_goal_is_unreachable() {
        let rows = vec![
            vec![W, W, W, W, W],
            vec![W, B, B, B, W],
            vec![W, B, W, B, W],
            vec![W, B, B, B, W],
            vec![W, W, W, W, W],
        ];
        let grid = Grid::new(rows, Position::ORIGIN).unwrap();
        assert_eq!(
            calculate_path(&grid, Position::new(0, 0), Position::new(2, 2)),
            None
        );
    }

    #[test]
    fn routes_through_gap_in_wall() {
        let rows = vec![
            vec![W, W, B, W, W],
            vec![W, W, B, W, W],
            vec![W, W, W, W, W],
            vec![W, W, B, W, W],
            vec![W, W, B, W, W],
        ];
        let grid = Grid::new(rows, Position::ORIGIN).unwrap();
        let path = calculate_path(&grid, Position::new(0, 0), Position::new(4, 0)).unwrap();

        assert!(path.tiles.contains(&Position::new(2, 2)));
        for tile in &path.tiles {
            assert_eq!(grid.tile(*tile), Some(W));
        }
        for pair in path.tiles.windows(2) {
            assert_eq!(pair[0].chebyshev(pair[1]), 1);
        }
    }

    #[test]
    fn avoids_monster_when_detour_exists() {
        let mut grid = open_grid(7, 3);
        grid.set(Position::new(3, 1), CollisionType::Monster);

        let path = calculate_path(&grid, Position::new(0, 1), Position::new(6, 1)).unwrap();
        assert!(!path.tiles.contains(&Position::new(3, 1)));
        assert!(path.cost < SOFT_BLOCKER_COST);
    }

    #[test]
    fn crosses_soft_blocker_when_it_is_the_only_way() {
        let rows = vec![
            vec![B, B, B, B, B],
            vec![W, W, CollisionType::LowPriority, W, W],
            vec![B, B, B, B, B],
        ];
        let grid = Grid::new(rows, Position::ORIGIN).unwrap();
        let path = calculate_path(&grid, Position::new(0, 1), Position::new(4, 1)).unwrap();

        assert_eq!(path.moves(), 4);
        assert_eq!(path.cost, 3 * WALKABLE_COST + SOFT_BLOCKER_COST);
    }

    #[test]
    fn bend_pays_penalty_per_turn() {
        // Right, then cut the corner diagonally, then down: two turns.
        let rows = vec![
            vec![W, W, W],
            vec![B, B, W],
            vec![B, B, W],
        ];
        let grid = Grid::new(rows, Position::ORIGIN).unwrap();
        let path = calculate_path(&grid, Position::new(0, 0), Position::new(2, 2)).unwrap();

        assert_eq!(
            path.tiles,
            vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(2, 1),
                Position::new(2, 2),
            ]
        );
        assert_eq!(path.cost, 3 * WALKABLE_COST + 2 * DIRECTION_CHANGE_PENALTY);
    }
}
