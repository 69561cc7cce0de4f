//! World-coordinate path queries on top of [`calculate_path`].

use game_data::{CollisionType, Data, Grid, Position};

use crate::astar::{Path, calculate_path};

/// Radius searched for a walkable replacement when a target tile is blocked.
const NEARBY_WALKABLE_RADIUS: i32 = 3;

/// Padding of low-priority tiles kept around objects.
const OBJECT_PADDING: i32 = 2;

/// Path queries against the current area of a [`Data`] snapshot.
///
/// Holds no mutable state: every query copies the area grid, overlays the
/// entities of the snapshot and runs a fresh search.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathFinder;

impl PathFinder {
    pub fn new() -> Self {
        Self
    }

    /// Path from the player's position to `to`, in world coordinates.
    ///
    /// A blocked target is replaced by the closest walkable tile within a
    /// small radius, so paths to objects standing on blocked tiles still work.
    pub fn get_path(&self, data: &Data, to: Position) -> Option<Path> {
        let grid = data.grid.as_deref()?;
        let target = if grid.is_walkable(to) {
            to
        } else {
            self.find_nearby_walkable(grid, to)?
        };
        self.get_path_from(data, data.player.position, target)
    }

    /// Path between two world positions with monsters and objects overlaid.
    pub fn get_path_from(&self, data: &Data, from: Position, to: Position) -> Option<Path> {
        let area_grid = data.grid.as_deref()?;
        let grid = overlay_entities(area_grid, data);

        let path = calculate_path(&grid, grid.relative(from), grid.relative(to));
        match &path {
            Some(path) => tracing::debug!(%from, %to, cost = path.cost, "path calculated"),
            None => tracing::debug!(%from, %to, area = %data.area, "no path found"),
        }

        path.map(|path| Path {
            tiles: path.tiles.into_iter().map(|p| grid.absolute(p)).collect(),
            cost: path.cost,
        })
    }

    /// Closest walkable world tile around `target`, searched ring by ring.
    pub fn find_nearby_walkable(&self, grid: &Grid, target: Position) -> Option<Position> {
        (1..=NEARBY_WALKABLE_RADIUS).find_map(|radius| {
            (-radius..=radius)
                .flat_map(|dx| (-radius..=radius).map(move |dy| (dx, dy)))
                .filter(|&(dx, dy)| dx.abs() == radius || dy.abs() == radius)
                .map(|(dx, dy)| Position::new(target.x + dx, target.y + dy))
                .find(|&p| grid.is_walkable(p))
        })
    }

    /// Tile distance between two world positions.
    pub fn distance(&self, from: Position, to: Position) -> u32 {
        from.chebyshev(to)
    }
}

/// Copies `grid` and marks objects (plus padding) as low priority and
/// monsters as occupied. The original grid is never modified.
fn overlay_entities(grid: &Grid, data: &Data) -> Grid {
    let mut grid = grid.clone();

    for object in &data.objects {
        if !grid.is_walkable(object.position) {
            continue;
        }
        let relative = grid.relative(object.position);
        grid.set(relative, CollisionType::LowPriority);
        grid.pad_around(relative, OBJECT_PADDING);
    }

    for monster in &data.monsters {
        if !grid.is_walkable(monster.position) {
            continue;
        }
        grid.set(grid.relative(monster.position), CollisionType::Monster);
    }

    grid
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use game_data::{Monster, Object, PlayerUnit};

    use super::*;

    fn data_with_grid(grid: Grid, player: Position) -> Data {
        Data {
            player: PlayerUnit {
                position: player,
                life_percent: 100,
            },
            grid: Some(Arc::new(grid)),
            ..Data::default()
        }
    }

    #[test]
    fn returns_world_coordinates() {
        let offset = Position::new(1000, 2000);
        let data = data_with_grid(Grid::walkable(6, 6, offset), Position::new(1000, 2000));

        let path = PathFinder::new()
            .get_path(&data, Position::new(1004, 2004))
            .unwrap();
        assert_eq!(path.start(), Some(Position::new(1000, 2000)));
        assert_eq!(path.goal(), Some(Position::new(1004, 2004)));
        assert_eq!(path.cost, 4);
    }

    #[test]
    fn no_grid_means_no_path() {
        let data = Data::default();
        assert!(PathFinder::new().get_path(&data, Position::new(1, 1)).is_none());
    }

    #[test]
    fn blocked_target_is_replaced_by_nearby_tile() {
        let mut grid = Grid::walkable(8, 8, Position::ORIGIN);
        grid.set(Position::new(5, 5), CollisionType::Blocked);
        let data = data_with_grid(grid, Position::new(0, 0));

        let path = PathFinder::new()
            .get_path(&data, Position::new(5, 5))
            .unwrap();
        let goal = path.goal().unwrap();
        assert_ne!(goal, Position::new(5, 5));
        assert_eq!(goal.chebyshev(Position::new(5, 5)), 1);
    }

    #[test]
    fn monsters_are_avoided_and_grid_is_untouched() {
        let grid = Grid::walkable(7, 3, Position::ORIGIN);
        let mut data = data_with_grid(grid.clone(), Position::new(0, 1));
        data.monsters.push(Monster {
            id: 7,
            position: Position::new(3, 1),
        });

        let path = PathFinder::new()
            .get_path(&data, Position::new(6, 1))
            .unwrap();
        assert!(!path.tiles.contains(&Position::new(3, 1)));
        assert_eq!(data.grid.as_deref(), Some(&grid));
    }

    #[test]
    fn objects_raise_cost_around_them() {
        let grid = Grid::walkable(9, 9, Position::ORIGIN);
        let mut data = data_with_grid(grid, Position::new(0, 4));
        let free = PathFinder::new()
            .get_path(&data, Position::new(8, 4))
            .unwrap();

        data.objects.push(Object {
            id: 1,
            position: Position::new(4, 4),
        });
        let around = PathFinder::new()
            .get_path(&data, Position::new(8, 4))
            .unwrap();

        assert!(around.cost > free.cost);
        assert!(!around.tiles.contains(&Position::new(4, 4)));
    }
}
