use game_data::{CollisionType, Grid, Position};
use pather::calculate_path;

/// Serpentine maze: walls on alternating rows with the gap on alternating sides.
fn serpentine(width: usize, height: usize) -> Grid {
    let mut grid = Grid::walkable(width, height, Position::new(300, 400));
    for y in (1..height).step_by(2) {
        let gap = if (y / 2) % 2 == 0 { width - 1 } else { 0 };
        for x in 0..width {
            if x != gap {
                grid.set(Position::new(x as i32, y as i32), CollisionType::Blocked);
            }
        }
    }
    grid
}

#[test]
fn path_on_reloaded_grid_matches_original() {
    let grid = serpentine(12, 9);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("maze.bin");
    grid.save(&path).unwrap();
    let loaded = Grid::load(&path).unwrap();

    let start = Position::new(0, 0);
    let goal = Position::new(0, 8);
    let original = calculate_path(&grid, start, goal).unwrap();
    let reloaded = calculate_path(&loaded, start, goal).unwrap();

    assert_eq!(original, reloaded);
    for tile in &reloaded.tiles {
        assert_ne!(loaded.tile(*tile), Some(CollisionType::Blocked));
    }
    // Every wall row forces a full traversal of the corridor above it.
    assert!(reloaded.moves() > 4 * 10);
}

#[test]
fn sealed_maze_has_no_path() {
    let mut grid = serpentine(12, 9);
    grid.set(Position::new(11, 1), CollisionType::Blocked);

    assert!(calculate_path(&grid, Position::new(0, 0), Position::new(0, 8)).is_none());
}
