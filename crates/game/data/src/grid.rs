//! Per-area collision grid.
//!
//! A [`Grid`] is an immutable tile map with an origin offset: world position
//! `p` maps to grid tile `p - offset`. Every tile carries a [`CollisionType`]
//! that the pathfinder turns into a traversal cost.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{GridError, Position};

/// Traversal classification of a single tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionType {
    /// Never traversable.
    #[default]
    Blocked,
    /// Plain floor.
    Walkable,
    /// Soft blocker: traversable, but only when no cheaper route exists.
    LowPriority,
    /// Occupied by a monster.
    Monster,
}

impl CollisionType {
    #[inline]
    pub fn is_walkable(self) -> bool {
        !matches!(self, CollisionType::Blocked)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct Grid {
    offset: Position,
    width: usize,
    height: usize,
    /// Row-major tiles, `width * height` long.
    tiles: Vec<CollisionType>,
}

/// Decoded form of a [`Grid`], checked before it becomes one.
#[derive(Deserialize)]
struct RawGrid {
    offset: Position,
    width: usize,
    height: usize,
    tiles: Vec<CollisionType>,
}

impl TryFrom<RawGrid> for Grid {
    type Error = GridError;

    fn try_from(raw: RawGrid) -> Result<Self, GridError> {
        let RawGrid {
            offset,
            width,
            height,
            tiles,
        } = raw;
        if width == 0 || height == 0 {
            return Err(GridError::Empty);
        }
        if width.checked_mul(height) != Some(tiles.len()) {
            return Err(GridError::Dimensions {
                width,
                height,
                tiles: tiles.len(),
            });
        }
        Ok(Self {
            offset,
            width,
            height,
            tiles,
        })
    }
}

impl Grid {
    /// Builds a grid from rows of tiles (`rows[y][x]`).
    pub fn new(rows: Vec<Vec<CollisionType>>, offset: Position) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if width == 0 {
            return Err(GridError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * height);
        for (row, cells) in rows.into_iter().enumerate() {
            if cells.len() != width {
                return Err(GridError::Ragged {
                    row,
                    expected: width,
                    found: cells.len(),
                });
            }
            tiles.extend(cells);
        }

        Ok(Self {
            offset,
            width,
            height,
            tiles,
        })
    }

    /// A fully walkable `width x height` grid.
    pub fn walkable(width: usize, height: usize, offset: Position) -> Self {
        Self {
            offset,
            width,
            height,
            tiles: vec![CollisionType::Walkable; width * height],
        }
    }

    /// Marks walkable tiles within two tiles of a blocked tile as
    /// [`CollisionType::LowPriority`], keeping paths away from walls.
    pub fn with_wall_padding(mut self) -> Self {
        let blocked: Vec<Position> = self
            .positions()
            .filter(|&p| self.tile(p) == Some(CollisionType::Blocked))
            .collect();

        for wall in blocked {
            self.pad_around(wall, 2);
        }
        self
    }

    /// Downgrades walkable tiles in the square of `radius` around `center`
    /// (excluding the center) to [`CollisionType::LowPriority`].
    pub fn pad_around(&mut self, center: Position, radius: i32) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let p = Position::new(center.x + dx, center.y + dy);
                if self.tile(p) == Some(CollisionType::Walkable) {
                    self.set(p, CollisionType::LowPriority);
                }
            }
        }
    }

    pub fn offset(&self) -> Position {
        self.offset
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Converts a world position into grid-relative coordinates.
    pub fn relative(&self, world: Position) -> Position {
        Position::new(world.x - self.offset.x, world.y - self.offset.y)
    }

    /// Converts grid-relative coordinates back into a world position.
    pub fn absolute(&self, relative: Position) -> Position {
        Position::new(relative.x + self.offset.x, relative.y + self.offset.y)
    }

    /// Whether a grid-relative position lies inside the grid.
    pub fn contains(&self, relative: Position) -> bool {
        relative.x >= 0
            && relative.y >= 0
            && (relative.x as usize) < self.width
            && (relative.y as usize) < self.height
    }

    /// Row-major index of a grid-relative position.
    pub fn index(&self, relative: Position) -> Option<usize> {
        self.contains(relative)
            .then(|| relative.y as usize * self.width + relative.x as usize)
    }

    /// Grid-relative position of a row-major index.
    pub fn position(&self, index: usize) -> Position {
        Position::new((index % self.width) as i32, (index / self.width) as i32)
    }

    pub fn tile(&self, relative: Position) -> Option<CollisionType> {
        self.index(relative).map(|i| self.tiles[i])
    }

    /// Overwrites a tile; out-of-bounds positions are ignored.
    pub fn set(&mut self, relative: Position, tile: CollisionType) {
        if let Some(i) = self.index(relative) {
            self.tiles[i] = tile;
        }
    }

    /// Whether a world position is inside the grid and not blocked.
    pub fn is_walkable(&self, world: Position) -> bool {
        self.tile(self.relative(world))
            .is_some_and(CollisionType::is_walkable)
    }

    /// Whether a world position falls inside this grid at all.
    pub fn is_inside(&self, world: Position) -> bool {
        self.contains(self.relative(world))
    }

    /// Iterates every grid-relative position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.tiles.len()).map(|i| self.position(i))
    }

    /// Writes the grid to `path` in bincode format.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), GridError> {
        let writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(writer, self)?;
        Ok(())
    }

    /// Reads a grid previously written by [`Grid::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GridError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(bincode::deserialize_from(reader)?)
    }
}
