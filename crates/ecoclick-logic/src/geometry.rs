//! Tile positions, chunk keys, and the monotonically growing world bounds.

use serde::{Deserialize, Serialize};

/// Integer tile coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        self.offset(dx, dy)
    }

    /// Wide enough for any two tiles, including opposite corners of `i32`.
    pub fn manhattan(self, other: Position) -> u64 {
        u64::from(self.x.abs_diff(other.x)) + u64::from(self.y.abs_diff(other.y))
    }

    /// 4-neighbor adjacency (Manhattan distance exactly 1).
    pub fn is_adjacent(self, other: Position) -> bool {
        self.manhattan(other) == 1
    }

    /// Chunk containing this tile (floor division, so negatives round down).
    pub fn chunk(self, chunk_size: i32) -> ChunkKey {
        ChunkKey {
            cx: self.x.div_euclid(chunk_size),
            cy: self.y.div_euclid(chunk_size),
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four movement directions. +y points down (screen space).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Direction of a single-tile delta, if it is one.
    pub fn from_delta(dx: i32, dy: i32) -> Option<Direction> {
        match (dx, dy) {
            (0, -1) => Some(Direction::Up),
            (0, 1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Chunk coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkKey {
    pub cx: i32,
    pub cy: i32,
}

impl ChunkKey {
    pub const fn new(cx: i32, cy: i32) -> Self {
        Self { cx, cy }
    }

    /// Inclusive tile rectangle covered by this chunk.
    pub fn tile_rect(self, chunk_size: i32) -> Bounds {
        let min_x = self.cx * chunk_size;
        let min_y = self.cy * chunk_size;
        Bounds {
            min_x,
            min_y,
            max_x: min_x + chunk_size - 1,
            max_y: min_y + chunk_size - 1,
        }
    }

    /// Chebyshev neighborhood of `radius` chunks, row-major.
    pub fn neighborhood(self, radius: i32) -> impl Iterator<Item = ChunkKey> {
        (-radius..=radius).flat_map(move |dy| {
            (-radius..=radius).map(move |dx| ChunkKey::new(self.cx + dx, self.cy + dy))
        })
    }
}

/// Inclusive tile rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Bounds {
    pub fn width(&self) -> i32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y + 1
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.min_x && pos.x <= self.max_x && pos.y >= self.min_y && pos.y <= self.max_y
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// Smallest rectangle covering every generated chunk. Only ever grows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoundsTracker {
    bounds: Option<Bounds>,
}

impl BoundsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union the given rectangle into the bounds.
    /// Returns whether the bounds actually changed.
    pub fn expand(&mut self, min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> bool {
        self.expand_to(Bounds { min_x, min_y, max_x, max_y })
    }

    pub fn expand_to(&mut self, rect: Bounds) -> bool {
        let next = match self.bounds {
            Some(current) => current.union(&rect),
            None => rect,
        };
        let changed = self.bounds != Some(next);
        self.bounds = Some(next);
        changed
    }

    /// Current bounds, or `None` before the first chunk is generated.
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.bounds.is_some_and(|b| b.contains(pos))
    }

    pub fn width(&self) -> i32 {
        self.bounds.map_or(0, |b| b.width())
    }

    pub fn height(&self) -> i32 {
        self.bounds.map_or(0, |b| b.height())
    }
}
