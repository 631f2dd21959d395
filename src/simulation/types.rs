//! Core types for the city block simulation
//!
//! Coordinates, axes and the cost constants shared by the grid and the
//! move engine.

use serde::Serialize;
use std::fmt;

/// Cost for moving between two corners of the same intersection
pub const INTRA_MOVE: u32 = 8;

/// Cost for moving between corners of different intersections
pub const INTER_MOVE: u32 = 120;

/// Shortest full signal cycle an intersection can be assigned
pub const MIN_ASSIGNED_TIMING: u32 = 20;

/// Longest full signal cycle an intersection can be assigned
pub const MAX_ASSIGNED_TIMING: u32 = 40;

/// At or below this many ticks left, a crossing along the free axis pays
/// for the signal flipping mid-crossing
pub const NEAR_EXPIRY_THRESHOLD: u32 = 5;

/// Above this many ticks left, a free crossing is labelled "Walk"
pub const WALK_THRESHOLD: u32 = 10;

/// A wrapper type for intersection IDs (1-based, in creation order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct IntersectionId(pub u32);

/// A corner on the `(2 * width) x (2 * height)` lattice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CornerPos {
    pub x: u32,
    pub y: u32,
}

impl CornerPos {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// The intersection cell this corner belongs to
    pub fn cell(&self) -> (u32, u32) {
        (self.x / 2, self.y / 2)
    }

    pub fn manhattan_distance(&self, other: &CornerPos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Step one corner in `direction`. Returns `None` when the step would
    /// leave the non-negative quadrant; upper bounds are the grid's concern.
    pub fn step(&self, direction: Direction) -> Option<CornerPos> {
        let (dx, dy) = direction.delta();
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(CornerPos { x, y })
    }
}

impl fmt::Display for CornerPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// The dump writes coordinates as `[x, y]` pairs
impl Serialize for CornerPos {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.x, self.y].serialize(serializer)
    }
}

/// The axis along which crossing an intersection is currently free
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn flipped(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// One of the four axis-aligned steps a pedestrian can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Down,
    Up,
}

impl Direction {
    /// Enumeration order for legal moves. Callers address moves by index,
    /// so this order must never change.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Down,
        Direction::Up,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Down => (0, -1),
            Direction::Up => (0, 1),
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Direction::Left | Direction::Right => Axis::X,
            Direction::Down | Direction::Up => Axis::Y,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Left => "Left",
            Direction::Right => "Right",
            Direction::Down => "Down",
            Direction::Up => "Up",
        };
        write!(f, "{}", name)
    }
}
