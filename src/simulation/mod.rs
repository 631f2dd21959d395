//! Standalone city block simulation module
//!
//! This module contains the grid geometry, the intersection timing model
//! and the move engine. It has no I/O of its own beyond the terminal
//! summary and map printed by `Session`.

mod error;
mod grid;
mod intersection;
mod moves;
mod session;
mod types;

// Re-export public types for external use
pub use error::SimError;
pub use grid::{CityGrid, Corner};
pub use intersection::{random_intersections, IntersectionRecord, SimIntersection};
pub use moves::{move_cost, Move, MoveEngine, MoveLabel, MoveOutcome};
pub use session::{Session, SessionState, StepResult};
pub use types::{
    Axis, CornerPos, Direction, IntersectionId, INTER_MOVE, INTRA_MOVE, MAX_ASSIGNED_TIMING,
    MIN_ASSIGNED_TIMING, NEAR_EXPIRY_THRESHOLD, WALK_THRESHOLD,
};
