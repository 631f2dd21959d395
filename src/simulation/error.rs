//! Errors surfaced by the grid, the timing model and the move engine

use thiserror::Error;

use super::types::CornerPos;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// The chosen index does not address the current legal-move list
    #[error("invalid move {index}: {available} moves available")]
    InvalidMove { index: usize, available: usize },

    #[error("grid must have at least one intersection per axis, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// An intersection's corners are not the cell at its place in the list
    #[error("intersection {parent} does not match its grid cell")]
    CellMismatch { parent: u32 },

    #[error("invalid signal timing: current {current} with cycle {assigned}")]
    InvalidTiming { assigned: u32, current: u32 },

    #[error("corner {0} is outside the grid")]
    InvalidPosition(CornerPos),
}
