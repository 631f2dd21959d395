//! Move legality and cost for the city block simulation
//!
//! The engine enumerates the moves available from the current corner,
//! prices them against the owning intersection's signal, and on commit
//! advances every signal in the grid by the cost paid.

use log::{debug, warn};
use rand::Rng;
use std::fmt;

use super::error::SimError;
use super::grid::CityGrid;
use super::intersection::{random_intersections, SimIntersection};
use super::types::{
    CornerPos, Direction, INTER_MOVE, INTRA_MOVE, NEAR_EXPIRY_THRESHOLD, WALK_THRESHOLD,
};

/// What the signal shows for a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveLabel {
    /// Free axis with plenty of time left
    Walk,
    /// Free axis, but only this many ticks remain in the phase
    Countdown(u32),
    /// Against the free axis; the pedestrian waits out the phase
    Stop,
    /// Leaves the intersection for a neighbouring block
    Block,
}

impl fmt::Display for MoveLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveLabel::Walk => write!(f, "Walk"),
            MoveLabel::Countdown(ticks) => write!(f, "{}", ticks),
            MoveLabel::Stop => write!(f, "Stop"),
            MoveLabel::Block => write!(f, "Block"),
        }
    }
}

/// A legal step from the current corner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub direction: Direction,
    pub target: CornerPos,
    pub cost: u32,
    pub label: MoveLabel,
}

/// Result of a committed move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub position: CornerPos,
    pub cost: u32,
    pub next_moves: Vec<Move>,
}

/// Price a single step from `from` to its neighbour `to`, given the signal
/// of the intersection owning `from`
pub fn move_cost(
    intersection: &SimIntersection,
    from: CornerPos,
    to: CornerPos,
    direction: Direction,
) -> (u32, MoveLabel) {
    if from.cell() != to.cell() {
        return (INTER_MOVE, MoveLabel::Block);
    }

    let current = intersection.current_timing();
    if direction.axis() == intersection.valid_direction() {
        let mut cost = INTRA_MOVE;
        if current <= NEAR_EXPIRY_THRESHOLD {
            // Signal flips mid-crossing
            cost += current + intersection.assigned_timing();
        }
        let label = if current > WALK_THRESHOLD {
            MoveLabel::Walk
        } else {
            MoveLabel::Countdown(current)
        };
        (cost, label)
    } else {
        (current + INTRA_MOVE, MoveLabel::Stop)
    }
}

/// Owns the grid, every intersection and the pedestrian's corner
#[derive(Debug, Clone)]
pub struct MoveEngine {
    grid: CityGrid,
    /// Indexed by `CityGrid::intersection_index`
    intersections: Vec<SimIntersection>,
    position: CornerPos,
    /// Moves from `position`; the list `commit_move` indexes into
    legal_moves: Vec<Move>,
}

impl MoveEngine {
    /// Build an engine from explicit intersections. They must match the
    /// grid's cells one-for-one, in creation order.
    pub fn new(
        grid: CityGrid,
        intersections: Vec<SimIntersection>,
        position: CornerPos,
    ) -> Result<Self, SimError> {
        if !grid.contains(position) {
            return Err(SimError::InvalidPosition(position));
        }
        if intersections.len() != grid.intersection_count() {
            return Err(SimError::InvalidDimensions {
                width: grid.width(),
                height: grid.height(),
            });
        }
        if let Some((_, bad)) = grid
            .cells()
            .zip(&intersections)
            .find(|(cell, intersection)| *cell != intersection.children)
        {
            return Err(SimError::CellMismatch { parent: bad.id.0 });
        }

        let mut engine = Self {
            grid,
            intersections,
            position,
            legal_moves: Vec::new(),
        };
        engine.legal_moves = engine.moves_from(position);
        Ok(engine)
    }

    /// Build an engine whose signals are drawn from `rng`
    pub fn random<R: Rng>(
        grid: CityGrid,
        position: CornerPos,
        rng: &mut R,
    ) -> Result<Self, SimError> {
        let intersections = random_intersections(&grid, rng);
        Self::new(grid, intersections, position)
    }

    pub fn grid(&self) -> &CityGrid {
        &self.grid
    }

    pub fn intersections(&self) -> &[SimIntersection] {
        &self.intersections
    }

    pub fn position(&self) -> CornerPos {
        self.position
    }

    pub fn legal_moves(&self) -> &[Move] {
        &self.legal_moves
    }

    /// The intersection owning `pos`
    pub fn intersection_at(&self, pos: CornerPos) -> Option<&SimIntersection> {
        self.grid
            .intersection_index(pos)
            .and_then(|index| self.intersections.get(index))
    }

    /// Enumerate moves from `pos` in Left, Right, Down, Up order, skipping
    /// steps that leave the grid
    pub fn moves_from(&self, pos: CornerPos) -> Vec<Move> {
        let Some(intersection) = self.intersection_at(pos) else {
            return Vec::new();
        };

        Direction::ALL
            .iter()
            .filter_map(|&direction| {
                let target = pos.step(direction).filter(|t| self.grid.contains(*t))?;
                let (cost, label) = move_cost(intersection, pos, target, direction);
                Some(Move {
                    direction,
                    target,
                    cost,
                    label,
                })
            })
            .collect()
    }

    /// Take the move at `index` in the current legal-move list. Every
    /// intersection's timer advances by the cost, not only the one underfoot.
    /// A bad index leaves all state untouched.
    pub fn commit_move(&mut self, index: usize) -> Result<MoveOutcome, SimError> {
        let Some(chosen) = self.legal_moves.get(index).copied() else {
            warn!(
                "Rejected move {} at {}: {} moves available",
                index,
                self.position,
                self.legal_moves.len()
            );
            return Err(SimError::InvalidMove {
                index,
                available: self.legal_moves.len(),
            });
        };

        debug!(
            "Move {} {} -> {} cost {} ({})",
            chosen.direction, self.position, chosen.target, chosen.cost, chosen.label
        );

        self.position = chosen.target;
        for intersection in &mut self.intersections {
            intersection.advance(chosen.cost);
        }
        self.legal_moves = self.moves_from(self.position);

        Ok(MoveOutcome {
            position: self.position,
            cost: chosen.cost,
            next_moves: self.legal_moves.clone(),
        })
    }
}
