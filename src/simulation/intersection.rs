//! Intersection timing for the city block simulation
//!
//! Each intersection cycles between two free axes. Its timer counts down by
//! the cost of every move taken anywhere in the grid.

use log::debug;
use rand::Rng;
use serde::Serialize;

use super::error::SimError;
use super::grid::CityGrid;
use super::types::{Axis, CornerPos, IntersectionId, MAX_ASSIGNED_TIMING, MIN_ASSIGNED_TIMING};

/// A signalled intersection owning four corners
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimIntersection {
    pub id: IntersectionId,
    pub children: [CornerPos; 4],
    /// Axis along which crossing is currently free
    valid_direction: Axis,
    /// Full cycle length, fixed at creation
    assigned_timing: u32,
    /// Ticks left in the current phase
    current_timing: u32,
}

/// Inspection record for an intersection, in dump field order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntersectionRecord {
    pub parent: IntersectionId,
    pub children: [CornerPos; 4],
    pub valid_direction: Axis,
    pub assigned_timing: u32,
    pub current_timing: u32,
}

impl SimIntersection {
    pub fn new(
        id: IntersectionId,
        children: [CornerPos; 4],
        valid_direction: Axis,
        assigned_timing: u32,
        current_timing: u32,
    ) -> Result<Self, SimError> {
        if assigned_timing == 0 || current_timing > assigned_timing {
            return Err(SimError::InvalidTiming {
                assigned: assigned_timing,
                current: current_timing,
            });
        }

        Ok(Self {
            id,
            children,
            valid_direction,
            assigned_timing,
            current_timing,
        })
    }

    /// Draw a cycle in `[20, 40]`, a starting count in `[0, cycle]` and a
    /// free axis with equal odds
    pub fn random<R: Rng>(id: IntersectionId, children: [CornerPos; 4], rng: &mut R) -> Self {
        let assigned_timing = rng.random_range(MIN_ASSIGNED_TIMING..=MAX_ASSIGNED_TIMING);
        let current_timing = rng.random_range(0..=assigned_timing);
        let valid_direction = if rng.random_bool(0.5) { Axis::X } else { Axis::Y };

        Self {
            id,
            children,
            valid_direction,
            assigned_timing,
            current_timing,
        }
    }

    pub fn valid_direction(&self) -> Axis {
        self.valid_direction
    }

    pub fn assigned_timing(&self) -> u32 {
        self.assigned_timing
    }

    pub fn current_timing(&self) -> u32 {
        self.current_timing
    }

    pub fn owns(&self, pos: CornerPos) -> bool {
        self.children.contains(&pos)
    }

    /// Count the timer down by `elapsed`, flipping the free axis and adding a
    /// full cycle until the count is positive again. Returns the number of
    /// flips, which can exceed one when `elapsed` spans several cycles.
    pub fn advance(&mut self, elapsed: u32) -> u32 {
        let remaining = i64::from(self.current_timing) - i64::from(elapsed);
        if remaining > 0 {
            self.current_timing = remaining as u32;
            return 0;
        }

        let cycle = i64::from(self.assigned_timing);
        let flips = (-remaining) / cycle + 1;
        self.current_timing = (remaining + flips * cycle) as u32;
        if flips % 2 == 1 {
            self.valid_direction = self.valid_direction.flipped();
        }

        debug!(
            "Intersection {} flipped {} time(s), now {} with {} left",
            self.id.0, flips, self.valid_direction, self.current_timing
        );
        flips as u32
    }

    pub fn record(&self) -> IntersectionRecord {
        IntersectionRecord {
            parent: self.id,
            children: self.children,
            valid_direction: self.valid_direction,
            assigned_timing: self.assigned_timing,
            current_timing: self.current_timing,
        }
    }
}

/// One randomly timed intersection per grid cell, ids counting from 1
pub fn random_intersections<R: Rng>(grid: &CityGrid, rng: &mut R) -> Vec<SimIntersection> {
    grid.cells()
        .enumerate()
        .map(|(i, children)| {
            SimIntersection::random(IntersectionId(i as u32 + 1), children, &mut *rng)
        })
        .collect()
}
