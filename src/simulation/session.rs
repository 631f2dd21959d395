//! Session state for a walk across the city grid
//!
//! A session wraps the move engine with start and end corners and keeps the
//! total time spent walking. Reaching the end corner completes the session,
//! but the engine keeps accepting moves; stopping is up to the caller.

use log::info;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use super::error::SimError;
use super::grid::CityGrid;
use super::intersection::{random_intersections, IntersectionRecord};
use super::moves::{Move, MoveEngine};
use super::types::CornerPos;

/// Snapshot of where the pedestrian stands and what they can do next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub current_position: CornerPos,
    pub legal_moves: Vec<Move>,
}

/// Result of a step taken through the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    pub position: CornerPos,
    pub cost: u32,
    pub next_moves: Vec<Move>,
    pub total_time: u64,
    /// Whether the step landed on the end corner
    pub arrived: bool,
}

/// A pedestrian's walk from a corner of the first intersection to a corner
/// of the last one
#[derive(Debug, Clone)]
pub struct Session {
    engine: MoveEngine,
    start_position: CornerPos,
    end_position: CornerPos,
    /// Sum of every committed move's cost
    total_time: u64,
    moves_taken: usize,
}

impl Session {
    pub fn new(width: u32, height: u32) -> Result<Self, SimError> {
        Self::with_rng(width, height, &mut rand::rng())
    }

    /// Create a session with a seeded RNG for reproducible walks
    pub fn new_with_seed(width: u32, height: u32, seed: u64) -> Result<Self, SimError> {
        Self::with_rng(width, height, &mut StdRng::seed_from_u64(seed))
    }

    /// Create a session drawing signal timings, then the start and end
    /// corners, from `rng`
    pub fn with_rng<R: Rng>(width: u32, height: u32, rng: &mut R) -> Result<Self, SimError> {
        let grid = CityGrid::new(width, height)?;
        let (first, last) = match (grid.cells().next(), grid.cells().last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(SimError::InvalidDimensions { width, height }),
        };

        let intersections = random_intersections(&grid, &mut *rng);
        let start = first[rng.random_range(0..first.len())];
        let end = last[rng.random_range(0..last.len())];

        let engine = MoveEngine::new(grid, intersections, start)?;
        Self::from_parts(engine, start, end)
    }

    /// Create a session around a prepared engine. The engine's position
    /// becomes the start corner.
    pub fn from_parts(
        engine: MoveEngine,
        start_position: CornerPos,
        end_position: CornerPos,
    ) -> Result<Self, SimError> {
        if engine.position() != start_position {
            return Err(SimError::InvalidPosition(start_position));
        }
        if !engine.grid().contains(end_position) {
            return Err(SimError::InvalidPosition(end_position));
        }

        info!(
            "Start position: {}, End position: {}",
            start_position, end_position
        );

        Ok(Self {
            engine,
            start_position,
            end_position,
            total_time: 0,
            moves_taken: 0,
        })
    }

    pub fn engine(&self) -> &MoveEngine {
        &self.engine
    }

    pub fn start_position(&self) -> CornerPos {
        self.start_position
    }

    pub fn end_position(&self) -> CornerPos {
        self.end_position
    }

    pub fn current_position(&self) -> CornerPos {
        self.engine.position()
    }

    pub fn total_time(&self) -> u64 {
        self.total_time
    }

    pub fn moves_taken(&self) -> usize {
        self.moves_taken
    }

    pub fn is_complete(&self) -> bool {
        self.current_position() == self.end_position
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            current_position: self.engine.position(),
            legal_moves: self.engine.legal_moves().to_vec(),
        }
    }

    /// Take the move at `index` in the current state's legal moves
    pub fn step(&mut self, index: usize) -> Result<StepResult, SimError> {
        let outcome = self.engine.commit_move(index)?;
        self.total_time += u64::from(outcome.cost);
        self.moves_taken += 1;

        let arrived = outcome.position == self.end_position;
        if arrived {
            info!(
                "Arrived at {} after {} moves, total time {}",
                outcome.position, self.moves_taken, self.total_time
            );
        }

        Ok(StepResult {
            position: outcome.position,
            cost: outcome.cost,
            next_moves: outcome.next_moves,
            total_time: self.total_time,
            arrived,
        })
    }

    pub fn intersection_records(&self) -> Vec<IntersectionRecord> {
        self.engine
            .intersections()
            .iter()
            .map(|intersection| intersection.record())
            .collect()
    }

    /// Pretty-printed JSON of every intersection, in creation order
    pub fn intersections_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.intersection_records())
    }

    /// Print a summary of the session state
    pub fn print_summary(&self) {
        println!("=== City Block Summary ===");
        println!(
            "Grid: {}x{} intersections",
            self.engine.grid().width(),
            self.engine.grid().height()
        );
        println!(
            "Start: {}, End: {}, Current: {}",
            self.start_position,
            self.end_position,
            self.current_position()
        );
        println!("Moves taken: {}", self.moves_taken);
        println!("Total time: {}", self.total_time);
        if let Some(intersection) = self.engine.intersection_at(self.current_position()) {
            println!(
                "Signal at intersection {}: {} for {} more (cycle {})",
                intersection.id.0,
                intersection.valid_direction(),
                intersection.current_timing(),
                intersection.assigned_timing()
            );
        }
        println!("--- Moves ---");
        for (index, mv) in self.engine.legal_moves().iter().enumerate() {
            println!(
                "  [{}] {} to {}: cost={} ({})",
                index, mv.direction, mv.target, mv.cost, mv.label
            );
        }
    }

    /// Render the corner lattice as text, top row first
    pub fn render_map(&self) -> String {
        let grid = self.engine.grid();
        let lattice_width = grid.lattice_width();
        // Two corners per cell, three spaces between cells
        let line_len = grid.width() as usize * 6 - 3;
        let column = |x: u32| (x / 2) as usize * 6 + (x % 2) as usize * 2;

        let mut out = String::new();
        for y in (0..grid.lattice_height()).rev() {
            let mut line = vec![' '; line_len];
            for x in 0..lattice_width {
                let pos = CornerPos::new(x, y);
                line[column(x)] = if pos == self.current_position() {
                    '@'
                } else if pos == self.start_position {
                    'S'
                } else if pos == self.end_position {
                    'E'
                } else {
                    'o'
                };
            }
            out.extend(line);
            out.push('\n');

            if y % 2 == 1 {
                let mut centres = vec![' '; line_len];
                for cx in 0..grid.width() {
                    centres[column(cx * 2) + 1] = '+';
                }
                out.extend(centres);
                out.push('\n');
            } else if y > 0 {
                out.push('\n');
            }
        }
        out
    }

    /// Draw a visual map of the grid in the terminal
    pub fn draw_map(&self) {
        println!("\n=== City Map ===");
        println!("Legend: S=Start, E=End, @=You, o=Corner, +=Intersection");
        println!();
        print!("{}", self.render_map());
        println!();
    }
}
