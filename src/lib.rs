//! City Block Simulation Library
//!
//! A pedestrian crossing a grid of signalled intersections, where every
//! step advances every signal's clock.

pub mod simulation;
