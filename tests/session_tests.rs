//! Session behaviour tests
//!
//! Covers start/end placement, time accounting, arrival and the
//! intersection dump.

use city_block::simulation::{
    Axis, CityGrid, CornerPos, IntersectionId, MoveEngine, Session, SimError, SimIntersection,
    MAX_ASSIGNED_TIMING, MIN_ASSIGNED_TIMING,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;

fn pos(x: u32, y: u32) -> CornerPos {
    CornerPos::new(x, y)
}

/// One intersection, X free, a full 20-tick phase, walking (0,0) -> (1,1)
fn single_block_session() -> Session {
    let grid = CityGrid::new(1, 1).unwrap();
    let children = [pos(0, 0), pos(1, 0), pos(0, 1), pos(1, 1)];
    let intersection = SimIntersection::new(IntersectionId(1), children, Axis::X, 20, 20).unwrap();
    let engine = MoveEngine::new(grid, vec![intersection], pos(0, 0)).unwrap();
    Session::from_parts(engine, pos(0, 0), pos(1, 1)).unwrap()
}

#[test]
fn test_session_start_and_end_corners() {
    for seed in 0..50 {
        let session = Session::new_with_seed(3, 5, seed).unwrap();
        let first = &session.engine().intersections()[0];
        let last = session.engine().intersections().last().unwrap();

        assert!(first.owns(session.start_position()));
        assert!(last.owns(session.end_position()));
        assert_eq!(session.current_position(), session.start_position());
        assert_eq!(session.total_time(), 0);
        assert!(!session.is_complete());
    }
}

#[test]
fn test_session_rejects_empty_grid() {
    assert_eq!(
        Session::new(0, 0).unwrap_err(),
        SimError::InvalidDimensions {
            width: 0,
            height: 0
        }
    );
}

#[test]
fn test_seeded_sessions_match() {
    let a = Session::new_with_seed(4, 7, 99).unwrap();
    let b = Session::new_with_seed(4, 7, 99).unwrap();

    assert_eq!(a.start_position(), b.start_position());
    assert_eq!(a.end_position(), b.end_position());
    assert_eq!(a.intersection_records(), b.intersection_records());
    assert_eq!(a.state(), b.state());
}

#[test]
fn test_state_is_idempotent() {
    let session = Session::new_with_seed(2, 3, 5).unwrap();
    let first = session.state();
    let second = session.state();
    assert_eq!(first, second);
    assert_eq!(first.current_position, session.start_position());
}

#[test]
fn test_walk_to_end_corner() {
    let mut session = single_block_session();

    let step = session.step(0).unwrap();
    assert_eq!(step.position, pos(1, 0));
    assert_eq!(step.cost, 8);
    assert_eq!(step.total_time, 8);
    assert!(!step.arrived);

    // X still free with 12 left, so going up waits it out
    assert_eq!(step.next_moves[1].target, pos(1, 1));
    assert_eq!(step.next_moves[1].cost, 20);

    let step = session.step(1).unwrap();
    assert_eq!(step.position, pos(1, 1));
    assert_eq!(step.cost, 20);
    assert_eq!(step.total_time, 28);
    assert!(step.arrived);
    assert!(session.is_complete());
    assert_eq!(session.moves_taken(), 2);

    // Arrival doesn't stop the engine
    assert!(session.step(0).is_ok());
    assert!(!session.is_complete());
}

#[test]
fn test_invalid_step_is_a_no_op() {
    let mut session = Session::new_with_seed(3, 3, 17).unwrap();
    session.step(0).unwrap();

    let state = session.state();
    let records = session.intersection_records();
    let total = session.total_time();

    let err = session.step(state.legal_moves.len()).unwrap_err();
    assert!(matches!(err, SimError::InvalidMove { .. }));

    assert_eq!(session.state(), state);
    assert_eq!(session.intersection_records(), records);
    assert_eq!(session.total_time(), total);
    assert_eq!(session.moves_taken(), 1);
}

#[test]
fn test_total_time_accumulates_costs() {
    let mut session = Session::new_with_seed(4, 4, 2024).unwrap();
    let mut rng = StdRng::seed_from_u64(8);
    let mut expected = 0u64;

    for _ in 0..100 {
        let state = session.state();
        let index = rng.random_range(0..state.legal_moves.len());
        let chosen = state.legal_moves[index];

        let step = session.step(index).unwrap();
        expected += u64::from(chosen.cost);

        assert_eq!(step.position, chosen.target);
        assert_eq!(step.cost, chosen.cost);
        assert_eq!(step.total_time, expected);
        assert_eq!(session.total_time(), expected);
        assert_eq!(step.arrived, step.position == session.end_position());
    }
}

#[test]
fn test_from_parts_validates_positions() {
    let grid = CityGrid::new(1, 1).unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    let engine = MoveEngine::random(grid, pos(0, 0), &mut rng).unwrap();

    assert_eq!(
        Session::from_parts(engine.clone(), pos(1, 0), pos(1, 1)).unwrap_err(),
        SimError::InvalidPosition(pos(1, 0))
    );
    assert_eq!(
        Session::from_parts(engine, pos(0, 0), pos(2, 2)).unwrap_err(),
        SimError::InvalidPosition(pos(2, 2))
    );
}

#[test]
fn test_intersections_json_shape() {
    let session = Session::new_with_seed(2, 3, 7).unwrap();
    let json = session.intersections_json().unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();
    let records = value.as_array().unwrap();

    assert_eq!(records.len(), 6);
    assert_eq!(records[0]["parent"], 1);
    assert_eq!(records[5]["parent"], 6);
    assert_eq!(
        records[0]["children"],
        serde_json::json!([[0, 0], [1, 0], [0, 1], [1, 1]])
    );
    assert_eq!(
        records[5]["children"],
        serde_json::json!([[2, 4], [3, 4], [2, 5], [3, 5]])
    );

    for record in records {
        let axis = record["valid_direction"].as_str().unwrap();
        assert!(axis == "x" || axis == "y");

        let assigned = record["assigned_timing"].as_u64().unwrap() as u32;
        let current = record["current_timing"].as_u64().unwrap() as u32;
        assert!((MIN_ASSIGNED_TIMING..=MAX_ASSIGNED_TIMING).contains(&assigned));
        assert!(current <= assigned);
    }
}

#[test]
fn test_render_map_marks_corners() {
    let mut session = single_block_session();
    assert_eq!(session.render_map(), "o E\n + \n@ o\n");

    session.step(0).unwrap();
    assert_eq!(session.render_map(), "o E\n + \nS @\n");
}

#[test]
fn test_render_map_spaces_blocks() {
    let grid = CityGrid::new(2, 2).unwrap();
    let mut rng = StdRng::seed_from_u64(4);
    let engine = MoveEngine::random(grid, pos(0, 0), &mut rng).unwrap();
    let session = Session::from_parts(engine, pos(0, 0), pos(3, 3)).unwrap();

    let map = session.render_map();
    let lines: Vec<&str> = map.lines().collect();
    assert_eq!(
        lines,
        vec![
            "o o   o E",
            " +     + ",
            "o o   o o",
            "",
            "o o   o o",
            " +     + ",
            "@ o   o o",
        ]
    );
}
