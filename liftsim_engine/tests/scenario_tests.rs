//! End-to-end scenario tests for the tick pipeline
//!
//! These drive the engine the way a controller would: step, observe
//! events, issue dispatch commands, step again.

use liftsim_engine::{
    BuildingConfig, EventPayload, PassengerStatus, RunStatus, SimulatorEngine, TrafficEntry,
    TrafficFile, TrafficPattern,
};

// ─── Helpers ────────────────────────────────────────────────────────

fn pattern(
    floors: i32,
    elevators: usize,
    capacity: usize,
    duration: u64,
    traffic: &[(u64, i32, i32, u64)],
) -> TrafficPattern {
    let file = TrafficFile {
        building: BuildingConfig {
            floors,
            elevators,
            elevator_capacity: capacity,
            elevator_energy_rates: None,
            scenario: "test".to_string(),
            duration,
        },
        traffic: traffic
            .iter()
            .map(|&(id, origin, destination, tick)| TrafficEntry {
                id,
                origin,
                destination,
                tick,
            })
            .collect(),
    };
    TrafficPattern::from_file(file).expect("test pattern is valid")
}

fn engine_with(
    floors: i32,
    elevators: usize,
    capacity: usize,
    duration: u64,
    traffic: &[(u64, i32, i32, u64)],
) -> SimulatorEngine {
    SimulatorEngine::new(vec![pattern(floors, elevators, capacity, duration, traffic)])
        .expect("engine builds")
}

fn stop_ticks_at(events: &[liftsim_engine::SimulationEvent], floor: i32) -> Vec<u64> {
    events
        .iter()
        .filter(|e| {
            matches!(
                e.payload,
                EventPayload::StoppedAtFloor { floor: f, .. } if f == floor
            )
        })
        .map(|e| e.tick)
        .collect()
}

// ─── Single elevator, two-floor round trip ──────────────────────────

#[test]
fn single_cab_two_floor_trip() {
    let engine = engine_with(2, 1, 10, 100, &[(1, 0, 1, 0)]);

    let outcome = engine.step(1).unwrap();
    assert!(outcome.events.iter().any(|e| matches!(
        e.payload,
        EventPayload::UpButtonPressed {
            floor: 0,
            passenger: 1
        }
    )));
    // The idle cab is parked at the origin, so the passenger boards at once.
    assert!(outcome.events.iter().any(|e| matches!(
        e.payload,
        EventPayload::PassengerBoard { passenger: 1, .. }
    )));

    engine.go_to_floor(0, 1, true).unwrap();
    engine.step(20).unwrap();

    let state = engine.get_state();
    let passenger = &state.passengers[&1];
    assert_eq!(passenger.status(), PassengerStatus::Completed);
    assert!(passenger.pickup_tick < passenger.dropoff_tick);
    assert_eq!(state.elevators[0].position.current_floor, 1);

    // Speed phases up the shaft: one acceleration tick, cruise, one
    // deceleration tick.
    let statuses: Vec<RunStatus> = state
        .events
        .iter()
        .filter_map(|e| match e.payload {
            EventPayload::ElevatorMove { status, .. } => Some(status),
            _ => None,
        })
        .collect();
    assert_eq!(statuses.first(), Some(&RunStatus::StartUp));
    assert_eq!(statuses.last(), Some(&RunStatus::StartDown));
    assert!(
        statuses[1..statuses.len() - 1]
            .iter()
            .all(|s| *s == RunStatus::ConstantSpeed)
    );
}

// ─── Deceleration at distance 1, exact landing ──────────────────────

#[test]
fn deceleration_lands_exactly_without_overshoot() {
    let engine = engine_with(6, 1, 10, 100, &[]);
    engine.go_to_floor(0, 5, true).unwrap();
    let outcome = engine.step(30).unwrap();

    // 50 sub-floor units: 1 accelerating + 24 cruising + 1 decelerating.
    assert_eq!(stop_ticks_at(&outcome.events, 5), vec![26]);
    assert!(outcome.events.iter().any(|e| {
        e.tick == 25
            && matches!(
                e.payload,
                EventPayload::ElevatorApproaching { floor: 5, .. }
            )
    }));

    // The cab never passes floor 5 on the way up.
    for event in &outcome.events {
        if let EventPayload::ElevatorMove { to_position, .. } = event.payload {
            assert!(to_position <= 5.0, "overshoot to {to_position}");
        }
    }

    let state = engine.get_state();
    assert_eq!(state.elevators[0].position.current_floor, 5);
    assert_eq!(state.elevators[0].position.floor_up_position, 0);
    assert_eq!(state.elevators[0].run_status, RunStatus::Stopped);
}

// ─── Queued target adopted only after the current stop ──────────

#[test]
fn queued_target_waits_for_current_stop() {
    let engine = engine_with(8, 1, 10, 200, &[]);
    engine.go_to_floor(0, 3, false).unwrap();
    engine.step(10).unwrap();

    // Mid-transit: the cab is cruising below floor 3. Queueing floor 7
    // must not divert it.
    let state = engine.get_state();
    assert!(state.elevators[0].position.current_floor < 3);
    assert_eq!(state.elevators[0].run_status, RunStatus::ConstantSpeed);
    engine.go_to_floor(0, 7, false).unwrap();

    engine.step(40).unwrap();
    let state = engine.get_state();
    let stops_at_3 = stop_ticks_at(&state.events, 3);
    let stops_at_7 = stop_ticks_at(&state.events, 7);
    assert_eq!(stops_at_3.len(), 1);
    assert_eq!(stops_at_7.len(), 1);
    assert!(stops_at_3[0] < stops_at_7[0]);
    assert_eq!(state.elevators[0].position.current_floor, 7);
}

// ─── Immediate override skips the intermediate stop ─────────────────

#[test]
fn immediate_override_retargets_in_flight() {
    let engine = engine_with(8, 1, 10, 200, &[]);
    engine.go_to_floor(0, 3, false).unwrap();
    engine.step(10).unwrap();

    engine.go_to_floor(0, 7, true).unwrap();
    engine.step(40).unwrap();

    let state = engine.get_state();
    assert!(stop_ticks_at(&state.events, 3).is_empty());
    assert_eq!(stop_ticks_at(&state.events, 7).len(), 1);
    assert_eq!(state.elevators[0].position.current_floor, 7);
    assert_eq!(state.elevators[0].position.floor_up_position, 0);
}

// ─── Capacity saturation, FIFO boarding ─────────────────────────────

#[test]
fn capacity_saturation_boards_fifo() {
    let traffic = [
        (1, 0, 5, 0),
        (2, 0, 5, 0),
        (3, 0, 5, 0),
        (4, 0, 5, 0),
        (5, 0, 5, 0),
    ];
    let engine = engine_with(6, 1, 2, 500, &traffic);

    engine.step(1).unwrap();
    let state = engine.get_state();
    assert_eq!(state.elevators[0].passengers, vec![1, 2]);
    assert_eq!(
        state.floors[0].up_queue.iter().copied().collect::<Vec<_>>(),
        vec![3, 4, 5]
    );

    // Deliver the first pair, come back, and the next pair boards in
    // arrival order.
    engine.go_to_floor(0, 5, false).unwrap();
    engine.step(40).unwrap();
    engine.go_to_floor(0, 0, false).unwrap();
    engine.step(40).unwrap();

    let state = engine.get_state();
    assert_eq!(state.passengers[&1].status(), PassengerStatus::Completed);
    assert_eq!(state.passengers[&2].status(), PassengerStatus::Completed);
    assert_eq!(state.elevators[0].passengers, vec![3, 4]);
    assert_eq!(
        state.floors[0].up_queue.iter().copied().collect::<Vec<_>>(),
        vec![5]
    );
}

// ─── Turnaround boarding toward a freshly adopted target ────────────

#[test]
fn turnaround_boards_toward_new_target() {
    let engine = engine_with(6, 1, 10, 200, &[(1, 3, 0, 0)]);
    engine.step(1).unwrap();
    engine.go_to_floor(0, 3, false).unwrap();
    engine.step(5).unwrap();
    // Queue the down-leg before the cab reaches floor 3.
    engine.go_to_floor(0, 0, false).unwrap();
    engine.step(40).unwrap();

    let state = engine.get_state();
    let stop_at_3 = stop_ticks_at(&state.events, 3)[0];
    let board_tick = state
        .events
        .iter()
        .find_map(|e| match e.payload {
            EventPayload::PassengerBoard { passenger: 1, .. } => Some(e.tick),
            _ => None,
        })
        .expect("passenger boards");

    // The cab arrives travelling up; the down-bound passenger only
    // boards when the down-leg target is adopted on the next tick.
    assert_eq!(board_tick, stop_at_3 + 1);
    assert_eq!(state.passengers[&1].status(), PassengerStatus::Completed);
}

// ─── Forced completion at the duration limit ────────────────────────

#[test]
fn duration_limit_cancels_unfinished_passengers() {
    let engine = engine_with(5, 1, 4, 10, &[(1, 0, 4, 0), (2, 2, 0, 5)]);
    engine.step(10).unwrap();

    let state = engine.get_state();
    assert_eq!(state.tick, 10);
    for id in [1u64, 2] {
        let passenger = &state.passengers[&id];
        assert_eq!(passenger.status(), PassengerStatus::Cancelled);
        assert_eq!(passenger.dropoff_tick, 10);
    }
    assert!(state.elevators[0].passengers.is_empty());
    assert_eq!(state.floors.iter().map(|f| f.total_waiting()).sum::<usize>(), 0);

    assert_eq!(state.metrics.completed_passengers, 0);
    assert_eq!(state.metrics.total_passengers, 2);
    assert_eq!(state.metrics.completion_rate, 0.0);
}

// ─── Energy accounting ──────────────────────────────────────────────

#[test]
fn energy_accrues_only_while_moving() {
    let file = TrafficFile {
        building: BuildingConfig {
            floors: 4,
            elevators: 2,
            elevator_capacity: 4,
            elevator_energy_rates: Some(vec![2.0, 1.0]),
            scenario: "energy".to_string(),
            duration: 100,
        },
        traffic: Vec::new(),
    };
    let engine = SimulatorEngine::new(vec![TrafficPattern::from_file(file).unwrap()]).unwrap();

    engine.go_to_floor(0, 3, true).unwrap();
    engine.step(20).unwrap();

    let state = engine.get_state();
    // 30 sub-floor units take 16 moving ticks (1 + 14 + 1); cab 1 never moved.
    assert_eq!(state.elevators[0].energy_consumed, 32.0);
    assert_eq!(state.elevators[1].energy_consumed, 0.0);
    assert_eq!(state.metrics.total_energy_consumption, 32.0);
}
