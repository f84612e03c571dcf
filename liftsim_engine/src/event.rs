//! Append-only event journal entries
//!
//! Every entry serializes as `{"tick": N, "type": "<TYPE>", "data": {...}}`
//! with the payload keys fixed per event type; the payload is a closed
//! enum internally and only becomes a string-keyed map at the boundary.

use crate::elevator::RunStatus;
use crate::position::Direction;
use serde::{Deserialize, Serialize};

/// Why a cab came to a stop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The movement phase reached the assigned target exactly
    MoveReached,
}

/// Typed payload of a journal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventPayload {
    /// A passenger pressed the up hall button
    UpButtonPressed {
        /// Floor the button was pressed on
        floor: i32,
        /// Passenger who pressed it
        passenger: u64,
    },
    /// A passenger pressed the down hall button
    DownButtonPressed {
        /// Floor the button was pressed on
        floor: i32,
        /// Passenger who pressed it
        passenger: u64,
    },
    /// A moving cab crossed a floor it will not stop at
    PassingFloor {
        /// Cab that crossed the floor
        elevator: usize,
        /// Floor that was crossed
        floor: i32,
        /// Direction of travel
        direction: Direction,
    },
    /// A cab reached its assigned target and parked
    StoppedAtFloor {
        /// Cab that stopped
        elevator: usize,
        /// Floor it stopped at
        floor: i32,
        /// Why it stopped
        reason: StopReason,
    },
    /// A decelerating cab is about to reach its next stop
    ElevatorApproaching {
        /// Cab approaching the stop
        elevator: usize,
        /// Floor being approached
        floor: i32,
        /// Direction of travel
        direction: Direction,
    },
    /// A cab ended the tick with no assigned or queued target
    Idle {
        /// Cab that went idle
        elevator: usize,
        /// Floor it is parked at
        floor: i32,
    },
    /// A waiting passenger boarded a cab
    PassengerBoard {
        /// Cab that was boarded
        elevator: usize,
        /// Floor the boarding happened on
        floor: i32,
        /// Passenger who boarded
        passenger: u64,
    },
    /// A riding passenger was delivered
    PassengerAlight {
        /// Cab that was left
        elevator: usize,
        /// Floor the passenger alighted on
        floor: i32,
        /// Passenger who alighted
        passenger: u64,
    },
    /// A cab moved during this tick
    ElevatorMove {
        /// Cab that moved
        elevator: usize,
        /// Fractional floor before the move
        from_position: f64,
        /// Fractional floor after the move
        to_position: f64,
        /// Direction of travel
        direction: Direction,
        /// Speed phase the move was made in
        status: RunStatus,
    },
}

/// One tick-stamped journal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationEvent {
    /// Tick the event was produced in
    pub tick: u64,
    /// What happened
    #[serde(flatten)]
    pub payload: EventPayload,
}

impl SimulationEvent {
    /// Stamp a payload with the tick it was produced in
    pub fn new(tick: u64, payload: EventPayload) -> Self {
        Self { tick, payload }
    }
}
