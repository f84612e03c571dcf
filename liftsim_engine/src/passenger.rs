//! Passenger records and lifecycle

use crate::position::Direction;
use crate::traffic::TrafficEntry;
use serde::{Deserialize, Serialize};

/// Derived passenger lifecycle stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassengerStatus {
    /// Arrived at the origin floor, not yet picked up
    Waiting,
    /// Riding a cab
    InElevator,
    /// Delivered at the destination floor
    Completed,
    /// Terminated by forced completion at the scenario duration limit
    Cancelled,
}

/// One passenger travelling from `origin` to `destination`
///
/// `pickup_tick` and `dropoff_tick` use 0 as a "not yet" sentinel; the
/// first tick of a simulation is 1, so 0 can never be a real stamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passenger {
    /// Stable identifier from the traffic entry
    pub id: u64,
    /// Floor the passenger appeared on
    pub origin: i32,
    /// Floor the passenger wants to reach
    pub destination: i32,
    /// Tick the passenger materialized in the building
    pub arrive_tick: u64,
    /// Tick the passenger boarded a cab (0 = not yet)
    pub pickup_tick: u64,
    /// Tick the passenger was delivered (0 = not yet)
    pub dropoff_tick: u64,
    /// Cab the passenger boarded, kept after delivery
    pub elevator_id: Option<usize>,
    /// Set only by forced completion at the duration limit
    pub cancelled: bool,
}

impl Passenger {
    /// Materialize a passenger from a traffic entry at `arrive_tick`
    pub fn from_entry(entry: &TrafficEntry, arrive_tick: u64) -> Self {
        Self {
            id: entry.id,
            origin: entry.origin,
            destination: entry.destination,
            arrive_tick,
            pickup_tick: 0,
            dropoff_tick: 0,
            elevator_id: None,
            cancelled: false,
        }
    }

    /// Current lifecycle stage, derived from the tick stamps
    pub fn status(&self) -> PassengerStatus {
        if self.cancelled {
            PassengerStatus::Cancelled
        } else if self.dropoff_tick > 0 {
            PassengerStatus::Completed
        } else if self.pickup_tick > 0 {
            PassengerStatus::InElevator
        } else {
            PassengerStatus::Waiting
        }
    }

    /// Hall-call direction: up iff the destination is above the origin
    pub fn travel_direction(&self) -> Direction {
        if self.destination > self.origin {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    /// Ticks spent waiting on the origin floor; `None` until picked up
    pub fn floor_wait_time(&self) -> Option<u64> {
        (self.pickup_tick > 0).then(|| self.pickup_tick - self.arrive_tick)
    }

    /// Ticks from appearance to delivery; `None` unless completed
    pub fn arrival_wait_time(&self) -> Option<u64> {
        (self.status() == PassengerStatus::Completed).then(|| self.dropoff_tick - self.arrive_tick)
    }
}
