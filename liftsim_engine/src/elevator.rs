//! Per-elevator state and speed-phase machine
//!
//! `RunStatus` names the *speed phase*, not the vertical direction:
//! `StartUp` is the single acceleration tick on leaving a stop and
//! `StartDown` the single deceleration tick before stopping. Vertical
//! direction is derived from the position alone.

use crate::position::{Direction, FloorPosition};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Speed phase of a cab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Parked; doors may be cycling
    Stopped,
    /// Acceleration phase, one tick at half speed
    StartUp,
    /// Cruise phase
    ConstantSpeed,
    /// Deceleration phase, one tick at half speed
    StartDown,
}

impl RunStatus {
    /// Sub-floor units travelled per tick in this speed phase
    pub fn speed(&self) -> i32 {
        match self {
            RunStatus::Stopped => 0,
            RunStatus::StartUp => 1,
            RunStatus::ConstantSpeed => 2,
            RunStatus::StartDown => 1,
        }
    }
}

/// One elevator cab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Elevator {
    /// Cab index, assigned in ascending order at construction
    pub id: usize,
    /// Exact position and assigned target
    pub position: FloorPosition,
    /// Queued target, adopted when the current one is reached
    pub next_target_floor: Option<i32>,
    /// Riding passenger ids, in boarding order
    pub passengers: Vec<u64>,
    /// Maximum riders the cab admits
    pub max_capacity: usize,
    /// Current speed phase
    pub run_status: RunStatus,
    /// Direction the cab moved during the previous tick
    pub last_tick_direction: Direction,
    /// Destination per riding passenger, for car indicator queries
    pub passenger_destinations: BTreeMap<u64, i32>,
    /// Energy units consumed so far
    pub energy_consumed: f64,
    /// Energy units drawn per moving tick
    pub energy_rate: f64,
    /// Latch so an idle period is journaled exactly once
    #[serde(skip)]
    idle_notified: bool,
}

impl Elevator {
    /// A parked cab at floor 0
    pub fn new(id: usize, max_capacity: usize, energy_rate: f64) -> Self {
        Self {
            id,
            position: FloorPosition::at_floor(0),
            next_target_floor: None,
            passengers: Vec::new(),
            max_capacity,
            run_status: RunStatus::Stopped,
            last_tick_direction: Direction::Stopped,
            passenger_destinations: BTreeMap::new(),
            energy_consumed: 0.0,
            energy_rate,
            idle_notified: false,
        }
    }

    /// Direction toward the assigned target
    pub fn target_floor_direction(&self) -> Direction {
        self.position.target_direction()
    }

    /// Parked with no assigned or queued target
    pub fn is_idle(&self) -> bool {
        self.run_status == RunStatus::Stopped
            && self.next_target_floor.is_none()
            && self.target_floor_direction() == Direction::Stopped
    }

    /// At capacity
    pub fn is_full(&self) -> bool {
        self.passengers.len() >= self.max_capacity
    }

    /// Occupancy in `[0.0, 1.0]`
    pub fn load_factor(&self) -> f64 {
        if self.max_capacity == 0 {
            0.0
        } else {
            self.passengers.len() as f64 / self.max_capacity as f64
        }
    }

    /// Distinct destinations of riding passengers, ascending
    pub fn pressed_floors(&self) -> Vec<i32> {
        let mut floors: Vec<i32> = self.passenger_destinations.values().copied().collect();
        floors.sort_unstable();
        floors.dedup();
        floors
    }

    /// Assign a target immediately, keeping the current speed phase
    pub fn set_target(&mut self, floor: i32) {
        self.position.target_floor = floor;
        self.idle_notified = false;
    }

    /// Queue a target to adopt once the current one is reached
    pub fn queue_target(&mut self, floor: i32) {
        self.next_target_floor = Some(floor);
        self.idle_notified = false;
    }

    /// Adopt the queued target, if any; returns the adopted floor
    pub fn adopt_next_target(&mut self) -> Option<i32> {
        let floor = self.next_target_floor.take()?;
        self.position.target_floor = floor;
        self.idle_notified = false;
        Some(floor)
    }

    /// Take a passenger aboard
    pub fn admit(&mut self, passenger_id: u64, destination: i32) {
        self.passengers.push(passenger_id);
        self.passenger_destinations.insert(passenger_id, destination);
    }

    /// Let a passenger off
    pub fn discharge(&mut self, passenger_id: u64) {
        self.passengers.retain(|id| *id != passenger_id);
        self.passenger_destinations.remove(&passenger_id);
    }

    /// Whether this idle period still has to be journaled
    pub fn idle_pending_announcement(&self) -> bool {
        self.is_idle() && !self.idle_notified
    }

    /// Mark the current idle period as journaled
    pub fn mark_idle_announced(&mut self) {
        self.idle_notified = true;
    }
}
