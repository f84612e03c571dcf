//! Exact sub-floor position arithmetic
//!
//! Positions are integers on a 10-units-per-floor scale. All state
//! transitions stay in integer space; the only fractional value is the
//! presentational [`FloorPosition::current_floor_float`].

use serde::{Deserialize, Serialize};

/// Sub-floor resolution: one floor spans exactly this many units
pub const UNITS_PER_FLOOR: i32 = 10;

/// Vertical direction of travel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Travelling toward a higher floor
    Up,
    /// Travelling toward a lower floor
    Down,
    /// Not travelling
    Stopped,
}

/// Exact cab position plus the floor it is headed to
///
/// Invariant: `0 <= floor_up_position <= 9` at the end of every
/// pipeline phase; [`FloorPosition::advance`] restores it after each move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorPosition {
    /// Integer floor the cab is at or just above
    pub current_floor: i32,
    /// Tenths of a floor above `current_floor`, in `[0, 9]`
    pub floor_up_position: i32,
    /// Floor the cab is currently assigned to reach
    pub target_floor: i32,
}

impl FloorPosition {
    /// A cab parked exactly at `floor`, targeting it
    pub fn at_floor(floor: i32) -> Self {
        Self {
            current_floor: floor,
            floor_up_position: 0,
            target_floor: floor,
        }
    }

    /// Move by `delta` sub-floor units (negative is down) and normalize
    pub fn advance(&mut self, delta: i32) {
        self.floor_up_position += delta;
        while self.floor_up_position >= UNITS_PER_FLOOR {
            self.current_floor += 1;
            self.floor_up_position -= UNITS_PER_FLOOR;
        }
        while self.floor_up_position < 0 {
            self.current_floor -= 1;
            self.floor_up_position += UNITS_PER_FLOOR;
        }
    }

    /// Remaining distance to `target_floor` in sub-floor units, 0 at target
    pub fn distance_to_target(&self) -> i32 {
        match self.target_direction() {
            Direction::Up => {
                (self.target_floor - self.current_floor) * UNITS_PER_FLOOR - self.floor_up_position
            }
            Direction::Down => {
                (self.current_floor - self.target_floor) * UNITS_PER_FLOOR + self.floor_up_position
            }
            Direction::Stopped => 0,
        }
    }

    /// Whether the cab sits exactly at its target landing
    pub fn is_at_target(&self) -> bool {
        self.current_floor == self.target_floor && self.floor_up_position == 0
    }

    /// Direction toward `target_floor`
    ///
    /// A cab at the target floor number but above the landing
    /// (`floor_up_position > 0`) still has to descend.
    pub fn target_direction(&self) -> Direction {
        if self.target_floor > self.current_floor {
            Direction::Up
        } else if self.target_floor < self.current_floor {
            Direction::Down
        } else if self.floor_up_position == 0 {
            Direction::Stopped
        } else {
            Direction::Down
        }
    }

    /// Fractional floor for reporting; never used in state transitions
    pub fn current_floor_float(&self) -> f64 {
        f64::from(self.current_floor) + f64::from(self.floor_up_position) / f64::from(UNITS_PER_FLOOR)
    }
}
