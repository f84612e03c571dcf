//! Floor call queues

use crate::position::Direction;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One building floor with its FIFO hall-call queues
///
/// A waiting passenger id appears in exactly one of the two queues
/// until boarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Floor {
    /// Floor index, 0-based from the ground
    pub floor_number: i32,
    /// Passengers waiting to travel upward, in arrival order
    pub up_queue: VecDeque<u64>,
    /// Passengers waiting to travel downward, in arrival order
    pub down_queue: VecDeque<u64>,
}

impl Floor {
    /// An empty floor
    pub fn new(floor_number: i32) -> Self {
        Self {
            floor_number,
            up_queue: VecDeque::new(),
            down_queue: VecDeque::new(),
        }
    }

    /// Append a waiting passenger to the queue for `direction`
    ///
    /// `Direction::Stopped` is not a hall-call direction and is ignored.
    pub fn enqueue(&mut self, passenger_id: u64, direction: Direction) {
        match direction {
            Direction::Up => self.up_queue.push_back(passenger_id),
            Direction::Down => self.down_queue.push_back(passenger_id),
            Direction::Stopped => {}
        }
    }

    /// Remove a passenger id from whichever queue holds it
    pub fn remove(&mut self, passenger_id: u64) {
        self.up_queue.retain(|id| *id != passenger_id);
        self.down_queue.retain(|id| *id != passenger_id);
    }

    /// Number of passengers waiting on this floor, both directions
    pub fn total_waiting(&self) -> usize {
        self.up_queue.len() + self.down_queue.len()
    }
}
