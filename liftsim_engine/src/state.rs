//! Complete world state
//!
//! The `SimulationState` is the only shared resource in the engine. It is
//! constructed from a building configuration, mutated only by the tick
//! pipeline and `go_to_floor`, and observed through cloned snapshots.

use crate::elevator::Elevator;
use crate::error::{EngineError, EngineResult};
use crate::event::SimulationEvent;
use crate::floor::Floor;
use crate::metrics::SimulationMetrics;
use crate::passenger::{Passenger, PassengerStatus};
use crate::position::Direction;
use crate::traffic::BuildingConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The whole simulated world at one tick boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    /// Current tick; 0 before the first step
    pub tick: u64,
    /// Cabs, indexed by id
    pub elevators: Vec<Elevator>,
    /// Floors, indexed by floor number
    pub floors: Vec<Floor>,
    /// Every passenger materialized so far
    pub passengers: BTreeMap<u64, Passenger>,
    /// Append-only journal since construction
    pub events: Vec<SimulationEvent>,
    /// KPIs as of the last refresh
    pub metrics: SimulationMetrics,
}

impl SimulationState {
    /// A fresh world: all cabs parked at floor 0, no passengers
    pub fn new(config: &BuildingConfig) -> Self {
        let elevators = (0..config.elevators)
            .map(|id| Elevator::new(id, config.elevator_capacity, config.energy_rate(id)))
            .collect();
        let floors = (0..config.floors).map(Floor::new).collect();
        Self {
            tick: 0,
            elevators,
            floors,
            passengers: BTreeMap::new(),
            events: Vec::new(),
            metrics: SimulationMetrics::default(),
        }
    }

    /// Recompute `metrics` from the current records
    pub fn refresh_metrics(&mut self) {
        self.metrics = SimulationMetrics::compute(&self.passengers, &self.elevators);
    }

    /// Number of floors in the building
    pub fn floors_count(&self) -> i32 {
        self.floors.len() as i32
    }

    /// Verify the cross-tick invariants; an error here is fatal to the
    /// current `step` call
    pub fn check_invariants(&self) -> EngineResult<()> {
        let floors_count = self.floors_count();

        let mut waiting = 0usize;
        let mut riding = 0usize;
        let mut terminal = 0usize;
        for passenger in self.passengers.values() {
            match passenger.status() {
                PassengerStatus::Waiting => {
                    waiting += 1;
                    let floor = self
                        .floors
                        .get(passenger.origin as usize)
                        .ok_or_else(|| invariant(format!(
                            "waiting passenger {} has origin {} outside the building",
                            passenger.id, passenger.origin
                        )))?;
                    let (expected, other) = match passenger.travel_direction() {
                        Direction::Down => (&floor.down_queue, &floor.up_queue),
                        _ => (&floor.up_queue, &floor.down_queue),
                    };
                    let appearances =
                        expected.iter().filter(|id| **id == passenger.id).count();
                    if appearances != 1 || other.contains(&passenger.id) {
                        return Err(invariant(format!(
                            "waiting passenger {} is not queued exactly once in its direction on floor {}",
                            passenger.id, passenger.origin
                        )));
                    }
                }
                PassengerStatus::InElevator => {
                    riding += 1;
                    let cab = passenger
                        .elevator_id
                        .and_then(|id| self.elevators.get(id))
                        .ok_or_else(|| invariant(format!(
                            "riding passenger {} has no valid elevator id",
                            passenger.id
                        )))?;
                    let appearances =
                        cab.passengers.iter().filter(|id| **id == passenger.id).count();
                    if appearances != 1 {
                        return Err(invariant(format!(
                            "riding passenger {} appears {} times in elevator {}",
                            passenger.id, appearances, cab.id
                        )));
                    }
                }
                PassengerStatus::Completed | PassengerStatus::Cancelled => terminal += 1,
            }
        }

        let in_cabs: usize = self.elevators.iter().map(|e| e.passengers.len()).sum();
        if in_cabs != riding || waiting + riding + terminal != self.passengers.len() {
            return Err(invariant(format!(
                "conservation broken: {} in cabs, {} waiting, {} terminal, {} total",
                in_cabs,
                waiting,
                terminal,
                self.passengers.len()
            )));
        }

        for cab in &self.elevators {
            if cab.passengers.len() > cab.max_capacity {
                return Err(invariant(format!(
                    "elevator {} holds {} passengers over capacity {}",
                    cab.id,
                    cab.passengers.len(),
                    cab.max_capacity
                )));
            }
            let pos = cab.position;
            if pos.current_floor < 0 || pos.current_floor >= floors_count {
                return Err(invariant(format!(
                    "elevator {} at floor {} outside 0..{}",
                    cab.id, pos.current_floor, floors_count
                )));
            }
            if pos.target_floor < 0 || pos.target_floor >= floors_count {
                return Err(invariant(format!(
                    "elevator {} targets floor {} outside 0..{}",
                    cab.id, pos.target_floor, floors_count
                )));
            }
            if !(0..10).contains(&pos.floor_up_position) {
                return Err(invariant(format!(
                    "elevator {} has denormalized sub-floor position {}",
                    cab.id, pos.floor_up_position
                )));
            }
        }

        Ok(())
    }
}

fn invariant(reason: String) -> EngineError {
    EngineError::internal(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BuildingConfig {
        BuildingConfig {
            floors: 5,
            elevators: 2,
            elevator_capacity: 3,
            elevator_energy_rates: Some(vec![2.0]),
            scenario: "unit".to_string(),
            duration: 50,
        }
    }

    #[test]
    fn fresh_state_is_coherent() {
        let state = SimulationState::new(&config());
        assert_eq!(state.tick, 0);
        assert_eq!(state.elevators.len(), 2);
        assert_eq!(state.floors.len(), 5);
        assert_eq!(state.elevators[0].energy_rate, 2.0);
        assert_eq!(state.elevators[1].energy_rate, 1.0);
        state.check_invariants().unwrap();
    }

    #[test]
    fn capacity_violation_is_detected() {
        let mut state = SimulationState::new(&config());
        for id in 0..4 {
            state.elevators[0].admit(id, 1);
        }
        assert!(matches!(
            state.check_invariants(),
            Err(EngineError::Internal { .. })
        ));
    }
}
