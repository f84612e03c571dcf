//! The four-phase tick pipeline
//!
//! Each tick advances the world in strict phase order: status update,
//! arrivals, movement, stops. Events are appended in that order, and
//! within a phase cabs are visited in ascending id, so a run is
//! reproducible bit-for-bit from the same traffic and command sequence.

use crate::elevator::RunStatus;
use crate::error::{EngineError, EngineResult};
use crate::event::{EventPayload, SimulationEvent, StopReason};
use crate::passenger::{Passenger, PassengerStatus};
use crate::position::Direction;
use crate::state::SimulationState;
use crate::traffic::{BuildingConfig, TrafficEntry, TrafficPattern};
use std::collections::VecDeque;
use tracing::{debug, warn};

/// One live scenario run: the world plus its pending traffic
#[derive(Debug, Clone)]
pub struct Simulation {
    state: SimulationState,
    traffic_queue: VecDeque<TrafficEntry>,
    config: BuildingConfig,
    max_duration: u64,
}

impl Simulation {
    /// Start a scenario from its pattern: fresh world, full traffic queue
    pub fn new(pattern: &TrafficPattern) -> Self {
        Self {
            state: SimulationState::new(&pattern.building),
            traffic_queue: pattern.entries.iter().copied().collect(),
            config: pattern.building.clone(),
            max_duration: pattern.building.duration,
        }
    }

    /// The current world, for snapshots and assertions
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// The current world, mutable; used by the engine for metric refreshes
    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    /// Building the scenario runs in
    pub fn config(&self) -> &BuildingConfig {
        &self.config
    }

    /// Arrivals not yet materialized
    pub fn pending_traffic(&self) -> usize {
        self.traffic_queue.len()
    }

    /// Swap in the next scenario's traffic, keeping the world as-is
    pub fn replace_traffic(&mut self, pattern: &TrafficPattern) {
        self.traffic_queue = pattern.entries.iter().copied().collect();
        self.max_duration = pattern.building.duration;
    }

    /// Dispatch a cab to `floor`
    ///
    /// Queued targets (`immediate == false`) overwrite any previously
    /// queued one and are adopted once the current target is reached.
    /// Immediate targets replace the assigned target at once; a moving
    /// cab keeps its speed phase and re-evaluates distance on the next
    /// movement step.
    pub fn go_to_floor(
        &mut self,
        elevator_id: usize,
        floor: i32,
        immediate: bool,
    ) -> EngineResult<()> {
        if floor < 0 || floor >= self.config.floors {
            return Err(EngineError::invalid(format!(
                "floor {} outside 0..{}",
                floor, self.config.floors
            )));
        }
        let cab = self
            .state
            .elevators
            .get_mut(elevator_id)
            .ok_or_else(|| EngineError::NotFound {
                entity: format!("elevator {elevator_id}"),
            })?;
        if immediate {
            cab.set_target(floor);
        } else {
            cab.queue_target(floor);
        }
        Ok(())
    }

    /// Advance the world by one tick through phases A-D
    pub fn step_one(&mut self) -> EngineResult<()> {
        self.state.tick += 1;
        let tick = self.state.tick;
        let mut moved = vec![Direction::Stopped; self.state.elevators.len()];

        self.phase_update_status(tick)?;
        self.phase_arrivals(tick);
        self.phase_movement(tick, &mut moved);
        self.phase_stops(tick, &moved)?;

        if tick >= self.max_duration {
            self.force_complete(tick);
        }

        self.state.check_invariants()?;
        Ok(())
    }

    /// Phase A: speed-phase transitions and queued-target adoption
    fn phase_update_status(&mut self, tick: u64) -> EngineResult<()> {
        for idx in 0..self.state.elevators.len() {
            if self.state.elevators[idx].target_floor_direction() == Direction::Stopped {
                match self.state.elevators[idx].adopt_next_target() {
                    Some(floor) => {
                        debug!(elevator = idx, floor, "adopted queued target");
                        // Idle-turnaround boarding: riders on this floor whose
                        // travel direction matches the fresh target come aboard
                        // before the cab departs.
                        let direction = self.state.elevators[idx].target_floor_direction();
                        if direction != Direction::Stopped {
                            self.board_matching(idx, direction, tick)?;
                        }
                    }
                    None => {
                        // An at-target cab can never stay in a moving speed phase.
                        let cab = &mut self.state.elevators[idx];
                        if cab.run_status != RunStatus::Stopped {
                            cab.run_status = RunStatus::Stopped;
                        }
                        continue;
                    }
                }
            }

            let cab = &mut self.state.elevators[idx];
            if cab.target_floor_direction() != Direction::Stopped {
                match cab.run_status {
                    RunStatus::Stopped => cab.run_status = RunStatus::StartUp,
                    RunStatus::StartUp => cab.run_status = RunStatus::ConstantSpeed,
                    RunStatus::ConstantSpeed | RunStatus::StartDown => {}
                }
            }
        }
        Ok(())
    }

    /// Phase B: materialize due traffic entries and press hall buttons
    fn phase_arrivals(&mut self, tick: u64) {
        while self.traffic_queue.front().is_some_and(|e| e.tick <= tick) {
            let Some(entry) = self.traffic_queue.pop_front() else {
                break;
            };
            if self.state.passengers.contains_key(&entry.id) {
                // Can happen when a traffic round is swapped in without a
                // full reset and reuses ids; overwriting a live record
                // would corrupt the queues.
                warn!(passenger = entry.id, "duplicate passenger id, entry skipped");
                continue;
            }
            let floors = self.state.floors_count();
            if [entry.origin, entry.destination]
                .iter()
                .any(|f| *f < 0 || *f >= floors)
            {
                // Traffic swapped in from a round with a taller building.
                warn!(passenger = entry.id, "entry references a floor outside the building, skipped");
                continue;
            }
            let passenger = Passenger::from_entry(&entry, tick);
            let direction = passenger.travel_direction();
            self.state.floors[entry.origin as usize].enqueue(entry.id, direction);
            self.state.passengers.insert(entry.id, passenger);
            let payload = match direction {
                Direction::Down => EventPayload::DownButtonPressed {
                    floor: entry.origin,
                    passenger: entry.id,
                },
                _ => EventPayload::UpButtonPressed {
                    floor: entry.origin,
                    passenger: entry.id,
                },
            };
            self.state.events.push(SimulationEvent::new(tick, payload));
        }
    }

    /// Phase C: move every cab that has somewhere to go
    fn phase_movement(&mut self, tick: u64, moved: &mut [Direction]) {
        let SimulationState {
            elevators, events, ..
        } = &mut self.state;

        for cab in elevators.iter_mut() {
            let direction = cab.target_floor_direction();
            if direction == Direction::Stopped {
                continue;
            }

            let status = cab.run_status;
            // Clamp to the remaining distance so a retargeted cab cruising
            // one unit short of its landing cannot pass it.
            let speed = status.speed().min(cab.position.distance_to_target());
            let from = cab.position.current_floor_float();
            let old_floor = cab.position.current_floor;
            cab.position.advance(match direction {
                Direction::Up => speed,
                _ => -speed,
            });
            events.push(SimulationEvent::new(
                tick,
                EventPayload::ElevatorMove {
                    elevator: cab.id,
                    from_position: from,
                    to_position: cab.position.current_floor_float(),
                    direction,
                    status,
                },
            ));

            // Deceleration entry: takes effect on the next movement step.
            if cab.run_status == RunStatus::ConstantSpeed && cab.position.distance_to_target() == 1
            {
                cab.run_status = RunStatus::StartDown;
            }

            let new_floor = cab.position.current_floor;
            if new_floor != old_floor && new_floor != cab.position.target_floor {
                events.push(SimulationEvent::new(
                    tick,
                    EventPayload::PassingFloor {
                        elevator: cab.id,
                        floor: new_floor,
                        direction,
                    },
                ));
            }

            if cab.run_status == RunStatus::StartDown
                && cab.position.distance_to_target() <= 1
                && !cab.position.is_at_target()
            {
                events.push(SimulationEvent::new(
                    tick,
                    EventPayload::ElevatorApproaching {
                        elevator: cab.id,
                        floor: cab.position.target_floor,
                        direction,
                    },
                ));
            }

            if cab.position.is_at_target() {
                cab.run_status = RunStatus::Stopped;
                events.push(SimulationEvent::new(
                    tick,
                    EventPayload::StoppedAtFloor {
                        elevator: cab.id,
                        floor: new_floor,
                        reason: StopReason::MoveReached,
                    },
                ));
            }

            cab.energy_consumed += cab.energy_rate;
            moved[cab.id] = direction;
        }
    }

    /// Phase D: alight, board, announce idleness, refresh directions
    fn phase_stops(&mut self, tick: u64, moved: &[Direction]) -> EngineResult<()> {
        for idx in 0..self.state.elevators.len() {
            if self.state.elevators[idx].run_status != RunStatus::Stopped {
                continue;
            }

            self.alight_at_floor(idx, tick)?;

            let cab = &self.state.elevators[idx];
            if cab.is_idle() {
                self.board_matching(idx, Direction::Up, tick)?;
                self.board_matching(idx, Direction::Down, tick)?;
            } else {
                let direction = cab.last_tick_direction;
                self.board_matching(idx, direction, tick)?;
            }

            let cab = &mut self.state.elevators[idx];
            if cab.idle_pending_announcement() {
                let floor = cab.position.current_floor;
                cab.mark_idle_announced();
                self.state.events.push(SimulationEvent::new(
                    tick,
                    EventPayload::Idle {
                        elevator: idx,
                        floor,
                    },
                ));
            }
        }

        for (cab, direction) in self.state.elevators.iter_mut().zip(moved) {
            cab.last_tick_direction = *direction;
        }
        Ok(())
    }

    /// Let off every rider whose destination is the cab's current floor
    fn alight_at_floor(&mut self, idx: usize, tick: u64) -> EngineResult<()> {
        let cab = &self.state.elevators[idx];
        let floor = cab.position.current_floor;
        let leaving: Vec<u64> = cab
            .passengers
            .iter()
            .copied()
            .filter(|id| cab.passenger_destinations.get(id) == Some(&floor))
            .collect();

        for id in leaving {
            self.state.elevators[idx].discharge(id);
            let record = self.state.passengers.get_mut(&id).ok_or_else(|| {
                EngineError::internal(format!("alighting passenger {id} has no record"))
            })?;
            record.dropoff_tick = tick;
            self.state.events.push(SimulationEvent::new(
                tick,
                EventPayload::PassengerAlight {
                    elevator: idx,
                    floor,
                    passenger: id,
                },
            ));
        }
        Ok(())
    }

    /// Board FIFO from the queue for `direction` while capacity allows
    fn board_matching(&mut self, idx: usize, direction: Direction, tick: u64) -> EngineResult<()> {
        let SimulationState {
            elevators,
            floors,
            passengers,
            events,
            ..
        } = &mut self.state;
        let cab = &mut elevators[idx];
        let floor_number = cab.position.current_floor;
        let floor = floors.get_mut(floor_number as usize).ok_or_else(|| {
            EngineError::internal(format!("elevator {idx} parked at unknown floor {floor_number}"))
        })?;
        let queue = match direction {
            Direction::Up => &mut floor.up_queue,
            Direction::Down => &mut floor.down_queue,
            Direction::Stopped => return Ok(()),
        };

        while !cab.is_full() {
            let Some(id) = queue.pop_front() else {
                break;
            };
            let record = passengers.get_mut(&id).ok_or_else(|| {
                EngineError::internal(format!("queued passenger {id} has no record"))
            })?;
            record.pickup_tick = tick;
            record.elevator_id = Some(cab.id);
            cab.admit(id, record.destination);
            events.push(SimulationEvent::new(
                tick,
                EventPayload::PassengerBoard {
                    elevator: cab.id,
                    floor: floor_number,
                    passenger: id,
                },
            ));
        }
        Ok(())
    }

    /// Duration limit reached: cancel everyone still waiting or riding
    fn force_complete(&mut self, tick: u64) {
        let mut cancelled = 0usize;
        for passenger in self.state.passengers.values_mut() {
            if matches!(
                passenger.status(),
                PassengerStatus::Waiting | PassengerStatus::InElevator
            ) {
                passenger.cancelled = true;
                passenger.dropoff_tick = tick;
                cancelled += 1;
            }
        }
        if cancelled > 0 {
            for floor in &mut self.state.floors {
                floor.up_queue.clear();
                floor.down_queue.clear();
            }
            for cab in &mut self.state.elevators {
                cab.passengers.clear();
                cab.passenger_destinations.clear();
            }
            warn!(
                tick,
                cancelled, "scenario duration reached, cancelling unfinished passengers"
            );
        }
    }
}
