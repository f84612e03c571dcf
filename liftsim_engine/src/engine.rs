//! Thread-safe command/query surface
//!
//! One engine instance serves many clients. Every public operation
//! acquires the single engine mutex for its full duration, so
//! concurrent callers observe a serializable execution and every
//! snapshot is coherent with the cross-tick invariants. The engine
//! holds no I/O and never suspends internally; callers block only on
//! the mutex (and on the tick count they asked for).

use crate::error::{EngineError, EngineResult};
use crate::event::SimulationEvent;
use crate::sim::Simulation;
use crate::state::SimulationState;
use crate::traffic::TrafficPattern;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Result of a `step` call: the new tick and the events it produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    /// Tick counter after the last executed tick
    pub tick: u64,
    /// Events produced during this call, in emission order
    pub events: Vec<SimulationEvent>,
}

/// Where the engine stands in its scenario rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficInfo {
    /// Index of the scenario currently loaded
    pub current_index: usize,
    /// Number of scenarios the engine was built with
    pub total_files: usize,
    /// Max tick the current scenario is expected to run
    pub max_tick: u64,
}

struct EngineCore {
    patterns: Vec<TrafficPattern>,
    current_index: usize,
    sim: Simulation,
}

/// The simulation engine behind its single mutex
pub struct SimulatorEngine {
    inner: Mutex<EngineCore>,
}

impl SimulatorEngine {
    /// Build an engine over a non-empty scenario rotation; the first
    /// scenario is loaded immediately
    pub fn new(patterns: Vec<TrafficPattern>) -> EngineResult<Self> {
        let first = patterns
            .first()
            .ok_or_else(|| EngineError::invalid("engine needs at least one traffic scenario"))?;
        let sim = Simulation::new(first);
        info!(
            scenario = %first.name,
            scenarios = patterns.len(),
            "engine initialized"
        );
        Ok(Self {
            inner: Mutex::new(EngineCore {
                patterns,
                current_index: 0,
                sim,
            }),
        })
    }

    /// Build an engine from scenario files on disk, in rotation order
    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> EngineResult<Self> {
        let patterns = paths
            .iter()
            .map(TrafficPattern::from_path)
            .collect::<EngineResult<Vec<_>>>()?;
        Self::new(patterns)
    }

    /// Coherent snapshot of the world, metrics refreshed
    pub fn get_state(&self) -> SimulationState {
        let mut core = self.inner.lock();
        core.sim.state_mut().refresh_metrics();
        core.sim.state().clone()
    }

    /// Advance the simulation by `ticks` ticks atomically
    ///
    /// Returns only the events produced during this call. Rejects
    /// `ticks == 0`; an invariant violation mid-batch aborts the call
    /// with [`EngineError::Internal`] instead of returning partial
    /// output.
    pub fn step(&self, ticks: u64) -> EngineResult<StepOutcome> {
        if ticks < 1 {
            return Err(EngineError::invalid("step requires ticks >= 1"));
        }
        let mut core = self.inner.lock();
        let events_start = core.sim.state().events.len();
        for _ in 0..ticks {
            core.sim.step_one()?;
        }
        core.sim.state_mut().refresh_metrics();
        let state = core.sim.state();
        let outcome = StepOutcome {
            tick: state.tick,
            events: state.events[events_start..].to_vec(),
        };
        debug!(
            tick = outcome.tick,
            events = outcome.events.len(),
            "step complete"
        );
        Ok(outcome)
    }

    /// Dispatch a cab; queued by default, or an in-flight retarget when
    /// `immediate` is set
    pub fn go_to_floor(
        &self,
        elevator_id: usize,
        floor: i32,
        immediate: bool,
    ) -> EngineResult<()> {
        let mut core = self.inner.lock();
        core.sim.go_to_floor(elevator_id, floor, immediate)?;
        info!(elevator = elevator_id, floor, immediate, "dispatch accepted");
        Ok(())
    }

    /// Rebuild the world from the currently loaded scenario
    pub fn reset(&self) -> EngineResult<()> {
        let mut core = self.inner.lock();
        let pattern = core.patterns[core.current_index].clone();
        core.sim = Simulation::new(&pattern);
        info!(scenario = %pattern.name, "simulation reset");
        Ok(())
    }

    /// Advance to the next scenario in the rotation
    ///
    /// With `full_reset` the whole world is rebuilt from the new
    /// scenario's building; otherwise only the traffic queue is swapped
    /// and the tick counter keeps running.
    pub fn next_traffic_round(&self, full_reset: bool) -> EngineResult<()> {
        let mut core = self.inner.lock();
        let next_index = core.current_index + 1;
        let pattern = core
            .patterns
            .get(next_index)
            .ok_or(EngineError::NoMoreScenarios {
                total: core.patterns.len(),
            })?
            .clone();
        core.current_index = next_index;
        if full_reset {
            core.sim = Simulation::new(&pattern);
        } else {
            core.sim.replace_traffic(&pattern);
        }
        info!(
            scenario = %pattern.name,
            index = next_index,
            full_reset,
            "traffic round advanced"
        );
        Ok(())
    }

    /// Position of the engine in its scenario rotation
    pub fn traffic_info(&self) -> TrafficInfo {
        let core = self.inner.lock();
        TrafficInfo {
            current_index: core.current_index,
            total_files: core.patterns.len(),
            max_tick: core.patterns[core.current_index].max_tick(),
        }
    }
}
