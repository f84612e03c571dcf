//! # liftsim engine
//!
//! A deterministic, tick-driven elevator simulation engine with a
//! pluggable control surface. The engine advances a building of cabs,
//! floors, and passengers in discrete ticks, journals every state
//! change as an ordered event stream, and accepts dispatch commands
//! from an external controller. Transports and dispatch algorithms
//! live outside this crate; the engine only exposes the command/query
//! surface they drive.
//!
//! ## Tick pipeline
//!
//! Every tick runs four phases in strict order, visiting cabs in
//! ascending id within each phase:
//!
//! ```text
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ A: status     │──►│ B: arrivals   │──►│ C: movement   │──►│ D: stops      │
//! │ speed phases, │   │ traffic queue │   │ exact integer │   │ alight, board,│
//! │ target adopt  │   │ hall buttons  │   │ sub-floor math│   │ idle announce │
//! └───────────────┘   └───────────────┘   └───────────────┘   └───────────────┘
//! ```
//!
//! Events are appended in phase order, so two runs with the same
//! building, traffic, and command interleaving produce byte-identical
//! event streams and final state.
//!
//! ## Physics
//!
//! Positions are exact integers on a 10-units-per-floor scale. A cab
//! leaving a stop spends one tick accelerating at 1 unit/tick, cruises
//! at 2 units/tick, and spends one tick decelerating at 1 unit/tick;
//! deceleration entry is chosen so the cab lands exactly on its target
//! and never overshoots.
//!
//! ## Usage
//!
//! ```
//! use liftsim_engine::{SimulatorEngine, TrafficPattern};
//!
//! # fn main() -> Result<(), liftsim_engine::EngineError> {
//! let pattern = TrafficPattern::from_json(
//!     r#"{
//!         "building": {"floors": 4, "elevators": 1, "elevator_capacity": 8,
//!                      "scenario": "demo", "duration": 50},
//!         "traffic": [{"id": 1, "origin": 0, "destination": 3, "tick": 0}]
//!     }"#,
//! )?;
//! let engine = SimulatorEngine::new(vec![pattern])?;
//!
//! engine.step(1)?; // passenger 1 arrives and boards the idle cab
//! engine.go_to_floor(0, 3, false)?;
//! let outcome = engine.step(20)?;
//! assert_eq!(outcome.tick, 21);
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! One engine instance serves many clients: the whole world sits
//! behind a single mutex, every operation holds it for its full
//! duration, and no operation suspends internally. `step(n)` is atomic
//! from the outside and returns exactly the events it produced.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod elevator;
pub mod engine;
pub mod error;
pub mod event;
pub mod floor;
pub mod metrics;
pub mod passenger;
pub mod position;
pub mod sim;
pub mod state;
pub mod traffic;

pub use elevator::{Elevator, RunStatus};
pub use engine::{SimulatorEngine, StepOutcome, TrafficInfo};
pub use error::{EngineError, EngineResult};
pub use event::{EventPayload, SimulationEvent, StopReason};
pub use floor::Floor;
pub use metrics::SimulationMetrics;
pub use passenger::{Passenger, PassengerStatus};
pub use position::{Direction, FloorPosition, UNITS_PER_FLOOR};
pub use sim::Simulation;
pub use state::SimulationState;
pub use traffic::{BuildingConfig, TrafficEntry, TrafficFile, TrafficPattern};

/// Initialize tracing for engine diagnostics
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
