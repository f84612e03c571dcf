//! Traffic scenarios: building configuration plus scheduled arrivals
//!
//! A scenario file is JSON with a `building` object and a `traffic`
//! array. Entries need not be pre-sorted; loading applies a stable sort
//! by `(tick, id)` so arrival order is reproducible.

use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One scheduled passenger arrival
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficEntry {
    /// Passenger id, unique within a scenario
    pub id: u64,
    /// Floor the passenger appears on
    pub origin: i32,
    /// Floor the passenger wants to reach
    pub destination: i32,
    /// Tick the passenger is scheduled to appear
    pub tick: u64,
}

/// Building geometry and cab parameters of a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingConfig {
    /// Number of floors, indexed `0..floors`
    pub floors: i32,
    /// Number of cabs
    pub elevators: usize,
    /// Rider capacity per cab
    pub elevator_capacity: usize,
    /// Energy units per moving tick, per cab; missing entries default to 1.0
    #[serde(default)]
    pub elevator_energy_rates: Option<Vec<f64>>,
    /// Scenario name
    pub scenario: String,
    /// Max tick before unfinished passengers are force-completed
    pub duration: u64,
}

impl BuildingConfig {
    /// Energy rate for one cab, defaulting to 1.0
    pub fn energy_rate(&self, elevator_id: usize) -> f64 {
        self.elevator_energy_rates
            .as_ref()
            .and_then(|rates| rates.get(elevator_id))
            .copied()
            .unwrap_or(1.0)
    }

    /// Reject geometrically impossible buildings
    pub fn validate(&self) -> EngineResult<()> {
        if self.floors < 2 {
            return Err(EngineError::invalid(format!(
                "building needs at least 2 floors, got {}",
                self.floors
            )));
        }
        if self.elevators == 0 {
            return Err(EngineError::invalid("building needs at least one elevator"));
        }
        if self.elevator_capacity == 0 {
            return Err(EngineError::invalid("elevator capacity must be positive"));
        }
        Ok(())
    }
}

/// On-disk scenario file shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficFile {
    /// Building the scenario runs in
    pub building: BuildingConfig,
    /// Scheduled arrivals, in any order
    pub traffic: Vec<TrafficEntry>,
}

/// A loaded scenario: building plus arrivals sorted for replay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficPattern {
    /// Scenario name, from the building configuration
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Building the scenario runs in
    pub building: BuildingConfig,
    /// Arrivals, stable-sorted by `(tick, id)`
    pub entries: Vec<TrafficEntry>,
    /// Free-form scenario annotations
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl TrafficPattern {
    /// Build a pattern from file contents, sorting and validating entries
    pub fn from_file(file: TrafficFile) -> EngineResult<Self> {
        file.building.validate()?;
        let mut entries = file.traffic;
        for entry in &entries {
            for floor in [entry.origin, entry.destination] {
                if floor < 0 || floor >= file.building.floors {
                    return Err(EngineError::invalid(format!(
                        "traffic entry {} references floor {} outside 0..{}",
                        entry.id, floor, file.building.floors
                    )));
                }
            }
        }
        entries.sort_by_key(|entry| (entry.tick, entry.id));
        Ok(Self {
            name: file.building.scenario.clone(),
            description: String::new(),
            building: file.building,
            entries,
            metadata: BTreeMap::new(),
        })
    }

    /// Parse a pattern from scenario JSON
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let file: TrafficFile = serde_json::from_str(json)?;
        Self::from_file(file)
    }

    /// Load a pattern from a scenario file on disk
    pub fn from_path(path: impl AsRef<Path>) -> EngineResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Max tick the scenario is expected to run
    pub fn max_tick(&self) -> u64 {
        self.building.duration
    }
}
