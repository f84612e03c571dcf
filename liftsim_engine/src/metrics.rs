//! Aggregated simulation KPIs
//!
//! The p95 figures are *trimmed means excluding the worst 5%*: sort the
//! samples ascending, keep the shortest `⌊n * 0.95⌋`, and average those.
//! This is not the 95th-percentile order statistic; the definition is
//! kept for wire compatibility.

use crate::elevator::Elevator;
use crate::passenger::{Passenger, PassengerStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Simulation KPIs, recomputed on demand from passenger records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationMetrics {
    /// Passengers delivered to their destination
    pub completed_passengers: usize,
    /// All passengers materialized so far, cancelled included
    pub total_passengers: usize,
    /// `completed / total`, 0.0 when no passengers exist
    pub completion_rate: f64,
    /// Mean ticks from appearance to boarding, completed passengers only
    pub average_floor_wait_time: f64,
    /// Mean ticks from appearance to delivery, completed passengers only
    pub average_arrival_wait_time: f64,
    /// Mean of the shortest 95% of floor wait times
    pub p95_floor_wait_time: f64,
    /// Mean of the shortest 95% of arrival wait times
    pub p95_arrival_wait_time: f64,
    /// Energy consumed across all cabs
    pub total_energy_consumption: f64,
}

impl SimulationMetrics {
    /// Compute KPIs from the current passenger records and cabs
    pub fn compute(passengers: &BTreeMap<u64, Passenger>, elevators: &[Elevator]) -> Self {
        let total_passengers = passengers.len();
        let completed: Vec<&Passenger> = passengers
            .values()
            .filter(|p| p.status() == PassengerStatus::Completed)
            .collect();

        let floor_waits: Vec<u64> = completed
            .iter()
            .filter_map(|p| p.floor_wait_time())
            .collect();
        let arrival_waits: Vec<u64> = completed
            .iter()
            .filter_map(|p| p.arrival_wait_time())
            .collect();

        let completion_rate = if total_passengers == 0 {
            0.0
        } else {
            completed.len() as f64 / total_passengers as f64
        };

        Self {
            completed_passengers: completed.len(),
            total_passengers,
            completion_rate,
            average_floor_wait_time: mean(&floor_waits),
            average_arrival_wait_time: mean(&arrival_waits),
            p95_floor_wait_time: trimmed_mean_p95(floor_waits),
            p95_arrival_wait_time: trimmed_mean_p95(arrival_waits),
            total_energy_consumption: elevators.iter().map(|e| e.energy_consumed).sum(),
        }
    }
}

fn mean(values: &[u64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<u64>() as f64 / values.len() as f64
    }
}

fn trimmed_mean_p95(mut values: Vec<u64>) -> f64 {
    values.sort_unstable();
    let keep = values.len() * 95 / 100;
    mean(&values[..keep])
}
