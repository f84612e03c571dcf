//! Tick pipeline throughput benchmarks

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use liftsim_engine::{
    BuildingConfig, SimulatorEngine, TrafficEntry, TrafficFile, TrafficPattern,
};
use std::hint::black_box;

fn dense_pattern() -> TrafficPattern {
    let traffic = (0..500u64)
        .map(|i| TrafficEntry {
            id: i + 1,
            origin: (i % 10) as i32,
            destination: ((i + 5) % 10) as i32,
            tick: i / 2,
        })
        .collect();
    let file = TrafficFile {
        building: BuildingConfig {
            floors: 10,
            elevators: 4,
            elevator_capacity: 8,
            elevator_energy_rates: None,
            scenario: "bench_dense".to_string(),
            duration: 100_000,
        },
        traffic,
    };
    TrafficPattern::from_file(file).unwrap()
}

/// Steps through heavy arrival traffic with busy cabs
fn bench_step_dense(c: &mut Criterion) {
    c.bench_function("step_100_ticks_dense", |b| {
        b.iter_batched(
            || {
                let engine = SimulatorEngine::new(vec![dense_pattern()]).unwrap();
                for cab in 0..4 {
                    engine.go_to_floor(cab, 9, false).unwrap();
                }
                engine
            },
            |engine| {
                black_box(engine.step(100).unwrap());
            },
            BatchSize::SmallInput,
        )
    });
}

/// Steps an empty building: pure pipeline overhead
fn bench_step_idle(c: &mut Criterion) {
    let file = TrafficFile {
        building: BuildingConfig {
            floors: 10,
            elevators: 4,
            elevator_capacity: 8,
            elevator_energy_rates: None,
            scenario: "bench_idle".to_string(),
            duration: 100_000,
        },
        traffic: Vec::new(),
    };
    let pattern = TrafficPattern::from_file(file).unwrap();

    c.bench_function("step_100_ticks_idle", |b| {
        b.iter_batched(
            || SimulatorEngine::new(vec![pattern.clone()]).unwrap(),
            |engine| {
                black_box(engine.step(100).unwrap());
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_step_dense, bench_step_idle);
criterion_main!(benches);
