//! # liftsim scenario runner
//!
//! Loads traffic scenario files, drives the engine with a trivial
//! nearest-call dispatcher, and reports the round's metrics. The
//! dispatcher lives here on purpose: the engine never knows how cabs
//! are routed, it only executes `go_to_floor` commands.

use clap::Parser;
use liftsim_engine::{EngineError, EngineResult, SimulationState, SimulatorEngine};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "liftsim", about = "Headless elevator scenario runner")]
struct Args {
    /// Traffic scenario files, replayed in rotation order
    #[arg(required = true)]
    scenarios: Vec<PathBuf>,

    /// Stop each round after this many ticks instead of the scenario duration
    #[arg(long)]
    ticks: Option<u64>,

    /// Run every configured scenario, rebuilding the world between rounds
    #[arg(long)]
    all_rounds: bool,

    /// Dump the final state as JSON to stdout
    #[arg(long)]
    json: bool,
}

fn main() {
    tracing_subscriber::fmt().compact().init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        error!("scenario run failed: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> EngineResult<()> {
    let engine = SimulatorEngine::from_paths(&args.scenarios)?;

    loop {
        run_round(&engine, args)?;
        if !args.all_rounds {
            break;
        }
        match engine.next_traffic_round(true) {
            Ok(()) => {}
            Err(EngineError::NoMoreScenarios { .. }) => break,
            Err(e) => return Err(e),
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&engine.get_state())?);
    }
    Ok(())
}

fn run_round(engine: &SimulatorEngine, args: &Args) -> EngineResult<()> {
    let round = engine.traffic_info();
    let horizon = args.ticks.unwrap_or(round.max_tick);
    info!(
        round = round.current_index,
        of = round.total_files,
        horizon,
        "starting round"
    );

    for _ in 0..horizon {
        engine.step(1)?;
        dispatch_idle_cabs(engine)?;
    }

    report(&engine.get_state());
    Ok(())
}

/// Send every idle cab to its riders' nearest pressed floor, or failing
/// that to the nearest floor with an unclaimed hall call
fn dispatch_idle_cabs(engine: &SimulatorEngine) -> EngineResult<()> {
    let state = engine.get_state();
    let mut claimed: Vec<i32> = Vec::new();

    for cab in &state.elevators {
        if !cab.is_idle() {
            continue;
        }
        let here = cab.position.current_floor;
        let target = cab
            .pressed_floors()
            .into_iter()
            .min_by_key(|floor| (floor - here).abs())
            .or_else(|| {
                state
                    .floors
                    .iter()
                    .filter(|f| f.total_waiting() > 0 && !claimed.contains(&f.floor_number))
                    .min_by_key(|f| (f.floor_number - here).abs())
                    .map(|f| f.floor_number)
            });
        if let Some(floor) = target {
            if floor != here {
                engine.go_to_floor(cab.id, floor, false)?;
            }
            claimed.push(floor);
        }
    }
    Ok(())
}

fn report(state: &SimulationState) {
    let metrics = &state.metrics;
    info!(
        tick = state.tick,
        completed = metrics.completed_passengers,
        total = metrics.total_passengers,
        completion_rate = metrics.completion_rate,
        "round finished"
    );
    info!(
        avg_floor_wait = metrics.average_floor_wait_time,
        p95_floor_wait = metrics.p95_floor_wait_time,
        avg_arrival_wait = metrics.average_arrival_wait_time,
        p95_arrival_wait = metrics.p95_arrival_wait_time,
        energy = metrics.total_energy_consumption,
        "round metrics"
    );
}
