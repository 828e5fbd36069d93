//! Engine binary for the Dominion simulation.
//!
//! Loads configuration, seeds a starting world and paces the world clock
//! against real time until the configured day limit is reached or the
//! process is interrupted.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from the path given as the first argument, else
//!    `dominion-config.yaml`, else defaults
//! 2. Initialize structured logging (tracing)
//! 3. Assemble the simulation (clock and the four subsystem agents)
//! 4. Seed the starting scenario from the world seed
//! 5. Feed elapsed real time into the clock on a fixed interval
//! 6. Log the result

mod error;
mod scenario;

use std::path::{Path, PathBuf};
use std::time::Duration;

use dominion_core::{DispatchSummary, RunEndReason, Simulation, SimulationConfig};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::scenario::ScenarioConfig;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "dominion-config.yaml";

/// Environment variable that overrides the configured log filter.
const LOG_ENV: &str = "DOMINION_LOG";

/// How often real time is fed into the clock.
const PACING_INTERVAL: Duration = Duration::from_millis(100);

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, clock setup or scenario seeding fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config = load_config(&config_path)?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV)
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        start_year = config.world.start_year,
        max_days = config.simulation.max_days,
        "dominion-engine starting"
    );

    // 3. Assemble the simulation.
    let scenario = load_scenario_config(&config_path)?;
    let progression = config.progression();
    let seed = config.world.seed;
    let mut sim = Simulation::new(config).map_err(EngineError::from)?;

    // 4. Seed the starting world.
    scenario::seed_world(sim.state_mut(), &scenario, &progression, seed)?;

    // 5. Run against real time.
    let (end_reason, dispatched) = run_realtime(&mut sim).await;

    // 6. Log results.
    let summary = dominion_core::summarize(&sim, end_reason, dispatched);
    dominion_core::log_run_end(&summary);
    sim.teardown();

    info!(end_reason = ?summary.end_reason, days = summary.days, "dominion-engine shutdown complete");
    Ok(())
}

/// Feed elapsed real time into the simulation until the day limit or ctrl-c.
async fn run_realtime(sim: &mut Simulation) -> (RunEndReason, DispatchSummary) {
    let max_days = sim.config().simulation.max_days;
    let mut interval = tokio::time::interval(PACING_INTERVAL);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last = Instant::now();
    let mut dispatched = DispatchSummary::default();

    info!(
        speed = sim.clock().speed(),
        seconds_per_day = sim.config().time.real_seconds_per_day,
        "Entering real-time loop"
    );

    loop {
        if max_days > 0 && sim.clock().days_elapsed() >= max_days {
            info!(days = sim.clock().days_elapsed(), max_days, "Day limit reached");
            return (RunEndReason::MaxDaysReached, dispatched);
        }

        tokio::select! {
            _ = interval.tick() => {
                let now = Instant::now();
                let elapsed = now.duration_since(last).as_secs_f64();
                last = now;
                dispatched.absorb(sim.update(elapsed));
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupt received, stopping");
                return (RunEndReason::Interrupted, dispatched);
            }
        }
    }
}

/// Load the simulation configuration from `path`, or defaults if it is absent.
fn load_config(path: &Path) -> Result<SimulationConfig, EngineError> {
    if path.exists() {
        Ok(SimulationConfig::from_file(path)?)
    } else {
        Ok(SimulationConfig::default())
    }
}

/// Load the `scenario` section of the config file at `path`.
///
/// A missing file or a missing `scenario` key yields defaults.
fn load_scenario_config(path: &Path) -> Result<ScenarioConfig, EngineError> {
    if !path.exists() {
        info!(path = %path.display(), "Config file not found, using default scenario");
        return Ok(ScenarioConfig::default());
    }
    let contents = std::fs::read_to_string(path).map_err(|e| EngineError::Scenario {
        message: format!("failed to read config file: {e}"),
    })?;
    let raw: serde_yml::Value =
        serde_yml::from_str(&contents).map_err(|e| EngineError::Scenario {
            message: format!("failed to parse config YAML: {e}"),
        })?;

    raw.get("scenario").map_or_else(
        || Ok(ScenarioConfig::default()),
        |value| {
            serde_yml::from_value(value.clone()).map_err(|e| EngineError::Scenario {
                message: format!("failed to parse scenario config: {e}"),
            })
        },
    )
}
