//! Clock, orchestration and run loop for the Dominion simulation.
//!
//! `dominion-core` wires the world and society crates into a running
//! simulation. The [`WorldClock`] turns real or stepped time into day,
//! season and year events; the [`TickOrchestrator`] fans those events out to
//! the subsystem agents in registration order; [`Simulation`] assembles the
//! pieces from a [`SimulationConfig`].
//!
//! # Modules
//!
//! - [`agents`] -- Culture, religion, government and economy managers.
//! - [`clock`] -- Calendar advancement, speed control and clock events.
//! - [`config`] -- YAML configuration loading.
//! - [`orchestrator`] -- The [`SimulationAgent`] trait and event dispatch.
//! - [`runner`] -- Bounded headless runs and their summaries.
//! - [`simulation`] -- The assembled [`Simulation`].
//! - [`state`] -- [`SimulationState`] shared by every agent.

pub mod agents;
pub mod clock;
pub mod config;
pub mod orchestrator;
pub mod runner;
pub mod simulation;
pub mod state;

pub use agents::{CultureManager, EconomyManager, GovernmentManager, ReligionManager};
pub use clock::{ClockError, ClockEvent, WorldClock};
pub use config::{ConfigError, SimulationConfig};
pub use orchestrator::{AgentHandle, DispatchSummary, SimulationAgent, TickOrchestrator};
pub use runner::{
    NoOpCallback, RunBounds, RunCallback, RunEndReason, RunSummary, RunnerError, log_run_end,
    run_days, run_until, summarize,
};
pub use simulation::Simulation;
pub use state::{SimulationState, SimulationStats};
