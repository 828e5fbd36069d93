//! The assembled simulation: clock, state and the registered agents.
//!
//! [`Simulation`] owns everything a run needs. Feeding it real elapsed time
//! (or a fixed number of days) advances the clock and dispatches the
//! resulting events to the agents in registration order.

use tracing::info;

use crate::agents::{CultureManager, EconomyManager, GovernmentManager, ReligionManager};
use crate::clock::{ClockError, WorldClock};
use crate::config::SimulationConfig;
use crate::orchestrator::{AgentHandle, DispatchSummary, TickOrchestrator};
use crate::state::SimulationState;

/// A configured simulation ready to be stepped.
#[derive(Debug)]
pub struct Simulation {
    /// Configuration the simulation was built from.
    config: SimulationConfig,
    /// The world clock.
    clock: WorldClock,
    /// World, cultures, contracts and counters.
    state: SimulationState,
    /// Registered subsystem agents.
    orchestrator: TickOrchestrator,
    /// Handles of the built-in agents, in registration order.
    handles: Vec<AgentHandle>,
}

impl Simulation {
    /// Build a simulation with an empty state and the four built-in agents
    /// registered as culture, religion, government, economy.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if the time configuration is
    /// unusable.
    pub fn new(config: SimulationConfig) -> Result<Self, ClockError> {
        let clock = WorldClock::new(&config.time, &config.world)?;
        let conversion = config.conversion();

        let mut orchestrator = TickOrchestrator::new();
        let handles = vec![
            orchestrator.register(Box::new(CultureManager::new(
                &config.progression(),
                conversion.assimilation_rate,
            ))),
            orchestrator.register(Box::new(ReligionManager::new(
                conversion.religious_conversion_rate,
            ))),
            orchestrator.register(Box::new(GovernmentManager::new(
                config.government.days_per_month,
            ))),
            orchestrator.register(Box::new(EconomyManager::new())),
        ];

        info!(
            name = %config.world.name,
            year = %clock.calendar().year,
            season = %clock.season_name(),
            agents = orchestrator.len(),
            "Simulation assembled"
        );

        Ok(Self {
            config,
            clock,
            state: SimulationState::new(),
            orchestrator,
            handles,
        })
    }

    /// Feed real elapsed seconds and dispatch any days that passed.
    pub fn update(&mut self, elapsed_seconds: f64) -> DispatchSummary {
        self.clock.update(elapsed_seconds);
        self.dispatch_pending()
    }

    /// Advance exactly `days` days regardless of speed.
    ///
    /// Events are dispatched one day at a time so agents observe each day's
    /// season and year boundaries before the next day begins.
    pub fn step_days(&mut self, days: u32) -> DispatchSummary {
        let mut summary = DispatchSummary::default();
        for _ in 0..days {
            self.clock.advance_day();
            summary.absorb(self.dispatch_pending());
        }
        summary
    }

    /// Hand queued clock events to the agents.
    fn dispatch_pending(&mut self) -> DispatchSummary {
        let events = self.clock.drain_events();
        if events.is_empty() {
            return DispatchSummary::default();
        }
        self.orchestrator.dispatch(&events, &mut self.state)
    }

    /// The world clock.
    pub const fn clock(&self) -> &WorldClock {
        &self.clock
    }

    /// Mutable world clock, for speed control.
    pub const fn clock_mut(&mut self) -> &mut WorldClock {
        &mut self.clock
    }

    /// The simulation state.
    pub const fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Mutable simulation state, for scenario setup and edits between steps.
    pub const fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    /// The agent registry.
    pub const fn orchestrator(&self) -> &TickOrchestrator {
        &self.orchestrator
    }

    /// Mutable agent registry, for registering extra agents.
    pub const fn orchestrator_mut(&mut self) -> &mut TickOrchestrator {
        &mut self.orchestrator
    }

    /// Handles of the built-in agents.
    pub fn agent_handles(&self) -> &[AgentHandle] {
        &self.handles
    }

    /// The configuration.
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Unregister every agent. Further steps only advance the clock.
    pub fn teardown(&mut self) -> usize {
        self.handles.clear();
        let removed = self.orchestrator.teardown();
        info!(removed, "Simulation torn down");
        removed
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn registers_agents_in_fixed_order() {
        let sim = Simulation::new(SimulationConfig::default()).unwrap();
        assert_eq!(
            sim.orchestrator().agent_names(),
            vec!["culture", "religion", "government", "economy"]
        );
        assert_eq!(sim.agent_handles().len(), 4);
    }

    #[test]
    fn invalid_time_config_is_rejected() {
        let mut config = SimulationConfig::default();
        config.time.days_per_season = 0;
        assert!(Simulation::new(config).is_err());
    }

    #[test]
    fn update_dispatches_elapsed_days() {
        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
        let summary = sim.update(3.5);
        assert_eq!(summary.days, 3);
        assert_eq!(sim.clock().days_elapsed(), 3);
        assert_eq!(sim.clock().pending_events(), 0);
    }

    #[test]
    fn step_days_crosses_a_year() {
        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
        let summary = sim.step_days(120);
        assert_eq!(summary.days, 120);
        assert_eq!(summary.seasons, 4);
        assert_eq!(summary.years, 1);
    }

    #[test]
    fn teardown_stops_dispatch() {
        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
        assert_eq!(sim.teardown(), 4);
        assert!(sim.orchestrator().is_empty());
        let summary = sim.step_days(5);
        assert_eq!(summary.days, 5);
        assert_eq!(sim.clock().days_elapsed(), 5);
    }
}
