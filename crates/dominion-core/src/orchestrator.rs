//! Fan-out of clock events to the registered subsystem agents.
//!
//! Every subsystem (culture, religion, government, economy) implements
//! [`SimulationAgent`] and is registered once with the [`TickOrchestrator`].
//! After each clock update the drained events are dispatched in order; for
//! each event every agent is called in registration order. Agents keep their
//! own counters (e.g. days since the last XP distribution), independent of
//! the calendar day.

use tracing::{debug, info};

use crate::clock::ClockEvent;
use crate::state::SimulationState;

/// A subsystem driven by the clock.
pub trait SimulationAgent {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Called once per simulated day.
    fn advance_day(&mut self, state: &mut SimulationState);

    /// Called when a new season begins.
    fn advance_season(&mut self, _state: &mut SimulationState) {}

    /// Called when a new year begins.
    fn advance_year(&mut self, _state: &mut SimulationState) {}
}

/// Handle returned on registration, used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AgentHandle(u32);

impl core::fmt::Display for AgentHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "agent#{}", self.0)
    }
}

/// Count of events dispatched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Day events dispatched.
    pub days: u64,
    /// Season events dispatched.
    pub seasons: u64,
    /// Year events dispatched.
    pub years: u64,
}

impl DispatchSummary {
    /// Add another summary's counts into this one.
    pub const fn absorb(&mut self, other: Self) {
        self.days = self.days.saturating_add(other.days);
        self.seasons = self.seasons.saturating_add(other.seasons);
        self.years = self.years.saturating_add(other.years);
    }
}

/// Ordered registry of subsystem agents.
#[derive(Default)]
pub struct TickOrchestrator {
    /// Agents in registration order.
    agents: Vec<(AgentHandle, Box<dyn SimulationAgent>)>,
    /// Next handle value.
    next_handle: u32,
}

impl core::fmt::Debug for TickOrchestrator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TickOrchestrator")
            .field("agents", &self.agent_names())
            .finish_non_exhaustive()
    }
}

impl TickOrchestrator {
    /// Create an orchestrator with no agents.
    pub const fn new() -> Self {
        Self {
            agents: Vec::new(),
            next_handle: 0,
        }
    }

    /// Register an agent after every agent already registered.
    pub fn register(&mut self, agent: Box<dyn SimulationAgent>) -> AgentHandle {
        let handle = AgentHandle(self.next_handle);
        self.next_handle = self.next_handle.saturating_add(1);
        info!(agent = agent.name(), handle = %handle, "Agent registered");
        self.agents.push((handle, agent));
        handle
    }

    /// Remove an agent. Returns it, or `None` if the handle is unknown.
    pub fn unregister(&mut self, handle: AgentHandle) -> Option<Box<dyn SimulationAgent>> {
        let position = self.agents.iter().position(|(h, _)| *h == handle)?;
        let (_, agent) = self.agents.remove(position);
        info!(agent = agent.name(), handle = %handle, "Agent unregistered");
        Some(agent)
    }

    /// Remove every agent, returning how many were registered.
    pub fn teardown(&mut self) -> usize {
        let count = self.agents.len();
        for (handle, agent) in self.agents.drain(..) {
            debug!(agent = agent.name(), handle = %handle, "Agent torn down");
        }
        count
    }

    /// Names of registered agents in dispatch order.
    pub fn agent_names(&self) -> Vec<&'static str> {
        self.agents.iter().map(|(_, a)| a.name()).collect()
    }

    /// Number of registered agents.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether no agents are registered.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Deliver `events` in order to every agent in registration order.
    pub fn dispatch(&mut self, events: &[ClockEvent], state: &mut SimulationState) -> DispatchSummary {
        let mut summary = DispatchSummary::default();
        for event in events {
            match event {
                ClockEvent::DayAdvanced { .. } => {
                    for (_, agent) in &mut self.agents {
                        agent.advance_day(state);
                    }
                    summary.days = summary.days.saturating_add(1);
                }
                ClockEvent::SeasonChanged { season_name, .. } => {
                    debug!(season = %season_name, "Dispatching season change");
                    for (_, agent) in &mut self.agents {
                        agent.advance_season(state);
                    }
                    summary.seasons = summary.seasons.saturating_add(1);
                }
                ClockEvent::YearChanged { year } => {
                    debug!(year = %year, "Dispatching year change");
                    for (_, agent) in &mut self.agents {
                        agent.advance_year(state);
                    }
                    summary.years = summary.years.saturating_add(1);
                }
            }
        }
        summary
    }
}
