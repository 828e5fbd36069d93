//! Religion manager: yearly conversion toward each realm's state religion.

use dominion_society::process_religious_conversion;

use crate::orchestrator::SimulationAgent;
use crate::state::SimulationState;

/// Applies religious conversion pressure once a year.
#[derive(Debug, Clone)]
pub struct ReligionManager {
    /// Yearly conversion rate before resistance.
    base_rate: f64,
}

impl ReligionManager {
    /// Create the manager with the yearly base conversion rate.
    pub const fn new(base_rate: f64) -> Self {
        Self { base_rate }
    }
}

impl SimulationAgent for ReligionManager {
    fn name(&self) -> &'static str {
        "religion"
    }

    fn advance_day(&mut self, _state: &mut SimulationState) {}

    fn advance_year(&mut self, state: &mut SimulationState) {
        let report = process_religious_conversion(&mut state.world, self.base_rate);
        state.stats.people_converted = state
            .stats
            .people_converted
            .saturating_add(report.people_converted);
    }
}
