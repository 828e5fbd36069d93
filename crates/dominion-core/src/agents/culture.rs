//! Culture manager: building XP, tech tree ownership and assimilation.
//!
//! Every `xp_tick_interval_days` days the manager credits building XP to the
//! cultures of each city and then reassigns tree ownership. Once a year it
//! runs the assimilation pass and reassigns ownership again, since the pass
//! may have changed which realm holds the most of a culture.

use dominion_society::{
    OwnershipResolver, ProgressionConfig, distribute_building_xp, process_culture_assimilation,
};
use tracing::debug;

use crate::orchestrator::SimulationAgent;
use crate::state::SimulationState;

/// Drives culture progression and assimilation.
#[derive(Debug, Clone)]
pub struct CultureManager {
    /// Days between XP distributions (at least 1).
    xp_tick_interval_days: u32,
    /// Yearly assimilation rate.
    assimilation_rate: f64,
    /// Days since XP was last distributed.
    days_since_last_xp_tick: u32,
    /// Cached realm/culture population.
    resolver: OwnershipResolver,
}

impl CultureManager {
    /// Create the manager from the progression settings and assimilation rate.
    pub fn new(progression: &ProgressionConfig, assimilation_rate: f64) -> Self {
        Self {
            xp_tick_interval_days: progression.xp_tick_interval_days.max(1),
            assimilation_rate,
            days_since_last_xp_tick: 0,
            resolver: OwnershipResolver::new(),
        }
    }

    /// Days since XP was last distributed.
    pub const fn days_since_last_xp_tick(&self) -> u32 {
        self.days_since_last_xp_tick
    }

    /// The ownership cache, for inspection.
    pub const fn resolver(&self) -> &OwnershipResolver {
        &self.resolver
    }

    /// Reassign tree ownership and record the number of changes.
    fn refresh_ownership(&mut self, state: &mut SimulationState) {
        let changes = self
            .resolver
            .update_culture_ownership(&state.world, &mut state.cultures);
        let count = u64::try_from(changes.len()).unwrap_or(u64::MAX);
        state.stats.ownership_changes = state.stats.ownership_changes.saturating_add(count);
    }
}

impl SimulationAgent for CultureManager {
    fn name(&self) -> &'static str {
        "culture"
    }

    fn advance_day(&mut self, state: &mut SimulationState) {
        self.days_since_last_xp_tick = self.days_since_last_xp_tick.saturating_add(1);
        if self.days_since_last_xp_tick < self.xp_tick_interval_days {
            return;
        }
        self.days_since_last_xp_tick = 0;

        let report = distribute_building_xp(&state.world, &mut state.cultures);
        state.stats.xp_distributed += report.xp_distributed;
        debug!(
            buildings = report.buildings_counted,
            xp = report.xp_distributed,
            discarded = report.xp_discarded,
            "XP tick"
        );
        self.refresh_ownership(state);
    }

    fn advance_year(&mut self, state: &mut SimulationState) {
        let report = process_culture_assimilation(&mut state.world, self.assimilation_rate);
        state.stats.people_assimilated = state
            .stats
            .people_assimilated
            .saturating_add(report.people_converted);
        self.refresh_ownership(state);
    }
}
