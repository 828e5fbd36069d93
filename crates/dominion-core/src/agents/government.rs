//! Government manager: ages contracts one month at a time.

use tracing::debug;

use crate::orchestrator::SimulationAgent;
use crate::state::SimulationState;

/// Counts days and advances every contract by a month when one has passed.
#[derive(Debug, Clone)]
pub struct GovernmentManager {
    /// Days in a contract month (at least 1).
    days_per_month: u32,
    /// Days since the last month boundary.
    days_since_last_month: u32,
}

impl GovernmentManager {
    /// Create the manager. A zero month length is treated as one day.
    pub fn new(days_per_month: u32) -> Self {
        Self {
            days_per_month: days_per_month.max(1),
            days_since_last_month: 0,
        }
    }

    /// Days since the last month boundary.
    pub const fn days_since_last_month(&self) -> u32 {
        self.days_since_last_month
    }
}

impl SimulationAgent for GovernmentManager {
    fn name(&self) -> &'static str {
        "government"
    }

    fn advance_day(&mut self, state: &mut SimulationState) {
        self.days_since_last_month = self.days_since_last_month.saturating_add(1);
        if self.days_since_last_month < self.days_per_month {
            return;
        }
        self.days_since_last_month = 0;

        let expired = state.contracts.advance_month();
        let count = u64::try_from(expired.len()).unwrap_or(u64::MAX);
        state.stats.contracts_expired = state.stats.contracts_expired.saturating_add(count);
        debug!(expired = count, remaining = state.contracts.len(), "Contract month elapsed");
    }
}
