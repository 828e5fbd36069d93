//! Economy manager: advances building construction once per day.

use tracing::debug;

use crate::orchestrator::SimulationAgent;
use crate::state::SimulationState;

/// Drives construction of placed buildings.
#[derive(Debug, Clone, Default)]
pub struct EconomyManager;

impl EconomyManager {
    /// Create the manager.
    pub const fn new() -> Self {
        Self
    }
}

impl SimulationAgent for EconomyManager {
    fn name(&self) -> &'static str {
        "economy"
    }

    fn advance_day(&mut self, state: &mut SimulationState) {
        let finished = state.world.buildings.advance_construction();
        if finished.is_empty() {
            return;
        }
        let count = u64::try_from(finished.len()).unwrap_or(u64::MAX);
        state.stats.buildings_completed = state.stats.buildings_completed.saturating_add(count);
        debug!(completed = count, "Construction finished today");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use dominion_types::{BuildingDefId, CityId, TreeType};
    use dominion_world::BuildingDefinition;

    use super::*;

    #[test]
    fn completes_buildings_after_construction_days() {
        let mut state = SimulationState::new();
        state
            .world
            .buildings
            .define(BuildingDefinition {
                id: BuildingDefId(1),
                name: "Temple".to_owned(),
                tree_type: TreeType::Religion,
                base_monthly_xp: 5.0,
                xp_per_worker: 0.0,
                worker_efficiency: BTreeMap::new(),
                construction_days: 2,
            })
            .unwrap();
        let id = state.world.buildings.place(BuildingDefId(1), CityId(1)).unwrap();

        let mut manager = EconomyManager::new();
        manager.advance_day(&mut state);
        assert!(!state.world.buildings.instance(id).unwrap().completed);
        manager.advance_day(&mut state);
        assert!(state.world.buildings.instance(id).unwrap().completed);
        assert_eq!(state.stats.buildings_completed, 1);
    }
}
