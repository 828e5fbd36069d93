//! The mutable state shared by every subsystem agent.

use dominion_society::{ContractBook, CultureRegistry};
use dominion_world::WorldState;
use serde::{Deserialize, Serialize};

/// Running totals of what the subsystem agents have done.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    /// People moved to a realm leader's culture.
    pub people_assimilated: u64,
    /// People moved to a state religion.
    pub people_converted: u64,
    /// XP credited to culture trees.
    pub xp_distributed: f64,
    /// Tech trees that changed owner.
    pub ownership_changes: u64,
    /// Contracts removed on expiry.
    pub contracts_expired: u64,
    /// Buildings that finished construction.
    pub buildings_completed: u64,
}

/// The mutable simulation state passed through every dispatch.
#[derive(Debug, Clone, Default)]
pub struct SimulationState {
    /// Cities, realms, religions, buildings and population.
    pub world: WorldState,
    /// Every culture and its tech trees.
    pub cultures: CultureRegistry,
    /// Government contracts in force.
    pub contracts: ContractBook,
    /// Cumulative counters.
    pub stats: SimulationStats,
}

impl SimulationState {
    /// Create an empty state.
    pub const fn new() -> Self {
        Self {
            world: WorldState::new(),
            cultures: CultureRegistry::new(),
            contracts: ContractBook::new(),
            stats: SimulationStats {
                people_assimilated: 0,
                people_converted: 0,
                xp_distributed: 0.0,
                ownership_changes: 0,
                contracts_expired: 0,
                buildings_completed: 0,
            },
        }
    }
}
