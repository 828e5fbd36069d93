//! Cities, realms, religions, buildings and population for the Dominion simulation.
//!
//! This crate models the shared world data that every subsystem reads and
//! mutates. It contains no time-driven behavior of its own; the yearly and
//! monthly passes live in `dominion-society` and are driven by the clock in
//! `dominion-core`.
//!
//! # Modules
//!
//! - [`building`] -- Building definitions, instances, construction progress
//!   and the [`BuildingSource`] seam.
//! - [`city`] -- Cities and their controlling realms.
//! - [`demographics`] -- Age/sex distribution carried by population groups.
//! - [`error`] -- Error types for world operations.
//! - [`population`] -- The [`PopulationPartition`]: group registration,
//!   aggregates and the split primitive.
//! - [`realm`] -- Realms, their leader culture and state religion.
//! - [`religion`] -- Religions and conversion resistance.
//! - [`state`] -- [`WorldState`] and the [`PopulationSource`] seam.

pub mod building;
pub mod city;
pub mod demographics;
pub mod error;
pub mod population;
pub mod realm;
pub mod religion;
pub mod state;

// Re-export primary types at crate root.
pub use building::{BuildingDefinition, BuildingInstance, BuildingRegistry, BuildingSource};
pub use city::{City, CityRegistry};
pub use demographics::Demographics;
pub use error::WorldError;
pub use population::{NewGroup, PopulationGroup, PopulationPartition, SocialStanding, plurality};
pub use realm::{Realm, RealmRegistry};
pub use religion::{Religion, ReligionRegistry};
pub use state::{PopulationSource, WorldState};
