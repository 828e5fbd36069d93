//! Shared type definitions for the Dominion simulation.
//!
//! This crate is the single source of truth for identifiers, enumerations and
//! small value types used across the Dominion workspace.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe identifier wrappers for every entity
//! - [`enums`] -- Archetypes, tree types, contract resources, eras
//! - [`calendar`] -- Era-aware [`Year`] and the [`Calendar`] triple
//! - [`structs`] -- Shared value structs ([`ModifierSet`])

pub mod calendar;
pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use calendar::{Calendar, Year, YearZero};
pub use enums::{Archetype, Era, ResourceKind, TreeType};
pub use ids::{
    AgentId, BuildingDefId, BuildingId, CityId, ContractId, CultureId, GroupId, PillarId, RealmId,
    ReligionId, TechNodeId,
};
pub use structs::ModifierSet;
