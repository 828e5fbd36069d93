//! Culture progression and population conversion for the Dominion simulation.
//!
//! This crate holds the rules that turn world state into cultural change:
//! tech trees that accrue XP and unlock nodes, ownership of those trees by
//! population plurality, and the yearly passes that move people between
//! cultures and religions. It also keeps the government contract book.
//!
//! Nothing here is time-driven on its own. The subsystem agents in
//! `dominion-core` call these functions from their day, season and year
//! hooks.
//!
//! # Modules
//!
//! - [`assimilation`] -- Yearly culture conversion toward realm leaders.
//! - [`config`] -- Progression and conversion parameters.
//! - [`contract`] -- Parent/subject contracts and fairness loyalty.
//! - [`culture`] -- Cultures, pillars, hybrids and the [`CultureRegistry`].
//! - [`error`] -- Error types for unlocks, cultures and contracts.
//! - [`ownership`] -- The cached [`OwnershipResolver`].
//! - [`religion`] -- Yearly conversion toward state religions.
//! - [`tech`] -- Per-culture [`TechProgressionTree`]s and their nodes.
//! - [`xp`] -- Monthly building XP distribution.

pub mod assimilation;
pub mod config;
pub mod contract;
pub mod culture;
pub mod error;
pub mod ownership;
pub mod religion;
pub mod tech;
pub mod xp;

pub use assimilation::{AssimilationReport, process_culture_assimilation};
pub use config::{ConversionConfig, ProgressionConfig};
pub use contract::{
    Contract, ContractBook, ContractDuration, ContractSubject, ContractTerms,
    GovernanceRestrictions, fairness_loyalty,
};
pub use culture::{CultureData, CultureRegistry, CultureSave, HybridParent, Pillar};
pub use error::{ContractError, CultureError, UnlockError};
pub use ownership::{OwnershipChange, OwnershipResolver, RealmCultureKey};
pub use religion::{ConversionReport, process_religious_conversion};
pub use tech::{NodeState, TechNode, TechProgressionTree, TechTreeSave, UnlockOutcome};
pub use xp::{XpReport, distribute_building_xp};
