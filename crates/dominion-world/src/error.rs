//! Error types for the `dominion-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`]. Every error
//! path leaves the world unchanged.

use dominion_types::{BuildingDefId, BuildingId, CityId, GroupId, RealmId, ReligionId};

/// Errors that can occur during world operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    /// A population group was not found in the partition.
    #[error("population group not found: {0}")]
    GroupNotFound(GroupId),

    /// A split asked for zero people or more people than the group holds.
    #[error("invalid split of group {group}: requested {requested}, available {available}")]
    InvalidSplit {
        /// The source group.
        group: GroupId,
        /// The number of people the caller tried to move.
        requested: u32,
        /// The number of people in the source group.
        available: u32,
    },

    /// A city was not found in the registry.
    #[error("city not found: {0}")]
    CityNotFound(CityId),

    /// A realm was not found in the registry.
    #[error("realm not found: {0}")]
    RealmNotFound(RealmId),

    /// A religion was not found in the registry.
    #[error("religion not found: {0}")]
    ReligionNotFound(ReligionId),

    /// A building definition was not found in the registry.
    #[error("building definition not found: {0}")]
    BuildingDefinitionNotFound(BuildingDefId),

    /// A building instance was not found in the registry.
    #[error("building not found: {0}")]
    BuildingNotFound(BuildingId),

    /// A duplicate city was inserted where uniqueness is required.
    #[error("duplicate city id: {0}")]
    DuplicateCity(CityId),

    /// A duplicate realm was inserted where uniqueness is required.
    #[error("duplicate realm id: {0}")]
    DuplicateRealm(RealmId),

    /// A duplicate religion was inserted where uniqueness is required.
    #[error("duplicate religion id: {0}")]
    DuplicateReligion(ReligionId),

    /// A duplicate building definition was inserted.
    #[error("duplicate building definition id: {0}")]
    DuplicateBuildingDefinition(BuildingDefId),
}
