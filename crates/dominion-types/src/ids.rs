//! Type-safe identifier wrappers.
//!
//! Every entity in the simulation has a strongly-typed ID to prevent
//! accidental mixing of identifiers at compile time. Content-authored
//! entities (cultures, tech nodes, building definitions) use explicitly
//! assigned integers so identity survives a save/load cycle. Runtime
//! entities (population groups, building instances) are allocated
//! sequentially by their owning registry. Contracts use UUID v7.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around an integer with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident($inner:ty)
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub $inner);

        impl $name {
            /// Return the inner integer value.
            pub const fn into_inner(self) -> $inner {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$inner> for $name {
            fn from(id: $inner) -> Self {
                Self(id)
            }
        }

        impl From<$name> for $inner {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a city.
    CityId(u32)
}

define_id! {
    /// Unique identifier for a culture.
    CultureId(u32)
}

define_id! {
    /// Unique identifier for a religion.
    ReligionId(u32)
}

define_id! {
    /// Unique identifier for a realm (a controlling authority over cities).
    RealmId(u32)
}

define_id! {
    /// Unique identifier for a population group.
    GroupId(u64)
}

define_id! {
    /// Stable identifier for a tech node, assigned with the content definition.
    TechNodeId(u32)
}

define_id! {
    /// Stable identifier for a building definition.
    BuildingDefId(u32)
}

define_id! {
    /// Unique identifier for a placed building instance.
    BuildingId(u64)
}

define_id! {
    /// Stable identifier for a cultural pillar.
    PillarId(u32)
}

define_id! {
    /// Unique identifier for an individual agent (a character rather than a realm).
    AgentId(u32)
}

/// Unique identifier for a government contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContractId(pub Uuid);

impl ContractId {
    /// Create a new identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for ContractId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for ContractId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}
