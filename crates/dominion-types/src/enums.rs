//! Enumeration types for the Dominion simulation.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Population archetypes
// ---------------------------------------------------------------------------

/// The occupational and social class of a population group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Archetype {
    /// Unfree labor.
    Slave,
    /// Free manual workers and farmers.
    Laborer,
    /// Skilled craftspeople.
    Artisan,
    /// Traders and financiers.
    Merchant,
    /// Landed aristocracy.
    Noble,
    /// Religious officials.
    Clergy,
}

impl Archetype {
    /// Every archetype in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Slave,
        Self::Laborer,
        Self::Artisan,
        Self::Merchant,
        Self::Noble,
        Self::Clergy,
    ];
}

impl core::fmt::Display for Archetype {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Slave => "slave",
            Self::Laborer => "laborer",
            Self::Artisan => "artisan",
            Self::Merchant => "merchant",
            Self::Noble => "noble",
            Self::Clergy => "clergy",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Tech tree categories
// ---------------------------------------------------------------------------

/// A category of culture tech progression. Every culture owns one tree per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TreeType {
    /// Production, trade and infrastructure.
    Economics,
    /// Military organization and equipment.
    Warfare,
    /// Faith, clergy and holy sites.
    Religion,
    /// Administration, law and diplomacy.
    Politics,
    /// Learning and invention.
    Science,
}

impl TreeType {
    /// Every tree type in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Economics,
        Self::Warfare,
        Self::Religion,
        Self::Politics,
        Self::Science,
    ];
}

impl core::fmt::Display for TreeType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Economics => "economics",
            Self::Warfare => "warfare",
            Self::Religion => "religion",
            Self::Politics => "politics",
            Self::Science => "science",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Contract resources
// ---------------------------------------------------------------------------

/// A resource a subject can be obligated to hand over under a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Coin and treasury income.
    Gold,
    /// Grain and other foodstuffs.
    Food,
    /// Lumber.
    Timber,
    /// Quarried stone.
    Stone,
    /// Iron and worked metal.
    Iron,
    /// Luxury goods.
    Luxuries,
}

// ---------------------------------------------------------------------------
// Calendar era
// ---------------------------------------------------------------------------

/// Calendar era of a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Era {
    /// Before the common era (BC).
    BeforeCommon,
    /// Common era (AD).
    Common,
}
