//! Tunable parameters for culture progression and population conversion.
//!
//! These values correspond to the `culture`, `assimilation` and `religion`
//! sections of `dominion-config.yaml`. The core crate builds them from the
//! loaded configuration and passes them into the managers; tests construct
//! them directly.

/// Parameters of the tech-tree economy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressionConfig {
    /// Cost of the first unlock in any tree (default: 1000).
    pub base_node_cost: f64,

    /// Extra cost added per node already unlocked in the same tree (default: 500).
    pub node_cost_increment: f64,

    /// Days between building XP distributions (default: 30).
    pub xp_tick_interval_days: u32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            base_node_cost: 1000.0,
            node_cost_increment: 500.0,
            xp_tick_interval_days: 30,
        }
    }
}

/// Parameters of the yearly conversion passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionConfig {
    /// Fraction of each non-matching group assimilated per year (default: 2%).
    pub assimilation_rate: f64,

    /// Fraction of each non-conforming group converted to the state
    /// religion per year, before resistance (default: 1%).
    pub religious_conversion_rate: f64,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            assimilation_rate: 0.02,
            religious_conversion_rate: 0.01,
        }
    }
}
