//! Configuration loading and typed config structures for the Dominion simulation.
//!
//! The canonical configuration lives in `dominion-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure and a loader that reads the file. Every field has a default, so
//! an empty file yields a runnable configuration.

use std::path::Path;

use dominion_society::{ConversionConfig, ProgressionConfig};
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `dominion-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World-level settings (name, seed, start date).
    #[serde(default)]
    pub world: WorldConfig,

    /// Calendar and real-time pacing.
    #[serde(default)]
    pub time: TimeConfig,

    /// Tech progression parameters.
    #[serde(default)]
    pub culture: CultureConfig,

    /// Cultural assimilation parameters.
    #[serde(default)]
    pub assimilation: AssimilationConfig,

    /// Religious conversion parameters.
    #[serde(default)]
    pub religion: ReligionConfig,

    /// Government contract parameters.
    #[serde(default)]
    pub government: GovernmentConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Simulation boundary parameters.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Tech-tree parameters for the society crate.
    pub const fn progression(&self) -> ProgressionConfig {
        ProgressionConfig {
            base_node_cost: self.culture.base_node_cost,
            node_cost_increment: self.culture.node_cost_increment,
            xp_tick_interval_days: self.culture.xp_tick_interval_days,
        }
    }

    /// Conversion rates for the society crate.
    pub const fn conversion(&self) -> ConversionConfig {
        ConversionConfig {
            assimilation_rate: self.assimilation.base_rate,
            religious_conversion_rate: self.religion.base_conversion_rate,
        }
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable simulation name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for scenario generation.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// First simulated year; negative for BC. Zero is rejected by the clock.
    #[serde(default = "default_start_year")]
    pub start_year: i32,

    /// Season the simulation starts in (0-based).
    #[serde(default)]
    pub start_season: usize,

    /// Day within the starting season (1-based).
    #[serde(default = "default_start_day")]
    pub start_day: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            start_year: default_start_year(),
            start_season: 0,
            start_day: default_start_day(),
        }
    }
}

/// Calendar and pacing configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimeConfig {
    /// Real seconds that make up one simulated day at speed 1.
    #[serde(default = "default_real_seconds_per_day")]
    pub real_seconds_per_day: f64,

    /// Days in each season.
    #[serde(default = "default_days_per_season")]
    pub days_per_season: u32,

    /// Ordered list of season names forming the annual cycle.
    #[serde(default = "default_seasons")]
    pub seasons: Vec<String>,

    /// Fastest allowed speed multiplier.
    #[serde(default = "default_max_speed_multiplier")]
    pub max_speed_multiplier: f64,

    /// Speed multiplier at startup; `0` starts paused.
    #[serde(default = "default_initial_speed")]
    pub initial_speed: f64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            real_seconds_per_day: default_real_seconds_per_day(),
            days_per_season: default_days_per_season(),
            seasons: default_seasons(),
            max_speed_multiplier: default_max_speed_multiplier(),
            initial_speed: default_initial_speed(),
        }
    }
}

/// Tech progression configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CultureConfig {
    /// Days between building XP distributions.
    #[serde(default = "default_xp_tick_interval_days")]
    pub xp_tick_interval_days: u32,

    /// Cost of the first unlock in a tree.
    #[serde(default = "default_base_node_cost")]
    pub base_node_cost: f64,

    /// Extra cost per node already unlocked in the tree.
    #[serde(default = "default_node_cost_increment")]
    pub node_cost_increment: f64,
}

impl Default for CultureConfig {
    fn default() -> Self {
        Self {
            xp_tick_interval_days: default_xp_tick_interval_days(),
            base_node_cost: default_base_node_cost(),
            node_cost_increment: default_node_cost_increment(),
        }
    }
}

/// Cultural assimilation configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AssimilationConfig {
    /// Fraction of each non-matching group converted per year.
    #[serde(default = "default_assimilation_rate")]
    pub base_rate: f64,
}

impl Default for AssimilationConfig {
    fn default() -> Self {
        Self {
            base_rate: default_assimilation_rate(),
        }
    }
}

/// Religious conversion configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReligionConfig {
    /// Fraction of each non-conforming group converted per year, before resistance.
    #[serde(default = "default_conversion_rate")]
    pub base_conversion_rate: f64,
}

impl Default for ReligionConfig {
    fn default() -> Self {
        Self {
            base_conversion_rate: default_conversion_rate(),
        }
    }
}

/// Government configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GovernmentConfig {
    /// Days in a contract month.
    #[serde(default = "default_days_per_month")]
    pub days_per_month: u32,
}

impl Default for GovernmentConfig {
    fn default() -> Self {
        Self {
            days_per_month: default_days_per_month(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when no environment override is set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Simulation boundary configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Stop after this many simulated days; `0` runs until interrupted.
    #[serde(default = "default_max_days")]
    pub max_days: u64,
}

impl Default for SimulationBoundsConfig {
    fn default() -> Self {
        Self {
            max_days: default_max_days(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "Dominion".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_start_year() -> i32 {
    -500
}

const fn default_start_day() -> u32 {
    1
}

const fn default_real_seconds_per_day() -> f64 {
    1.0
}

const fn default_days_per_season() -> u32 {
    30
}

fn default_seasons() -> Vec<String> {
    vec![
        "spring".to_owned(),
        "summer".to_owned(),
        "autumn".to_owned(),
        "winter".to_owned(),
    ]
}

const fn default_max_speed_multiplier() -> f64 {
    10.0
}

const fn default_initial_speed() -> f64 {
    1.0
}

const fn default_xp_tick_interval_days() -> u32 {
    30
}

const fn default_base_node_cost() -> f64 {
    1000.0
}

const fn default_node_cost_increment() -> f64 {
    500.0
}

const fn default_assimilation_rate() -> f64 {
    0.02
}

const fn default_conversion_rate() -> f64 {
    0.01
}

const fn default_days_per_month() -> u32 {
    30
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_max_days() -> u64 {
    720
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert_eq!(config.world.seed, 42);
        assert_eq!(config.world.start_year, -500);
        assert_eq!(config.time.days_per_season, 30);
        assert_eq!(config.time.seasons.len(), 4);
        assert_eq!(config.culture.xp_tick_interval_days, 30);
        assert_eq!(config.government.days_per_month, 30);
        assert!((config.assimilation.base_rate - 0.02).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
world:
  name: "Test World"
  seed: 123
  start_year: -10
  start_season: 2
  start_day: 5

time:
  real_seconds_per_day: 0.5
  days_per_season: 10
  seasons:
    - wet
    - dry
  max_speed_multiplier: 4.0
  initial_speed: 2.0

culture:
  xp_tick_interval_days: 15
  base_node_cost: 800
  node_cost_increment: 200

assimilation:
  base_rate: 0.05

religion:
  base_conversion_rate: 0.03

government:
  days_per_month: 28

logging:
  level: "debug"

simulation:
  max_days: 100
"#;

        let config = SimulationConfig::parse(yaml).unwrap();
        assert_eq!(config.world.name, "Test World");
        assert_eq!(config.world.start_year, -10);
        assert_eq!(config.world.start_season, 2);
        assert_eq!(config.time.days_per_season, 10);
        assert_eq!(config.time.seasons, vec!["wet".to_owned(), "dry".to_owned()]);
        assert_eq!(config.government.days_per_month, 28);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.simulation.max_days, 100);

        let progression = config.progression();
        assert!((progression.base_node_cost - 800.0).abs() < f64::EPSILON);
        assert_eq!(progression.xp_tick_interval_days, 15);
        let conversion = config.conversion();
        assert!((conversion.religious_conversion_rate - 0.03).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = SimulationConfig::parse("world:\n  seed: 7\n").unwrap();
        assert_eq!(config.world.seed, 7);
        assert_eq!(config.time.days_per_season, 30);
        assert_eq!(config.simulation.max_days, 720);
    }

    #[test]
    fn parse_empty_yaml() {
        assert_eq!(SimulationConfig::parse("").unwrap(), SimulationConfig::default());
    }

    #[test]
    fn invalid_yaml_is_reported() {
        assert!(matches!(
            SimulationConfig::parse("time: [unclosed"),
            Err(ConfigError::Yaml { .. })
        ));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("dominion-config.yaml");
        if path.exists() {
            let config = SimulationConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
