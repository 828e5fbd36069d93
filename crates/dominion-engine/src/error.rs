//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure that can stop startup, so `main` can
//! propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: dominion_core::ConfigError,
    },

    /// World clock initialization failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: dominion_core::ClockError,
    },

    /// Seeding the world failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: dominion_world::WorldError,
    },

    /// Seeding the cultures failed.
    #[error("culture error: {source}")]
    Culture {
        /// The underlying culture error.
        #[from]
        source: dominion_society::CultureError,
    },

    /// Seeding the starting contracts failed.
    #[error("contract error: {source}")]
    Contract {
        /// The underlying contract error.
        #[from]
        source: dominion_society::ContractError,
    },

    /// The `scenario` config section was malformed.
    #[error("scenario error: {message}")]
    Scenario {
        /// Description of the failure.
        message: String,
    },
}
