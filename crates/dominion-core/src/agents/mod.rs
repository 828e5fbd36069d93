//! The four subsystem agents driven by the orchestrator.
//!
//! They are registered in a fixed order: culture, religion, government,
//! economy. Each keeps its own day counters.
//!
//! - [`culture`] -- Monthly building XP, tree ownership and yearly assimilation.
//! - [`religion`] -- Yearly conversion toward state religions.
//! - [`government`] -- Monthly contract aging and expiry.
//! - [`economy`] -- Daily construction progress.

pub mod culture;
pub mod economy;
pub mod government;
pub mod religion;

pub use culture::CultureManager;
pub use economy::EconomyManager;
pub use government::GovernmentManager;
pub use religion::ReligionManager;
