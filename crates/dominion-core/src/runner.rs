//! Bounded, deterministic run loop.
//!
//! [`run_days`] and [`run_until`] step a [`Simulation`] one day at a time
//! without real time and report what happened. The engine binary uses its
//! own real-time loop; these are for headless runs and tests.

use dominion_types::{Calendar, Year};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::SimulationBoundsConfig;
use crate::orchestrator::DispatchSummary;
use crate::simulation::Simulation;
use crate::state::{SimulationState, SimulationStats};

/// Errors that can occur when starting a bounded run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunnerError {
    /// Neither a day limit nor a target year was given.
    #[error("run has no day limit and no target year")]
    Unbounded,
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunEndReason {
    /// The day limit was reached.
    MaxDaysReached,
    /// The calendar reached the target year.
    TargetYearReached,
    /// The process was asked to stop before any limit was reached.
    Interrupted,
}

/// Stop conditions for [`run_until`]. The first one met ends the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunBounds {
    /// Maximum days to simulate; 0 means no limit.
    pub max_days: u64,
    /// Stop once the calendar year is at or past this year.
    pub until_year: Option<Year>,
}

impl RunBounds {
    /// Bounds taken from the `simulation` config section.
    pub const fn from_config(config: &SimulationBoundsConfig) -> Self {
        Self {
            max_days: config.max_days,
            until_year: None,
        }
    }

    /// Whether at least one stop condition is set.
    pub const fn is_bounded(&self) -> bool {
        self.max_days > 0 || self.until_year.is_some()
    }
}

/// Outcome of a bounded run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Why the run stopped.
    pub end_reason: RunEndReason,
    /// Days simulated by this run.
    pub days: u64,
    /// Season changes dispatched by this run.
    pub seasons: u64,
    /// Year changes dispatched by this run.
    pub years: u64,
    /// Calendar position when the run stopped.
    pub final_calendar: Calendar,
    /// Cumulative counters at the end of the run.
    pub stats: SimulationStats,
}

/// Callback invoked after each simulated day.
pub trait RunCallback {
    /// Called after the day's events have been dispatched.
    fn on_day(&mut self, calendar: Calendar, state: &SimulationState);
}

/// A callback that does nothing.
pub struct NoOpCallback;

impl RunCallback for NoOpCallback {
    fn on_day(&mut self, _calendar: Calendar, _state: &SimulationState) {}
}

/// Simulate exactly `days` days.
pub fn run_days(sim: &mut Simulation, days: u64, callback: &mut dyn RunCallback) -> RunSummary {
    let mut dispatched = DispatchSummary::default();
    let mut count = 0_u64;
    while count < days {
        dispatched.absorb(sim.step_days(1));
        count = count.saturating_add(1);
        callback.on_day(sim.clock().calendar(), sim.state());
    }
    summarize(sim, RunEndReason::MaxDaysReached, dispatched)
}

/// Simulate until a stop condition in `bounds` is met.
///
/// A target year that has already been reached ends the run before any day
/// is simulated.
///
/// # Errors
///
/// Returns [`RunnerError::Unbounded`] when `bounds` has no stop condition.
pub fn run_until(
    sim: &mut Simulation,
    bounds: RunBounds,
    callback: &mut dyn RunCallback,
) -> Result<RunSummary, RunnerError> {
    if !bounds.is_bounded() {
        warn!("Refusing to start an unbounded run");
        return Err(RunnerError::Unbounded);
    }

    info!(
        max_days = bounds.max_days,
        until_year = ?bounds.until_year.map(Year::value),
        start_year = %sim.clock().calendar().year,
        "Run starting"
    );

    let mut dispatched = DispatchSummary::default();
    loop {
        let current = sim.clock().calendar().year;
        if bounds.until_year.is_some_and(|target| current >= target) {
            return Ok(summarize(sim, RunEndReason::TargetYearReached, dispatched));
        }
        if bounds.max_days > 0 && dispatched.days >= bounds.max_days {
            return Ok(summarize(sim, RunEndReason::MaxDaysReached, dispatched));
        }

        dispatched.absorb(sim.step_days(1));
        callback.on_day(sim.clock().calendar(), sim.state());
    }
}

/// Build a summary of `sim` as it stands, for `dispatched` events.
pub fn summarize(sim: &Simulation, end_reason: RunEndReason, dispatched: DispatchSummary) -> RunSummary {
    RunSummary {
        end_reason,
        days: dispatched.days,
        seasons: dispatched.seasons,
        years: dispatched.years,
        final_calendar: sim.clock().calendar(),
        stats: sim.state().stats.clone(),
    }
}

/// Log the end of a run.
pub fn log_run_end(summary: &RunSummary) {
    info!(
        reason = ?summary.end_reason,
        days = summary.days,
        seasons = summary.seasons,
        years = summary.years,
        year = %summary.final_calendar.year,
        season_index = summary.final_calendar.season_index,
        day = summary.final_calendar.day,
        "Run ended"
    );
    info!(
        assimilated = summary.stats.people_assimilated,
        converted = summary.stats.people_converted,
        xp = summary.stats.xp_distributed,
        ownership_changes = summary.stats.ownership_changes,
        contracts_expired = summary.stats.contracts_expired,
        buildings_completed = summary.stats.buildings_completed,
        "Run totals"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;

    struct DayCounter(u64);

    impl RunCallback for DayCounter {
        fn on_day(&mut self, _calendar: Calendar, _state: &SimulationState) {
            self.0 = self.0.saturating_add(1);
        }
    }

    fn sim() -> Simulation {
        Simulation::new(SimulationConfig::default()).unwrap()
    }

    #[test]
    fn run_days_simulates_exactly_n_days() {
        let mut sim = sim();
        let mut counter = DayCounter(0);
        let summary = run_days(&mut sim, 45, &mut counter);
        assert_eq!(summary.days, 45);
        assert_eq!(summary.seasons, 1);
        assert_eq!(counter.0, 45);
        assert_eq!(summary.final_calendar.day, 16);
        assert_eq!(summary.final_calendar.season_index, 1);
    }

    #[test]
    fn unbounded_run_is_rejected() {
        let mut sim = sim();
        let err = run_until(&mut sim, RunBounds::default(), &mut NoOpCallback).unwrap_err();
        assert_eq!(err, RunnerError::Unbounded);
    }

    #[test]
    fn run_until_target_year() {
        let mut sim = sim();
        let bounds = RunBounds {
            max_days: 0,
            until_year: Year::new(-498),
        };
        let summary = run_until(&mut sim, bounds, &mut NoOpCallback).unwrap();
        assert_eq!(summary.end_reason, RunEndReason::TargetYearReached);
        assert_eq!(summary.years, 2);
        assert_eq!(summary.days, 240);
        assert_eq!(summary.final_calendar.year, Year::new(-498).unwrap());
    }

    #[test]
    fn day_limit_wins_when_it_comes_first() {
        let mut sim = sim();
        let bounds = RunBounds {
            max_days: 10,
            until_year: Year::new(-400),
        };
        let summary = run_until(&mut sim, bounds, &mut NoOpCallback).unwrap();
        assert_eq!(summary.end_reason, RunEndReason::MaxDaysReached);
        assert_eq!(summary.days, 10);
    }

    #[test]
    fn reached_target_year_ends_immediately() {
        let mut sim = sim();
        let bounds = RunBounds {
            max_days: 0,
            until_year: Year::new(-500),
        };
        let summary = run_until(&mut sim, bounds, &mut NoOpCallback).unwrap();
        assert_eq!(summary.days, 0);
    }

    #[test]
    fn summary_serializes_for_reports() {
        let mut sim = sim();
        let summary = run_days(&mut sim, 3, &mut NoOpCallback);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["end_reason"], "MaxDaysReached");
        assert_eq!(json["days"], 3);
        assert_eq!(json["final_calendar"]["day"], 4);
    }

    #[test]
    fn bounds_from_config() {
        let config = SimulationConfig::default();
        let bounds = RunBounds::from_config(&config.simulation);
        assert_eq!(bounds.max_days, 720);
        assert!(bounds.is_bounded());
    }
}
