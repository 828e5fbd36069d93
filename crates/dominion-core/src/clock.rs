//! World clock and calendar for the Dominion simulation.
//!
//! The clock is the single source of truth for simulated time. It converts
//! real elapsed seconds into whole simulated days through an accumulator
//! scaled by a speed multiplier, and advances the day/season/year calendar
//! one day at a time. Every transition is pushed onto an event queue that
//! the orchestrator drains after each update.
//!
//! # Design Principles
//!
//! - One day is advanced per threshold crossed; a large elapsed value is
//!   processed day by day, never collapsed.
//! - Within one day, events are queued season first, then year, then day.
//! - Invalid configuration is rejected at construction; after that, no
//!   clock operation can fail.
//! - Year zero does not exist: 1 BC is followed by AD 1.

use std::collections::VecDeque;

use dominion_types::{Calendar, Year};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{TimeConfig, WorldConfig};

/// Slowest running speed; anything lower except exactly zero is raised to this.
pub const MIN_SPEED: f64 = 0.1;

/// Errors that can occur when constructing a clock.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    /// Invalid time configuration (e.g. zero days per season).
    #[error("invalid time configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// A calendar transition produced by the clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockEvent {
    /// A day elapsed. Queued last for its day.
    DayAdvanced {
        /// New day within the season.
        day: u32,
        /// Name of the current season.
        season_name: String,
        /// Current year.
        year: Year,
    },
    /// A new season began.
    SeasonChanged {
        /// Index of the new season.
        season_index: usize,
        /// Name of the new season.
        season_name: String,
    },
    /// A new year began.
    YearChanged {
        /// The new year.
        year: Year,
    },
}

/// World clock tracking the simulation's calendar and pacing.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldClock {
    /// Current calendar position.
    calendar: Calendar,
    /// Days in each season.
    days_per_season: u32,
    /// Ordered season names forming the annual cycle.
    seasons: Vec<String>,
    /// Real seconds per simulated day at speed 1.
    real_seconds_per_day: f64,
    /// Fastest allowed speed.
    max_speed: f64,
    /// Current speed multiplier; exactly `0.0` while paused.
    speed: f64,
    /// Speed restored by [`WorldClock::resume`].
    last_running_speed: f64,
    /// Scaled real seconds not yet turned into days.
    accumulator: f64,
    /// Days advanced since construction.
    days_elapsed: u64,
    /// Transitions not yet drained.
    events: VecDeque<ClockEvent>,
}

impl WorldClock {
    /// Create a clock from the time configuration and the world's start date.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] for zero days per season, an
    /// empty season list, a non-positive day length, a maximum speed below
    /// [`MIN_SPEED`], year zero, or a start date outside the calendar.
    pub fn new(time: &TimeConfig, world: &WorldConfig) -> Result<Self, ClockError> {
        if time.days_per_season == 0 {
            return Err(invalid("days_per_season must be at least 1"));
        }
        if time.seasons.is_empty() {
            return Err(invalid("at least one season must be configured"));
        }
        if !time.real_seconds_per_day.is_finite() || time.real_seconds_per_day <= 0.0 {
            return Err(invalid("real_seconds_per_day must be positive"));
        }
        if !time.max_speed_multiplier.is_finite() || time.max_speed_multiplier < MIN_SPEED {
            return Err(invalid("max_speed_multiplier must be at least 0.1"));
        }
        let year = Year::new(world.start_year).ok_or_else(|| invalid("start_year cannot be 0"))?;
        if world.start_season >= time.seasons.len() {
            return Err(ClockError::InvalidConfig {
                reason: format!(
                    "start_season {} out of range (len {})",
                    world.start_season,
                    time.seasons.len()
                ),
            });
        }
        if world.start_day == 0 || world.start_day > time.days_per_season {
            return Err(ClockError::InvalidConfig {
                reason: format!(
                    "start_day {} out of range 1..={}",
                    world.start_day, time.days_per_season
                ),
            });
        }

        let mut clock = Self {
            calendar: Calendar {
                day: world.start_day,
                season_index: world.start_season,
                year,
            },
            days_per_season: time.days_per_season,
            seasons: time.seasons.clone(),
            real_seconds_per_day: time.real_seconds_per_day,
            max_speed: time.max_speed_multiplier,
            speed: 1.0_f64.min(time.max_speed_multiplier),
            last_running_speed: 1.0_f64.min(time.max_speed_multiplier),
            accumulator: 0.0,
            days_elapsed: 0,
            events: VecDeque::new(),
        };
        clock.set_speed(time.initial_speed);
        Ok(clock)
    }

    // -----------------------------------------------------------------------
    // Advancement
    // -----------------------------------------------------------------------

    /// Feed real elapsed seconds into the clock.
    ///
    /// Adds `elapsed * speed` to the accumulator and advances one day per
    /// `real_seconds_per_day` contained in it. Returns the number of days
    /// advanced. Negative or non-finite input is ignored.
    pub fn update(&mut self, elapsed_seconds: f64) -> u32 {
        if !elapsed_seconds.is_finite() || elapsed_seconds < 0.0 {
            warn!(elapsed_seconds, "Ignoring invalid elapsed time");
            return 0;
        }
        self.accumulator += elapsed_seconds * self.speed;

        let mut advanced = 0_u32;
        while self.accumulator >= self.real_seconds_per_day {
            self.accumulator -= self.real_seconds_per_day;
            self.advance_day();
            advanced = advanced.saturating_add(1);
        }
        advanced
    }

    /// Advance exactly `days` days, ignoring speed and the accumulator.
    pub fn advance_days(&mut self, days: u32) {
        for _ in 0..days {
            self.advance_day();
        }
    }

    /// Advance one day, queueing season, year and day events in that order.
    pub fn advance_day(&mut self) {
        self.days_elapsed = self.days_elapsed.saturating_add(1);
        self.calendar.day = self.calendar.day.saturating_add(1);

        if self.calendar.day > self.days_per_season {
            self.calendar.day = 1;
            self.calendar.season_index = self.calendar.season_index.saturating_add(1);
            let wrapped = self.calendar.season_index >= self.seasons.len();
            if wrapped {
                self.calendar.season_index = 0;
            }

            let season_name = self.season_name().to_owned();
            debug!(season = %season_name, year = %self.calendar.year, "Season changed");
            self.events.push_back(ClockEvent::SeasonChanged {
                season_index: self.calendar.season_index,
                season_name,
            });

            if wrapped {
                self.calendar.year = self.calendar.year.next();
                info!(year = %self.calendar.year, "New year");
                self.events.push_back(ClockEvent::YearChanged {
                    year: self.calendar.year,
                });
            }
        }

        self.events.push_back(ClockEvent::DayAdvanced {
            day: self.calendar.day,
            season_name: self.season_name().to_owned(),
            year: self.calendar.year,
        });
    }

    /// Take every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<ClockEvent> {
        self.events.drain(..).collect()
    }

    /// Number of queued events.
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    // -----------------------------------------------------------------------
    // Speed
    // -----------------------------------------------------------------------

    /// Set the speed multiplier and return the value applied.
    ///
    /// Exactly `0` pauses. Other values are clamped to
    /// `[MIN_SPEED, max_speed_multiplier]`; negative values become
    /// [`MIN_SPEED`]. Non-finite values are ignored.
    pub fn set_speed(&mut self, multiplier: f64) -> f64 {
        if !multiplier.is_finite() {
            warn!(multiplier, "Ignoring non-finite speed");
            return self.speed;
        }
        if multiplier == 0.0 {
            self.pause();
            return self.speed;
        }
        let applied = multiplier.clamp(MIN_SPEED, self.max_speed);
        self.speed = applied;
        self.last_running_speed = applied;
        debug!(speed = applied, "Clock speed set");
        applied
    }

    /// Current speed multiplier; `0.0` while paused.
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    /// Whether the clock is paused.
    pub const fn is_paused(&self) -> bool {
        self.speed == 0.0
    }

    /// Pause, remembering the current running speed.
    pub const fn pause(&mut self) {
        if !self.is_paused() {
            self.last_running_speed = self.speed;
        }
        self.speed = 0.0;
    }

    /// Resume at the speed in effect before the last pause.
    pub const fn resume(&mut self) {
        self.speed = self.last_running_speed;
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Current calendar position.
    pub const fn calendar(&self) -> Calendar {
        self.calendar
    }

    /// Name of the current season.
    pub fn season_name(&self) -> &str {
        self.seasons
            .get(self.calendar.season_index)
            .map_or("", String::as_str)
    }

    /// Days in each season.
    pub const fn days_per_season(&self) -> u32 {
        self.days_per_season
    }

    /// Number of seasons in a year.
    pub fn seasons_per_year(&self) -> usize {
        self.seasons.len()
    }

    /// Days advanced since construction.
    pub const fn days_elapsed(&self) -> u64 {
        self.days_elapsed
    }

    /// Scaled real seconds not yet turned into a day.
    pub const fn accumulated_seconds(&self) -> f64 {
        self.accumulator
    }
}

fn invalid(reason: &str) -> ClockError {
    ClockError::InvalidConfig {
        reason: reason.to_owned(),
    }
}
