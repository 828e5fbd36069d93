//! Calendar values: era-aware years and the day/season/year triple.
//!
//! Years follow the historical convention: negative values are BC, positive
//! values are AD, and there is no year zero. 1 BC is followed directly by
//! AD 1.

use serde::{Deserialize, Serialize};

use crate::enums::Era;

/// Error returned when constructing a [`Year`] from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearZero;

impl core::fmt::Display for YearZero {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("year zero does not exist")
    }
}

impl std::error::Error for YearZero {}

/// A calendar year. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Year(i32);

impl Year {
    /// The first year of the common era.
    pub const AD_1: Self = Self(1);

    /// The last year before the common era.
    pub const BC_1: Self = Self(-1);

    /// Create a year from a signed value. Returns `None` for zero.
    pub const fn new(value: i32) -> Option<Self> {
        if value == 0 { None } else { Some(Self(value)) }
    }

    /// Signed value: negative for BC, positive for AD.
    pub const fn value(self) -> i32 {
        self.0
    }

    /// The era this year belongs to.
    pub const fn era(self) -> Era {
        if self.0 < 0 { Era::BeforeCommon } else { Era::Common }
    }

    /// The year that follows this one, skipping year zero.
    pub const fn next(self) -> Self {
        match self.0 {
            -1 => Self::AD_1,
            v => Self(v.saturating_add(1)),
        }
    }

    /// The year before this one, skipping year zero.
    pub const fn previous(self) -> Self {
        match self.0 {
            1 => Self::BC_1,
            v => Self(v.saturating_sub(1)),
        }
    }
}

impl TryFrom<i32> for Year {
    type Error = YearZero;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(YearZero)
    }
}

impl From<Year> for i32 {
    fn from(year: Year) -> Self {
        year.0
    }
}

impl core::fmt::Display for Year {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.era() {
            Era::BeforeCommon => write!(f, "{} BC", self.0.unsigned_abs()),
            Era::Common => write!(f, "AD {}", self.0),
        }
    }
}

/// A point on the simulation calendar.
///
/// `day` is 1-based within the season; `season_index` is 0-based within the
/// year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Calendar {
    /// Day within the current season (1-based).
    pub day: u32,
    /// Index of the current season (0-based).
    pub season_index: usize,
    /// Current year.
    pub year: Year,
}

impl Calendar {
    /// The first day of the first season of `year`.
    pub const fn start_of(year: Year) -> Self {
        Self {
            day: 1,
            season_index: 0,
            year,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_not_a_year() {
        assert!(Year::new(0).is_none());
        assert!(Year::try_from(0).is_err());
    }

    #[test]
    fn one_bc_is_followed_by_ad_one() {
        assert_eq!(Year::BC_1.next(), Year::AD_1);
        assert_eq!(Year::AD_1.previous(), Year::BC_1);
        assert_eq!(Year::new(-2).unwrap().next(), Year::BC_1);
        assert_eq!(Year::new(7).unwrap().next().value(), 8);
    }

    #[test]
    fn era_follows_sign() {
        assert_eq!(Year::new(-500).unwrap().era(), Era::BeforeCommon);
        assert_eq!(Year::new(1066).unwrap().era(), Era::Common);
    }

    #[test]
    fn display_uses_era_suffix() {
        assert_eq!(Year::new(-500).unwrap().to_string(), "500 BC");
        assert_eq!(Year::new(12).unwrap().to_string(), "AD 12");
    }

    #[test]
    fn serde_rejects_year_zero() {
        let ok: Result<Year, _> = serde_json::from_str("-44");
        assert_eq!(ok.unwrap().value(), -44);
        let bad: Result<Year, _> = serde_json::from_str("0");
        assert!(bad.is_err());
    }
}
