//! Age and sex distribution carried by every population group.
//!
//! The distribution is stored as fractional buckets (8 age brackets × 2
//! sexes) so that group splits can scale it multiplicatively. After every
//! split the partition renormalizes each distribution to its group's integer
//! count, so repeated conversions never accumulate floating-point drift
//! against the authoritative head count.

use serde::{Deserialize, Serialize};

/// Number of age brackets.
pub const NUM_BRACKETS: usize = 8;

/// Width in years of each age bracket. The last bracket is open-ended.
pub const BRACKET_WIDTHS: [u32; NUM_BRACKETS] = [6, 10, 25, 20, 15, 15, 9, u32::MAX];

/// Human-readable bracket labels.
pub const BRACKET_LABELS: [&str; NUM_BRACKETS] = [
    "infant",
    "child",
    "young_adult",
    "middle_age",
    "elder",
    "aged",
    "ancient",
    "centenarian",
];

/// Pre-modern age pyramid used to seed new groups.
const PYRAMID_WEIGHTS: [f64; NUM_BRACKETS] = [0.12, 0.18, 0.30, 0.20, 0.12, 0.06, 0.02, 0.00];

/// Fractional population by age bracket and sex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    /// Male head count per bracket.
    male: [f64; NUM_BRACKETS],
    /// Female head count per bracket.
    female: [f64; NUM_BRACKETS],
}

impl Default for Demographics {
    fn default() -> Self {
        Self::empty()
    }
}

impl Demographics {
    /// A distribution with no people.
    pub const fn empty() -> Self {
        Self {
            male: [0.0; NUM_BRACKETS],
            female: [0.0; NUM_BRACKETS],
        }
    }

    /// Distribute `total` people over the default pyramid, split evenly by sex.
    pub fn from_pyramid(total: u32) -> Self {
        let half = f64::from(total) / 2.0;
        let mut demographics = Self::empty();
        for ((m, f), weight) in demographics
            .male
            .iter_mut()
            .zip(demographics.female.iter_mut())
            .zip(PYRAMID_WEIGHTS)
        {
            *m = half * weight;
            *f = half * weight;
        }
        demographics
    }

    /// Total people across every bucket.
    pub fn total(&self) -> f64 {
        self.male.iter().chain(self.female.iter()).sum()
    }

    /// Male head count per bracket.
    pub const fn male(&self) -> &[f64; NUM_BRACKETS] {
        &self.male
    }

    /// Female head count per bracket.
    pub const fn female(&self) -> &[f64; NUM_BRACKETS] {
        &self.female
    }

    /// `(male, female)` for one bracket, if the index is in range.
    pub fn bracket(&self, index: usize) -> Option<(f64, f64)> {
        Some((*self.male.get(index)?, *self.female.get(index)?))
    }

    /// Multiply every bucket by `ratio`. Negative ratios are treated as zero.
    pub fn scale(&mut self, ratio: f64) {
        let ratio = ratio.max(0.0);
        for bucket in self.male.iter_mut().chain(self.female.iter_mut()) {
            *bucket *= ratio;
        }
    }

    /// A copy of this distribution multiplied by `ratio`.
    #[must_use]
    pub fn scaled(&self, ratio: f64) -> Self {
        let mut copy = self.clone();
        copy.scale(ratio);
        copy
    }

    /// Rescale so the total equals `target` exactly (up to float precision).
    ///
    /// An empty distribution with a non-zero target is reseeded from the
    /// default pyramid.
    pub fn renormalize(&mut self, target: u32) {
        let total = self.total();
        if target == 0 {
            *self = Self::empty();
        } else if total <= f64::EPSILON {
            *self = Self::from_pyramid(target);
        } else {
            self.scale(f64::from(target) / total);
        }
    }
}
