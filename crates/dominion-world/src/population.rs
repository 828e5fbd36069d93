//! The population partition: every cohort of people in the world.
//!
//! A [`PopulationGroup`] is one archetype of one culture and one religion
//! living in one city. The [`PopulationPartition`] owns every group and is
//! the only place where head counts, cultures and religions change. Each
//! such mutation bumps the partition's revision counter, which downstream
//! caches (realm/culture aggregates) compare against to decide whether they
//! are stale.
//!
//! # Invariants
//!
//! - Head counts are unsigned and never go below zero.
//! - [`PopulationPartition::split_group`] conserves the head count exactly:
//!   `source_after + new_group == source_before`.
//! - Groups are never removed. A zero-count group is inert and contributes
//!   nothing to any aggregate.

use std::collections::BTreeMap;

use dominion_types::{Archetype, CityId, CultureId, GroupId, ReligionId};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::demographics::Demographics;
use crate::error::WorldError;

// ---------------------------------------------------------------------------
// SocialStanding
// ---------------------------------------------------------------------------

/// Economic and social scalars of a group.
///
/// Conversion preserves standing: a split copies these values unchanged to
/// the new group and only relabels culture and religion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SocialStanding {
    /// Average wealth per person.
    pub wealth: f64,
    /// Education level in `[0, 1]`.
    pub education: f64,
    /// Religious fervor in `[0, 1]`.
    pub fervor: f64,
    /// Loyalty to the controlling realm in `[0, 1]`.
    pub loyalty: f64,
    /// Happiness in `[0, 1]`.
    pub happiness: f64,
    /// Multiplier applied to natural growth.
    pub growth_modifier: f64,
}

impl Default for SocialStanding {
    fn default() -> Self {
        Self {
            wealth: 10.0,
            education: 0.1,
            fervor: 0.5,
            loyalty: 0.5,
            happiness: 0.5,
            growth_modifier: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// PopulationGroup
// ---------------------------------------------------------------------------

/// A cohort of one archetype, culture and religion within one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationGroup {
    /// Unique group identifier.
    id: GroupId,
    /// The city this group lives in.
    city: CityId,
    /// Occupational class.
    archetype: Archetype,
    /// Head count.
    count: u32,
    /// Culture, if assigned.
    culture: Option<CultureId>,
    /// Religion, if assigned.
    religion: Option<ReligionId>,
    /// Average age in years.
    pub average_age: f64,
    /// Economic and social scalars.
    pub standing: SocialStanding,
    /// Age and sex distribution.
    demographics: Demographics,
}

impl PopulationGroup {
    /// Group identifier.
    pub const fn id(&self) -> GroupId {
        self.id
    }

    /// Owning city.
    pub const fn city(&self) -> CityId {
        self.city
    }

    /// Occupational class.
    pub const fn archetype(&self) -> Archetype {
        self.archetype
    }

    /// Head count.
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Culture, if assigned.
    pub const fn culture(&self) -> Option<CultureId> {
        self.culture
    }

    /// Religion, if assigned.
    pub const fn religion(&self) -> Option<ReligionId> {
        self.religion
    }

    /// Age and sex distribution.
    pub const fn demographics(&self) -> &Demographics {
        &self.demographics
    }

    /// Whether the group holds nobody.
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Parameters for registering a new population group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewGroup {
    /// The city the group lives in.
    pub city: CityId,
    /// Occupational class.
    pub archetype: Archetype,
    /// Head count.
    pub count: u32,
    /// Culture, if any.
    pub culture: Option<CultureId>,
    /// Religion, if any.
    pub religion: Option<ReligionId>,
    /// Average age in years.
    pub average_age: f64,
}

// ---------------------------------------------------------------------------
// PopulationPartition
// ---------------------------------------------------------------------------

/// Owner of every population group in the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationPartition {
    /// All groups keyed by id.
    groups: BTreeMap<GroupId, PopulationGroup>,
    /// Next id to hand out.
    next_id: u64,
    /// Bumped on every count/culture/religion mutation.
    revision: u64,
}

impl Default for PopulationPartition {
    fn default() -> Self {
        Self::new()
    }
}

impl PopulationPartition {
    /// Create an empty partition.
    pub const fn new() -> Self {
        Self {
            groups: BTreeMap::new(),
            next_id: 1,
            revision: 0,
        }
    }

    /// Current mutation revision.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of groups (including empty ones).
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether the partition holds no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    const fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    const fn allocate_id(&mut self) -> GroupId {
        let id = GroupId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// Register a new group and return its id.
    ///
    /// A zero count is accepted; the group is simply inert until something
    /// sets its count.
    pub fn register_population(&mut self, params: NewGroup) -> GroupId {
        let id = self.allocate_id();
        if params.count == 0 {
            debug!(group = %id, city = %params.city, "Registered empty population group");
        }
        let group = PopulationGroup {
            id,
            city: params.city,
            archetype: params.archetype,
            count: params.count,
            culture: params.culture,
            religion: params.religion,
            average_age: params.average_age,
            standing: SocialStanding::default(),
            demographics: Demographics::from_pyramid(params.count),
        };
        self.groups.insert(id, group);
        self.touch();
        id
    }

    /// Look up a group.
    pub fn group(&self, id: GroupId) -> Option<&PopulationGroup> {
        self.groups.get(&id)
    }

    /// Mutable access to a group's social standing.
    ///
    /// Count, culture and religion stay behind the partition's mutators so
    /// that the revision counter tracks every change to them.
    pub fn standing_mut(&mut self, id: GroupId) -> Option<&mut SocialStanding> {
        self.groups.get_mut(&id).map(|g| &mut g.standing)
    }

    /// Lazy, restartable sequence of every group in `city`.
    pub fn groups_by_city(&self, city: CityId) -> impl Iterator<Item = &PopulationGroup> {
        self.groups.values().filter(move |g| g.city == city)
    }

    /// Ids of every group in `city`, for callers that need to mutate while
    /// iterating.
    pub fn group_ids_in_city(&self, city: CityId) -> Vec<GroupId> {
        self.groups_by_city(city).map(PopulationGroup::id).collect()
    }

    /// Every group in id order.
    pub fn all_groups(&self) -> impl Iterator<Item = &PopulationGroup> {
        self.groups.values()
    }

    /// Set a group's head count, renormalizing its demographics.
    pub fn set_count(&mut self, id: GroupId, count: u32) -> Result<(), WorldError> {
        let group = self.groups.get_mut(&id).ok_or(WorldError::GroupNotFound(id))?;
        group.count = count;
        group.demographics.renormalize(count);
        self.touch();
        Ok(())
    }

    /// Relabel a whole group's culture.
    pub fn set_culture(&mut self, id: GroupId, culture: Option<CultureId>) -> Result<(), WorldError> {
        let group = self.groups.get_mut(&id).ok_or(WorldError::GroupNotFound(id))?;
        group.culture = culture;
        self.touch();
        Ok(())
    }

    /// Relabel a whole group's religion.
    pub fn set_religion(
        &mut self,
        id: GroupId,
        religion: Option<ReligionId>,
    ) -> Result<(), WorldError> {
        let group = self.groups.get_mut(&id).ok_or(WorldError::GroupNotFound(id))?;
        group.religion = religion;
        self.touch();
        Ok(())
    }

    /// Move `count_to_move` people out of `source` into a new group with the
    /// target culture and (optionally) a new religion.
    ///
    /// The new group lives in the same city, has the same archetype and
    /// average age, and copies the source's [`SocialStanding`]. When
    /// `target_religion` is `None` the source religion is kept. The source
    /// demographics are scaled by `(C - k) / C` and the new group receives
    /// the `k / C` share; both are then renormalized to their counts.
    ///
    /// # Errors
    ///
    /// [`WorldError::GroupNotFound`] for an unknown source, and
    /// [`WorldError::InvalidSplit`] unless `0 < count_to_move <= count`.
    /// Neither leaves any trace on the partition.
    pub fn split_group(
        &mut self,
        source: GroupId,
        count_to_move: u32,
        target_culture: Option<CultureId>,
        target_religion: Option<ReligionId>,
    ) -> Result<GroupId, WorldError> {
        let original = self
            .groups
            .get(&source)
            .ok_or(WorldError::GroupNotFound(source))?;

        let available = original.count;
        if count_to_move == 0 || count_to_move > available {
            warn!(
                group = %source,
                requested = count_to_move,
                available,
                "Rejected population split"
            );
            return Err(WorldError::InvalidSplit {
                group: source,
                requested: count_to_move,
                available,
            });
        }

        // Checked above: count_to_move <= available.
        let remaining = available.saturating_sub(count_to_move);
        let moved_share = f64::from(count_to_move) / f64::from(available);
        let remaining_share = f64::from(remaining) / f64::from(available);

        let mut moved_demographics = original.demographics.scaled(moved_share);
        moved_demographics.renormalize(count_to_move);
        let template = PopulationGroup {
            id: original.id,
            city: original.city,
            archetype: original.archetype,
            count: count_to_move,
            culture: target_culture,
            religion: target_religion.or(original.religion),
            average_age: original.average_age,
            standing: original.standing,
            demographics: moved_demographics,
        };

        let new_id = self.allocate_id();
        let new_group = PopulationGroup {
            id: new_id,
            ..template
        };

        if let Some(group) = self.groups.get_mut(&source) {
            group.count = remaining;
            group.demographics.scale(remaining_share);
            group.demographics.renormalize(remaining);
        }
        self.groups.insert(new_id, new_group);
        self.touch();

        debug!(
            source = %source,
            new_group = %new_id,
            moved = count_to_move,
            remaining,
            "Split population group"
        );
        Ok(new_id)
    }

    // -----------------------------------------------------------------------
    // Aggregates
    // -----------------------------------------------------------------------

    /// Total people in a city.
    pub fn city_population(&self, city: CityId) -> u64 {
        self.groups_by_city(city).map(|g| u64::from(g.count)).sum()
    }

    /// Total people in the world.
    pub fn total_population(&self) -> u64 {
        self.groups.values().map(|g| u64::from(g.count)).sum()
    }

    /// People of `culture` in `city`.
    pub fn culture_population_in_city(&self, city: CityId, culture: CultureId) -> u64 {
        self.groups_by_city(city)
            .filter(|g| g.culture == Some(culture))
            .map(|g| u64::from(g.count))
            .sum()
    }

    /// Per-culture head counts in `city`, skipping groups without a culture.
    pub fn culture_totals_in_city(&self, city: CityId) -> BTreeMap<CultureId, u64> {
        let mut totals: BTreeMap<CultureId, u64> = BTreeMap::new();
        for group in self.groups_by_city(city) {
            if let Some(culture) = group.culture {
                let entry = totals.entry(culture).or_insert(0);
                *entry = entry.saturating_add(u64::from(group.count));
            }
        }
        totals
    }

    /// Per-religion head counts in `city`, skipping groups without a religion.
    pub fn religion_totals_in_city(&self, city: CityId) -> BTreeMap<ReligionId, u64> {
        let mut totals: BTreeMap<ReligionId, u64> = BTreeMap::new();
        for group in self.groups_by_city(city) {
            if let Some(religion) = group.religion {
                let entry = totals.entry(religion).or_insert(0);
                *entry = entry.saturating_add(u64::from(group.count));
            }
        }
        totals
    }

    /// The culture held by the plurality of `city`'s population.
    ///
    /// Ties go to the lowest culture id. `None` when nobody in the city has
    /// a culture.
    pub fn dominant_culture(&self, city: CityId) -> Option<CultureId> {
        plurality(self.culture_totals_in_city(city))
    }

    /// The religion held by the plurality of `city`'s population.
    ///
    /// Ties go to the lowest religion id.
    pub fn dominant_religion(&self, city: CityId) -> Option<ReligionId> {
        plurality(self.religion_totals_in_city(city))
    }
}

/// Pick the key with the largest non-zero total; ties keep the lowest key.
pub fn plurality<K: Ord + Copy>(totals: BTreeMap<K, u64>) -> Option<K> {
    let mut best: Option<(K, u64)> = None;
    for (key, total) in totals {
        if total == 0 {
            continue;
        }
        match best {
            Some((_, best_total)) if total <= best_total => {}
            _ => best = Some((key, total)),
        }
    }
    best.map(|(key, _)| key)
}
