//! Realm ownership of culture tech trees.
//!
//! The realm that controls the largest number of people of a culture owns
//! all of that culture's trees. The [`OwnershipResolver`] answers that query
//! from a cached `(realm, culture) -> population` table, rebuilt lazily when
//! the population source's revision changes or when it is explicitly
//! invalidated.
//!
//! Ties are broken toward the lowest realm id so repeated resolutions on
//! unchanged data always agree.

use std::collections::BTreeMap;

use dominion_types::{CultureId, RealmId, TreeType};
use dominion_world::{PopulationSource, plurality};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::culture::CultureRegistry;

/// Key of the realm/culture population cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RealmCultureKey {
    /// The realm.
    pub realm: RealmId,
    /// The culture.
    pub culture: CultureId,
}

/// A tree whose owner changed during an ownership update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipChange {
    /// Culture whose tree changed hands.
    pub culture: CultureId,
    /// The tree that changed hands.
    pub tree_type: TreeType,
    /// Owner before the update.
    pub previous: Option<RealmId>,
    /// Owner after the update.
    pub current: Option<RealmId>,
}

/// Cached resolver of realm/culture population totals.
#[derive(Debug, Clone)]
pub struct OwnershipResolver {
    /// Population per (realm, culture); only non-zero entries are kept.
    cache: BTreeMap<RealmCultureKey, u64>,
    /// Forces a rebuild on the next query.
    dirty: bool,
    /// Source revision the cache was built from.
    built_from: Option<u64>,
    /// Number of rebuilds performed.
    rebuild_count: u64,
}

impl Default for OwnershipResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl OwnershipResolver {
    /// Create a resolver that will build its cache on first use.
    pub const fn new() -> Self {
        Self {
            cache: BTreeMap::new(),
            dirty: true,
            built_from: None,
            rebuild_count: 0,
        }
    }

    /// Force a rebuild on the next query.
    pub const fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// How many times the cache has been rebuilt.
    pub const fn rebuild_count(&self) -> u64 {
        self.rebuild_count
    }

    /// Rebuild the cache if it is dirty or the source changed.
    fn refresh<S: PopulationSource>(&mut self, source: &S) {
        let revision = source.revision();
        if !self.dirty && self.built_from == Some(revision) {
            return;
        }

        self.cache.clear();
        for group in source.all_groups() {
            let Some(culture) = group.culture() else {
                continue;
            };
            let Some(realm) = source.city_owner_realm(group.city()) else {
                continue;
            };
            if group.count() == 0 {
                continue;
            }
            let entry = self
                .cache
                .entry(RealmCultureKey { realm, culture })
                .or_insert(0);
            *entry = entry.saturating_add(u64::from(group.count()));
        }

        self.dirty = false;
        self.built_from = Some(revision);
        self.rebuild_count = self.rebuild_count.saturating_add(1);
        debug!(
            entries = self.cache.len(),
            revision,
            rebuilds = self.rebuild_count,
            "Ownership cache rebuilt"
        );
    }

    /// Total people of `culture` in cities controlled by `realm`.
    pub fn realm_culture_population<S: PopulationSource>(
        &mut self,
        source: &S,
        realm: RealmId,
        culture: CultureId,
    ) -> u64 {
        self.refresh(source);
        self.cache
            .get(&RealmCultureKey { realm, culture })
            .copied()
            .unwrap_or(0)
    }

    /// The realm controlling the most people of `culture`.
    ///
    /// `None` if no controlled city holds any of that culture. Ties go to
    /// the lowest realm id.
    pub fn realm_with_largest_culture_population<S: PopulationSource>(
        &mut self,
        source: &S,
        culture: CultureId,
    ) -> Option<RealmId> {
        self.refresh(source);
        let totals: BTreeMap<RealmId, u64> = self
            .cache
            .iter()
            .filter(|(key, _)| key.culture == culture)
            .map(|(key, total)| (key.realm, *total))
            .collect();
        plurality(totals)
    }

    /// Reassign the owner of every tree of every culture.
    ///
    /// Returns the trees whose owner changed. Running it twice on unchanged
    /// data yields no changes the second time.
    pub fn update_culture_ownership<S: PopulationSource>(
        &mut self,
        source: &S,
        cultures: &mut CultureRegistry,
    ) -> Vec<OwnershipChange> {
        let mut changes = Vec::new();
        for id in cultures.ids() {
            let owner = self.realm_with_largest_culture_population(source, id);
            let Some(culture) = cultures.get_mut(id) else {
                continue;
            };
            for tree in culture.trees_mut() {
                let previous = tree.owner_realm();
                if previous == owner {
                    continue;
                }
                tree.set_owner_realm(owner);
                info!(
                    culture = %id,
                    tree = %tree.tree_type(),
                    previous = ?previous,
                    current = ?owner,
                    "Tech tree changed hands"
                );
                changes.push(OwnershipChange {
                    culture: id,
                    tree_type: tree.tree_type(),
                    previous,
                    current: owner,
                });
            }
        }
        changes
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use dominion_types::{Archetype, CityId};
    use dominion_world::{City, NewGroup, WorldState};

    use super::*;
    use crate::config::ProgressionConfig;
    use crate::culture::CultureData;

    fn group(city: u32, culture: u32, count: u32) -> NewGroup {
        NewGroup {
            city: CityId(city),
            archetype: Archetype::Laborer,
            count,
            culture: Some(CultureId(culture)),
            religion: None,
            average_age: 30.0,
        }
    }

    fn world() -> WorldState {
        let mut world = WorldState::new();
        world.cities.insert(City::new(CityId(1), "Ur", Some(RealmId(1)))).unwrap();
        world.cities.insert(City::new(CityId(2), "Kish", Some(RealmId(2)))).unwrap();
        world.cities.insert(City::new(CityId(3), "Wilds", None)).unwrap();
        world.population.register_population(group(1, 1, 300));
        world.population.register_population(group(2, 1, 500));
        world.population.register_population(group(3, 1, 9000));
        world.population.register_population(group(2, 2, 100));
        world
    }

    #[test]
    fn largest_controlled_population_wins() {
        let world = world();
        let mut resolver = OwnershipResolver::new();
        assert_eq!(
            resolver.realm_with_largest_culture_population(&world, CultureId(1)),
            Some(RealmId(2))
        );
        assert_eq!(resolver.realm_culture_population(&world, RealmId(1), CultureId(1)), 300);
        assert_eq!(
            resolver.realm_with_largest_culture_population(&world, CultureId(9)),
            None
        );
    }

    #[test]
    fn ties_go_to_lowest_realm() {
        let mut world = world();
        world.population.register_population(group(1, 1, 200));
        let mut resolver = OwnershipResolver::new();
        assert_eq!(
            resolver.realm_with_largest_culture_population(&world, CultureId(1)),
            Some(RealmId(1))
        );
    }

    #[test]
    fn cache_rebuilds_only_on_change() {
        let mut world = world();
        let mut resolver = OwnershipResolver::new();
        resolver.realm_with_largest_culture_population(&world, CultureId(1));
        resolver.realm_with_largest_culture_population(&world, CultureId(2));
        assert_eq!(resolver.rebuild_count(), 1);

        world.cities.set_controller(CityId(3), Some(RealmId(1))).unwrap();
        assert_eq!(
            resolver.realm_with_largest_culture_population(&world, CultureId(1)),
            Some(RealmId(1))
        );
        assert_eq!(resolver.rebuild_count(), 2);

        resolver.invalidate();
        resolver.realm_with_largest_culture_population(&world, CultureId(1));
        assert_eq!(resolver.rebuild_count(), 3);
    }

    #[test]
    fn ownership_update_is_idempotent() {
        let world = world();
        let mut cultures = CultureRegistry::new();
        let config = ProgressionConfig::default();
        cultures.insert(CultureData::new(CultureId(1), "A", &config)).unwrap();
        cultures.insert(CultureData::new(CultureId(2), "B", &config)).unwrap();
        cultures.insert(CultureData::new(CultureId(3), "Nobody", &config)).unwrap();

        let mut resolver = OwnershipResolver::new();
        let changes = resolver.update_culture_ownership(&world, &mut cultures);
        // Two cultures with a controlling realm, five trees each.
        assert_eq!(changes.len(), 10);
        for tree in cultures.get(CultureId(1)).unwrap().trees() {
            assert_eq!(tree.owner_realm(), Some(RealmId(2)));
        }
        for tree in cultures.get(CultureId(3)).unwrap().trees() {
            assert_eq!(tree.owner_realm(), None);
        }

        assert!(resolver.update_culture_ownership(&world, &mut cultures).is_empty());
    }
}
