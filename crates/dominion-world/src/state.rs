//! The shared world state every subsystem agent reads and mutates.
//!
//! [`WorldState`] bundles the population partition with the registries it is
//! joined against. It implements [`PopulationSource`], the read-only seam
//! used by ownership queries, so those queries can also run against other
//! providers in tests.

use dominion_types::{CityId, RealmId};
use serde::{Deserialize, Serialize};

use crate::building::BuildingRegistry;
use crate::city::CityRegistry;
use crate::population::{PopulationGroup, PopulationPartition};
use crate::realm::RealmRegistry;
use crate::religion::ReligionRegistry;

/// Read-only population collaborator.
pub trait PopulationSource {
    /// Every group living in `city`.
    fn groups_by_city(&self, city: CityId) -> impl Iterator<Item = &PopulationGroup>;

    /// Every group in the world.
    fn all_groups(&self) -> impl Iterator<Item = &PopulationGroup>;

    /// Realm controlling `city`, or `None`.
    fn city_owner_realm(&self, city: CityId) -> Option<RealmId>;

    /// Counter that changes whenever any group's count, culture or religion
    /// changes, or any city changes hands.
    fn revision(&self) -> u64;
}

/// All mutable world data shared by the subsystem agents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldState {
    /// Every population group.
    pub population: PopulationPartition,
    /// Every city.
    pub cities: CityRegistry,
    /// Every realm.
    pub realms: RealmRegistry,
    /// Every religion.
    pub religions: ReligionRegistry,
    /// Building definitions and instances.
    pub buildings: BuildingRegistry,
}

impl WorldState {
    /// Create an empty world.
    pub const fn new() -> Self {
        Self {
            population: PopulationPartition::new(),
            cities: CityRegistry::new(),
            realms: RealmRegistry::new(),
            religions: ReligionRegistry::new(),
            buildings: BuildingRegistry::new(),
        }
    }

    /// Recompute and store the dominant culture and religion of `city`.
    pub fn refresh_city_dominance(&mut self, city: CityId) {
        let culture = self.population.dominant_culture(city);
        let religion = self.population.dominant_religion(city);
        if let Some(record) = self.cities.get_mut(city) {
            record.dominant_culture = culture;
            record.dominant_religion = religion;
        }
    }

    /// Recompute the dominant culture and religion of every city.
    pub fn refresh_all_dominance(&mut self) {
        for city in self.cities.ids() {
            self.refresh_city_dominance(city);
        }
    }
}

impl PopulationSource for WorldState {
    fn groups_by_city(&self, city: CityId) -> impl Iterator<Item = &PopulationGroup> {
        self.population.groups_by_city(city)
    }

    fn all_groups(&self) -> impl Iterator<Item = &PopulationGroup> {
        self.population.all_groups()
    }

    fn city_owner_realm(&self, city: CityId) -> Option<RealmId> {
        self.cities.controlling_realm(city)
    }

    fn revision(&self) -> u64 {
        self.population
            .revision()
            .wrapping_add(self.cities.revision())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use dominion_types::{Archetype, CultureId};

    use super::*;
    use crate::city::City;
    use crate::population::NewGroup;

    #[test]
    fn revision_tracks_population_and_city_changes() {
        let mut world = WorldState::new();
        world
            .cities
            .insert(City::new(CityId(1), "Ur", Some(RealmId(1))))
            .unwrap();
        let r0 = world.revision();

        world.population.register_population(NewGroup {
            city: CityId(1),
            archetype: Archetype::Laborer,
            count: 10,
            culture: Some(CultureId(1)),
            religion: None,
            average_age: 25.0,
        });
        let r1 = world.revision();
        assert_ne!(r0, r1);

        world.cities.set_controller(CityId(1), Some(RealmId(2))).unwrap();
        assert_ne!(world.revision(), r1);
        assert_eq!(world.city_owner_realm(CityId(1)), Some(RealmId(2)));
    }

    #[test]
    fn refresh_stores_dominant_culture() {
        let mut world = WorldState::new();
        world.cities.insert(City::new(CityId(1), "Ur", None)).unwrap();
        world.population.register_population(NewGroup {
            city: CityId(1),
            archetype: Archetype::Laborer,
            count: 10,
            culture: Some(CultureId(3)),
            religion: None,
            average_age: 25.0,
        });
        world.refresh_all_dominance();
        let city = world.cities.get(CityId(1)).unwrap();
        assert_eq!(city.dominant_culture, Some(CultureId(3)));
        assert_eq!(city.dominant_religion, None);
    }
}
