//! Cities and their controlling realms.
//!
//! A city's controlling realm is what joins population to realms for
//! ownership queries, so changing it bumps the registry revision the same
//! way a population mutation bumps the partition revision. The dominant
//! culture and religion stored on each city are derived values refreshed by
//! the yearly passes and do not affect the revision.

use std::collections::BTreeMap;

use dominion_types::{CityId, CultureId, RealmId, ReligionId};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::WorldError;

/// A settlement holding population groups and buildings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    /// Unique city identifier.
    pub id: CityId,
    /// Display name.
    pub name: String,
    /// Realm controlling the city, if any.
    controlling_realm: Option<RealmId>,
    /// Culture of the population plurality, as of the last recomputation.
    pub dominant_culture: Option<CultureId>,
    /// Religion of the population plurality, as of the last recomputation.
    pub dominant_religion: Option<ReligionId>,
}

impl City {
    /// Create a city with no cached dominant culture or religion.
    pub fn new(id: CityId, name: &str, controlling_realm: Option<RealmId>) -> Self {
        Self {
            id,
            name: name.to_owned(),
            controlling_realm,
            dominant_culture: None,
            dominant_religion: None,
        }
    }

    /// Realm controlling the city, if any.
    pub const fn controlling_realm(&self) -> Option<RealmId> {
        self.controlling_realm
    }
}

/// Registry of every city.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CityRegistry {
    /// Cities keyed by id.
    cities: BTreeMap<CityId, City>,
    /// Bumped whenever a city is added or changes hands.
    revision: u64,
}

impl CityRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            cities: BTreeMap::new(),
            revision: 0,
        }
    }

    /// Current mutation revision.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Add a city.
    ///
    /// # Errors
    ///
    /// [`WorldError::DuplicateCity`] if the id is taken.
    pub fn insert(&mut self, city: City) -> Result<(), WorldError> {
        if self.cities.contains_key(&city.id) {
            return Err(WorldError::DuplicateCity(city.id));
        }
        self.cities.insert(city.id, city);
        self.revision = self.revision.wrapping_add(1);
        Ok(())
    }

    /// Look up a city.
    pub fn get(&self, id: CityId) -> Option<&City> {
        self.cities.get(&id)
    }

    /// Mutable access to a city's derived fields.
    pub fn get_mut(&mut self, id: CityId) -> Option<&mut City> {
        self.cities.get_mut(&id)
    }

    /// Realm controlling `id`, or `None` for unknown or uncontrolled cities.
    pub fn controlling_realm(&self, id: CityId) -> Option<RealmId> {
        self.cities.get(&id).and_then(City::controlling_realm)
    }

    /// Hand a city to a new controller (or to nobody).
    pub fn set_controller(&mut self, id: CityId, realm: Option<RealmId>) -> Result<(), WorldError> {
        let city = self.cities.get_mut(&id).ok_or(WorldError::CityNotFound(id))?;
        if city.controlling_realm != realm {
            info!(city = %id, from = ?city.controlling_realm, to = ?realm, "City changed hands");
            city.controlling_realm = realm;
            self.revision = self.revision.wrapping_add(1);
        }
        Ok(())
    }

    /// Every city id in ascending order.
    pub fn ids(&self) -> Vec<CityId> {
        self.cities.keys().copied().collect()
    }

    /// Every city in id order.
    pub fn iter(&self) -> impl Iterator<Item = &City> {
        self.cities.values()
    }

    /// Number of cities.
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn insert_rejects_duplicates() {
        let mut registry = CityRegistry::new();
        registry.insert(City::new(CityId(1), "Ur", Some(RealmId(1)))).unwrap();
        assert_eq!(
            registry.insert(City::new(CityId(1), "Uruk", None)),
            Err(WorldError::DuplicateCity(CityId(1)))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn changing_hands_bumps_revision_once() {
        let mut registry = CityRegistry::new();
        registry.insert(City::new(CityId(1), "Ur", Some(RealmId(1)))).unwrap();
        let before = registry.revision();

        registry.set_controller(CityId(1), Some(RealmId(1))).unwrap();
        assert_eq!(registry.revision(), before);

        registry.set_controller(CityId(1), Some(RealmId(2))).unwrap();
        assert_eq!(registry.revision(), before + 1);
        assert_eq!(registry.controlling_realm(CityId(1)), Some(RealmId(2)));
        assert!(registry.set_controller(CityId(9), None).is_err());
    }

    #[test]
    fn unknown_city_has_no_controller() {
        let registry = CityRegistry::new();
        assert_eq!(registry.controlling_realm(CityId(3)), None);
    }
}
