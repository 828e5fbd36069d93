//! Realms: the controlling authorities over cities.

use std::collections::BTreeMap;

use dominion_types::{CultureId, RealmId, ReligionId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::WorldError;

/// A realm and the identity of its ruler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Realm {
    /// Unique realm identifier.
    pub id: RealmId,
    /// Display name.
    pub name: String,
    /// Culture of the realm's leader. Unset until explicitly assigned.
    pub leader_culture: Option<CultureId>,
    /// Official religion of the realm, if any.
    pub state_religion: Option<ReligionId>,
}

impl Realm {
    /// Create a realm with no leader culture and no state religion.
    pub fn new(id: RealmId, name: &str) -> Self {
        Self {
            id,
            name: name.to_owned(),
            leader_culture: None,
            state_religion: None,
        }
    }
}

/// Registry of every realm.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RealmRegistry {
    /// Realms keyed by id.
    realms: BTreeMap<RealmId, Realm>,
}

impl RealmRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            realms: BTreeMap::new(),
        }
    }

    /// Add a realm.
    pub fn insert(&mut self, realm: Realm) -> Result<(), WorldError> {
        if self.realms.contains_key(&realm.id) {
            return Err(WorldError::DuplicateRealm(realm.id));
        }
        self.realms.insert(realm.id, realm);
        Ok(())
    }

    /// Look up a realm.
    pub fn get(&self, id: RealmId) -> Option<&Realm> {
        self.realms.get(&id)
    }

    /// Mutable access to a realm.
    pub fn get_mut(&mut self, id: RealmId) -> Option<&mut Realm> {
        self.realms.get_mut(&id)
    }

    /// Assign the culture of a realm's leader.
    pub fn set_leader_culture(
        &mut self,
        id: RealmId,
        culture: Option<CultureId>,
    ) -> Result<(), WorldError> {
        let realm = self.realms.get_mut(&id).ok_or(WorldError::RealmNotFound(id))?;
        debug!(realm = %id, culture = ?culture, "Leader culture assigned");
        realm.leader_culture = culture;
        Ok(())
    }

    /// Assign a realm's state religion.
    pub fn set_state_religion(
        &mut self,
        id: RealmId,
        religion: Option<ReligionId>,
    ) -> Result<(), WorldError> {
        let realm = self.realms.get_mut(&id).ok_or(WorldError::RealmNotFound(id))?;
        realm.state_religion = religion;
        Ok(())
    }

    /// Leader culture of `id`; `None` for unknown realms or unset leaders.
    pub fn leader_culture(&self, id: RealmId) -> Option<CultureId> {
        self.realms.get(&id).and_then(|r| r.leader_culture)
    }

    /// State religion of `id`; `None` for unknown realms or no religion.
    pub fn state_religion(&self, id: RealmId) -> Option<ReligionId> {
        self.realms.get(&id).and_then(|r| r.state_religion)
    }

    /// Every realm in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Realm> {
        self.realms.values()
    }

    /// Number of realms.
    pub fn len(&self) -> usize {
        self.realms.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.realms.is_empty()
    }
}
