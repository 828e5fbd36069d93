//! Religions and their resistance to conversion.

use std::collections::BTreeMap;

use dominion_types::ReligionId;
use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// A faith followed by population groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Religion {
    /// Unique religion identifier.
    pub id: ReligionId,
    /// Display name.
    pub name: String,
    /// Fraction of conversion pressure this faith's followers shrug off, in `[0, 1]`.
    pub conversion_resistance: f64,
}

impl Religion {
    /// Create a religion; resistance is clamped to `[0, 1]`.
    pub fn new(id: ReligionId, name: &str, conversion_resistance: f64) -> Self {
        Self {
            id,
            name: name.to_owned(),
            conversion_resistance: conversion_resistance.clamp(0.0, 1.0),
        }
    }
}

/// Registry of every religion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReligionRegistry {
    /// Religions keyed by id.
    religions: BTreeMap<ReligionId, Religion>,
}

impl ReligionRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            religions: BTreeMap::new(),
        }
    }

    /// Add a religion.
    pub fn insert(&mut self, religion: Religion) -> Result<(), WorldError> {
        if self.religions.contains_key(&religion.id) {
            return Err(WorldError::DuplicateReligion(religion.id));
        }
        self.religions.insert(religion.id, religion);
        Ok(())
    }

    /// Look up a religion.
    pub fn get(&self, id: ReligionId) -> Option<&Religion> {
        self.religions.get(&id)
    }

    /// Conversion resistance of `id`, or `0.0` for unknown religions.
    pub fn resistance(&self, id: ReligionId) -> f64 {
        self.religions.get(&id).map_or(0.0, |r| r.conversion_resistance)
    }

    /// Every religion in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Religion> {
        self.religions.values()
    }
}
