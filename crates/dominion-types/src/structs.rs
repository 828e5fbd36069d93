//! Small shared value structs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A bag of named numeric modifiers (e.g. `"production"` → `0.1`).
///
/// Granted by tech nodes and pillars; aggregated by summing per key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModifierSet(BTreeMap<String, f64>);

impl ModifierSet {
    /// Create an empty modifier set.
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style insertion, adding to any existing value for `key`.
    #[must_use]
    pub fn with(mut self, key: &str, value: f64) -> Self {
        self.add(key, value);
        self
    }

    /// Add `value` to the modifier named `key`.
    pub fn add(&mut self, key: &str, value: f64) {
        let entry = self.0.entry(key.to_owned()).or_insert(0.0);
        *entry += value;
    }

    /// Merge every modifier from `other` into this set.
    pub fn merge(&mut self, other: &Self) {
        for (key, value) in &other.0 {
            self.add(key, *value);
        }
    }

    /// Return the value of a modifier, or `0.0` if absent.
    pub fn get(&self, key: &str) -> f64 {
        self.0.get(key).copied().unwrap_or(0.0)
    }

    /// Whether the set holds no modifiers.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
