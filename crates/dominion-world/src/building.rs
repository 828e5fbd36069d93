//! Building definitions, placed instances and construction progress.
//!
//! A [`BuildingDefinition`] is static content: which tree type its output
//! feeds, how much XP it generates per month, and how efficiently each
//! archetype works in it. A [`BuildingInstance`] is a placed copy in a city
//! with its own worker assignment, active flag and construction progress.
//!
//! The [`BuildingSource`] trait is the read-only seam the culture XP pass
//! consumes; [`BuildingRegistry`] is the in-memory implementation.

use std::collections::BTreeMap;

use dominion_types::{Archetype, BuildingDefId, BuildingId, CityId, TreeType};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::WorldError;

/// Worker efficiency used for archetypes a definition does not list.
pub const DEFAULT_WORKER_EFFICIENCY: f64 = 1.0;

// ---------------------------------------------------------------------------
// BuildingDefinition
// ---------------------------------------------------------------------------

/// Static description of a building type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingDefinition {
    /// Stable definition identifier.
    pub id: BuildingDefId,
    /// Display name.
    pub name: String,
    /// Tree type that receives this building's XP.
    pub tree_type: TreeType,
    /// XP produced per month regardless of staffing.
    pub base_monthly_xp: f64,
    /// XP produced per month by each fully efficient worker.
    pub xp_per_worker: f64,
    /// Per-archetype efficiency multiplier.
    pub worker_efficiency: BTreeMap<Archetype, f64>,
    /// Days of construction before the building becomes productive.
    pub construction_days: u32,
}

impl BuildingDefinition {
    /// Efficiency of `archetype` in this building.
    pub fn worker_efficiency(&self, archetype: Archetype) -> f64 {
        self.worker_efficiency
            .get(&archetype)
            .copied()
            .unwrap_or(DEFAULT_WORKER_EFFICIENCY)
    }

    /// Monthly XP for the given worker assignment.
    ///
    /// `base + Σ workers(a) × xp_per_worker × efficiency(a)`.
    pub fn monthly_xp(&self, workers: &BTreeMap<Archetype, u32>) -> f64 {
        let staffed: f64 = workers
            .iter()
            .map(|(archetype, count)| {
                f64::from(*count) * self.xp_per_worker * self.worker_efficiency(*archetype)
            })
            .sum();
        self.base_monthly_xp + staffed
    }
}

// ---------------------------------------------------------------------------
// BuildingInstance
// ---------------------------------------------------------------------------

/// A building placed in a city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingInstance {
    /// Unique instance identifier.
    pub id: BuildingId,
    /// Definition this instance was built from.
    pub definition: BuildingDefId,
    /// City the building stands in.
    pub city: CityId,
    /// Whether the building is operating (or, while incomplete, under construction).
    pub active: bool,
    /// Whether construction has finished.
    pub completed: bool,
    /// Days of construction performed so far.
    pub construction_progress_days: u32,
    /// Assigned workers by archetype.
    pub workers: BTreeMap<Archetype, u32>,
}

impl BuildingInstance {
    /// Whether this building currently produces output.
    pub const fn is_productive(&self) -> bool {
        self.active && self.completed
    }

    /// Total assigned workers.
    pub fn worker_count(&self) -> u64 {
        self.workers.values().map(|n| u64::from(*n)).sum()
    }
}

// ---------------------------------------------------------------------------
// BuildingSource
// ---------------------------------------------------------------------------

/// Read-only access to buildings for the XP distribution pass.
pub trait BuildingSource {
    /// Every placed building instance.
    fn building_instances(&self) -> impl Iterator<Item = &BuildingInstance>;

    /// Look up a building definition.
    fn definition(&self, id: BuildingDefId) -> Option<&BuildingDefinition>;
}

// ---------------------------------------------------------------------------
// BuildingRegistry
// ---------------------------------------------------------------------------

/// In-memory store of building definitions and placed instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingRegistry {
    /// Definitions keyed by id.
    definitions: BTreeMap<BuildingDefId, BuildingDefinition>,
    /// Instances keyed by id.
    instances: BTreeMap<BuildingId, BuildingInstance>,
    /// Next instance id to hand out.
    next_id: u64,
}

impl Default for BuildingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildingRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            definitions: BTreeMap::new(),
            instances: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Register a building definition.
    pub fn define(&mut self, definition: BuildingDefinition) -> Result<(), WorldError> {
        if self.definitions.contains_key(&definition.id) {
            return Err(WorldError::DuplicateBuildingDefinition(definition.id));
        }
        self.definitions.insert(definition.id, definition);
        Ok(())
    }

    /// Place a new, unstaffed instance of `definition` in `city`.
    ///
    /// Definitions with zero construction days are completed immediately.
    pub fn place(&mut self, definition: BuildingDefId, city: CityId) -> Result<BuildingId, WorldError> {
        let def = self
            .definitions
            .get(&definition)
            .ok_or(WorldError::BuildingDefinitionNotFound(definition))?;
        let completed = def.construction_days == 0;

        let id = BuildingId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.instances.insert(
            id,
            BuildingInstance {
                id,
                definition,
                city,
                active: true,
                completed,
                construction_progress_days: 0,
                workers: BTreeMap::new(),
            },
        );
        debug!(building = %id, definition = %definition, city = %city, "Building placed");
        Ok(id)
    }

    /// Set the number of workers of one archetype in a building.
    pub fn assign_workers(
        &mut self,
        id: BuildingId,
        archetype: Archetype,
        count: u32,
    ) -> Result<(), WorldError> {
        let instance = self.instances.get_mut(&id).ok_or(WorldError::BuildingNotFound(id))?;
        if count == 0 {
            instance.workers.remove(&archetype);
        } else {
            instance.workers.insert(archetype, count);
        }
        Ok(())
    }

    /// Switch a building on or off.
    pub fn set_active(&mut self, id: BuildingId, active: bool) -> Result<(), WorldError> {
        let instance = self.instances.get_mut(&id).ok_or(WorldError::BuildingNotFound(id))?;
        instance.active = active;
        Ok(())
    }

    /// Look up an instance.
    pub fn instance(&self, id: BuildingId) -> Option<&BuildingInstance> {
        self.instances.get(&id)
    }

    /// Advance construction of every active, incomplete building by one day.
    ///
    /// Returns the ids of buildings completed by this step.
    pub fn advance_construction(&mut self) -> Vec<BuildingId> {
        let mut finished = Vec::new();
        for instance in self.instances.values_mut() {
            if instance.completed || !instance.active {
                continue;
            }
            let required = self
                .definitions
                .get(&instance.definition)
                .map_or(0, |d| d.construction_days);
            instance.construction_progress_days =
                instance.construction_progress_days.saturating_add(1);
            if instance.construction_progress_days >= required {
                instance.completed = true;
                finished.push(instance.id);
                info!(
                    building = %instance.id,
                    definition = %instance.definition,
                    city = %instance.city,
                    "Construction completed"
                );
            }
        }
        finished
    }

    /// Number of placed instances.
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }
}

impl BuildingSource for BuildingRegistry {
    fn building_instances(&self) -> impl Iterator<Item = &BuildingInstance> {
        self.instances.values()
    }

    fn definition(&self, id: BuildingDefId) -> Option<&BuildingDefinition> {
        self.definitions.get(&id)
    }
}
