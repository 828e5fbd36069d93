//! Cultures, their pillars and the culture registry.
//!
//! A [`CultureData`] owns one [`TechProgressionTree`] per [`TreeType`] and a
//! list of adopted [`Pillar`]s. The [`CultureRegistry`] is the single owner
//! of all cultures; XP additions and unlocks are routed through it so that
//! callers holding only a culture id get a typed error for unknown cultures.
//!
//! Hybrid cultures are created from two parents: for each tree type the
//! caller picks which parent's node graph and unlocks the hybrid inherits.

use std::collections::BTreeMap;

use dominion_types::{BuildingDefId, CultureId, ModifierSet, PillarId, TechNodeId, TreeType};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ProgressionConfig;
use crate::error::{CultureError, UnlockError};
use crate::tech::{TechNode, TechProgressionTree, TechTreeSave, UnlockOutcome};

// ---------------------------------------------------------------------------
// Pillar
// ---------------------------------------------------------------------------

/// A defining trait of a culture that grants permanent modifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pillar {
    /// Pillar identifier.
    pub id: PillarId,
    /// Display name.
    pub name: String,
    /// Modifiers granted while adopted.
    pub modifiers: ModifierSet,
}

/// Which parent a hybrid culture inherits a tree from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HybridParent {
    /// The first parent.
    First,
    /// The second parent.
    Second,
}

// ---------------------------------------------------------------------------
// CultureData
// ---------------------------------------------------------------------------

/// One culture: its trees, pillars and lineage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CultureData {
    /// Culture identifier.
    pub id: CultureId,
    /// Display name.
    pub name: String,
    /// Parents, for hybrid cultures.
    pub parents: Option<(CultureId, CultureId)>,
    /// One tree per tree type.
    trees: BTreeMap<TreeType, TechProgressionTree>,
    /// Adopted pillars in adoption order.
    pillars: Vec<Pillar>,
}

impl CultureData {
    /// Create a culture with one empty tree per tree type.
    pub fn new(id: CultureId, name: &str, config: &ProgressionConfig) -> Self {
        let trees = TreeType::ALL
            .iter()
            .map(|t| (*t, TechProgressionTree::new(id, *t, config)))
            .collect();
        Self {
            id,
            name: name.to_owned(),
            parents: None,
            trees,
            pillars: Vec::new(),
        }
    }

    /// The tree of `tree_type`.
    pub fn tree(&self, tree_type: TreeType) -> Option<&TechProgressionTree> {
        self.trees.get(&tree_type)
    }

    /// Mutable access to the tree of `tree_type`.
    pub fn tree_mut(&mut self, tree_type: TreeType) -> Option<&mut TechProgressionTree> {
        self.trees.get_mut(&tree_type)
    }

    /// Every tree in tree-type order.
    pub fn trees(&self) -> impl Iterator<Item = &TechProgressionTree> {
        self.trees.values()
    }

    /// Mutable iteration over every tree.
    pub fn trees_mut(&mut self) -> impl Iterator<Item = &mut TechProgressionTree> {
        self.trees.values_mut()
    }

    /// Add a node definition to the tree of `tree_type`.
    pub fn add_node(&mut self, tree_type: TreeType, node: TechNode) {
        if let Some(tree) = self.trees.get_mut(&tree_type) {
            tree.add_node(node);
        }
    }

    /// Adopt a pillar. Returns `false` if a pillar with the same id is already adopted.
    pub fn adopt_pillar(&mut self, pillar: Pillar) -> bool {
        if self.pillars.iter().any(|p| p.id == pillar.id) {
            return false;
        }
        debug!(culture = %self.id, pillar = %pillar.id, "Pillar adopted");
        self.pillars.push(pillar);
        true
    }

    /// Adopted pillars.
    pub fn pillars(&self) -> &[Pillar] {
        &self.pillars
    }

    /// Modifiers from every adopted pillar and every unlocked node, summed per key.
    pub fn active_modifiers(&self) -> ModifierSet {
        let mut total = ModifierSet::new();
        for pillar in &self.pillars {
            total.merge(&pillar.modifiers);
        }
        for tree in self.trees.values() {
            total.merge(&tree.unlocked_modifiers());
        }
        total
    }

    /// Whether any unlocked node in any tree unlocks `building`.
    pub fn is_building_unlocked(&self, building: BuildingDefId) -> bool {
        self.trees.values().any(|t| t.unlocks_building(building))
    }

    /// Snapshot every tree and the adopted pillar ids.
    pub fn to_save(&self) -> CultureSave {
        CultureSave {
            culture: self.id,
            trees: self
                .trees
                .iter()
                .map(|(tt, tree)| (*tt, tree.to_save()))
                .collect(),
            pillar_ids: self.pillars.iter().map(|p| p.id).collect(),
        }
    }
}

/// Persisted progression of one culture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CultureSave {
    /// Culture the save belongs to.
    pub culture: CultureId,
    /// Per-tree progression.
    pub trees: BTreeMap<TreeType, TechTreeSave>,
    /// Adopted pillar ids, for reference; pillar content is not restored.
    pub pillar_ids: Vec<PillarId>,
}

// ---------------------------------------------------------------------------
// CultureRegistry
// ---------------------------------------------------------------------------

/// Owner of every culture.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CultureRegistry {
    /// Cultures keyed by id.
    cultures: BTreeMap<CultureId, CultureData>,
}

impl CultureRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            cultures: BTreeMap::new(),
        }
    }

    /// Add a culture.
    ///
    /// # Errors
    ///
    /// [`CultureError::DuplicateCulture`] if the id is taken.
    pub fn insert(&mut self, culture: CultureData) -> Result<(), CultureError> {
        if self.cultures.contains_key(&culture.id) {
            return Err(CultureError::DuplicateCulture(culture.id));
        }
        info!(culture = %culture.id, name = %culture.name, "Culture registered");
        self.cultures.insert(culture.id, culture);
        Ok(())
    }

    /// Look up a culture.
    pub fn get(&self, id: CultureId) -> Option<&CultureData> {
        self.cultures.get(&id)
    }

    /// Mutable access to a culture.
    pub fn get_mut(&mut self, id: CultureId) -> Option<&mut CultureData> {
        self.cultures.get_mut(&id)
    }

    /// Every culture id in order.
    pub fn ids(&self) -> Vec<CultureId> {
        self.cultures.keys().copied().collect()
    }

    /// Every culture in id order.
    pub fn iter(&self) -> impl Iterator<Item = &CultureData> {
        self.cultures.values()
    }

    /// Number of cultures.
    pub fn len(&self) -> usize {
        self.cultures.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.cultures.is_empty()
    }

    /// Add XP to one tree of one culture.
    ///
    /// Returns `false` (and logs) for unknown cultures.
    pub fn add_xp(&mut self, culture: CultureId, tree_type: TreeType, amount: f64) -> bool {
        match self
            .cultures
            .get_mut(&culture)
            .and_then(|c| c.tree_mut(tree_type))
        {
            Some(tree) => {
                tree.add_xp(amount);
                true
            }
            None => {
                warn!(culture = %culture, tree = %tree_type, amount, "XP for unknown culture dropped");
                false
            }
        }
    }

    /// Spend XP to unlock a node in one tree of one culture.
    ///
    /// # Errors
    ///
    /// [`UnlockError::UnknownCulture`] for unknown cultures, otherwise any
    /// error from [`TechProgressionTree::unlock_node`].
    pub fn unlock_node(
        &mut self,
        culture: CultureId,
        tree_type: TreeType,
        node: TechNodeId,
    ) -> Result<UnlockOutcome, UnlockError> {
        let Some(tree) = self
            .cultures
            .get_mut(&culture)
            .and_then(|c| c.tree_mut(tree_type))
        else {
            warn!(culture = %culture, tree = %tree_type, node = %node, "Unlock rejected: unknown culture");
            return Err(UnlockError::UnknownCulture(culture));
        };
        tree.unlock_node(node)
    }

    /// Create a hybrid of two existing cultures.
    ///
    /// For each tree type, `selection` names the parent whose node graph and
    /// unlocks are inherited; unlisted tree types come from the first parent.
    /// Hybrid trees start with zero XP and no owner.
    ///
    /// # Errors
    ///
    /// [`CultureError::UnknownCulture`] for a missing parent and
    /// [`CultureError::DuplicateCulture`] if `id` is taken.
    pub fn create_hybrid(
        &mut self,
        id: CultureId,
        name: &str,
        parents: (CultureId, CultureId),
        selection: &BTreeMap<TreeType, HybridParent>,
    ) -> Result<(), CultureError> {
        if self.cultures.contains_key(&id) {
            return Err(CultureError::DuplicateCulture(id));
        }
        let first = self
            .cultures
            .get(&parents.0)
            .ok_or(CultureError::UnknownCulture(parents.0))?;
        let second = self
            .cultures
            .get(&parents.1)
            .ok_or(CultureError::UnknownCulture(parents.1))?;

        let mut trees = BTreeMap::new();
        for tree_type in TreeType::ALL {
            let source = match selection.get(&tree_type) {
                Some(HybridParent::Second) => second,
                Some(HybridParent::First) | None => first,
            };
            if let Some(tree) = source.tree(tree_type) {
                trees.insert(tree_type, tree.inherit_for(id));
            }
        }

        let hybrid = CultureData {
            id,
            name: name.to_owned(),
            parents: Some(parents),
            trees,
            pillars: Vec::new(),
        };
        info!(
            culture = %id,
            first_parent = %parents.0,
            second_parent = %parents.1,
            "Hybrid culture created"
        );
        self.cultures.insert(id, hybrid);
        Ok(())
    }

    /// Snapshot every culture's progression.
    pub fn to_save(&self) -> Vec<CultureSave> {
        self.cultures.values().map(CultureData::to_save).collect()
    }

    /// Restore progression from saves. Saves for unknown cultures are skipped.
    ///
    /// Returns the number of cultures restored.
    pub fn restore(&mut self, saves: &[CultureSave]) -> usize {
        let mut restored = 0_usize;
        for save in saves {
            let Some(culture) = self.cultures.get_mut(&save.culture) else {
                warn!(culture = %save.culture, "Save for unknown culture skipped");
                continue;
            };
            for (tree_type, tree_save) in &save.trees {
                if let Some(tree) = culture.tree_mut(*tree_type) {
                    tree.restore(tree_save);
                }
            }
            restored = restored.saturating_add(1);
        }
        restored
    }

    /// Rebuild every node's unlocked flag from its tree's unlocked set.
    pub fn resync_unlocked_flags(&mut self) {
        for culture in self.cultures.values_mut() {
            for tree in culture.trees_mut() {
                tree.resync_unlocked_flags();
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn culture(id: u32) -> CultureData {
        let mut c = CultureData::new(CultureId(id), "Test", &ProgressionConfig::default());
        c.add_node(
            TreeType::Economics,
            TechNode::new(TechNodeId(1), "Coinage")
                .with_buildings(&[BuildingDefId(5)])
                .with_modifiers(ModifierSet::new().with("trade", 0.1)),
        );
        c.add_node(TreeType::Warfare, TechNode::new(TechNodeId(1), "Bronze Spears"));
        c
    }

    #[test]
    fn every_tree_type_exists_and_is_independent() {
        let mut registry = CultureRegistry::new();
        registry.insert(culture(1)).unwrap();
        assert!(registry.add_xp(CultureId(1), TreeType::Economics, 250.0));

        let c = registry.get(CultureId(1)).unwrap();
        assert_eq!(c.trees().count(), TreeType::ALL.len());
        for tree in c.trees() {
            let expected = if tree.tree_type() == TreeType::Economics { 250.0 } else { 0.0 };
            assert!((tree.accumulated_xp() - expected).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn unknown_culture_is_reported() {
        let mut registry = CultureRegistry::new();
        assert!(!registry.add_xp(CultureId(7), TreeType::Science, 10.0));
        assert_eq!(
            registry.unlock_node(CultureId(7), TreeType::Science, TechNodeId(1)),
            Err(UnlockError::UnknownCulture(CultureId(7)))
        );
        registry.insert(culture(1)).unwrap();
        assert_eq!(
            registry.insert(culture(1)),
            Err(CultureError::DuplicateCulture(CultureId(1)))
        );
    }

    #[test]
    fn active_modifiers_sum_pillars_and_unlocks() {
        let mut registry = CultureRegistry::new();
        registry.insert(culture(1)).unwrap();
        let c = registry.get_mut(CultureId(1)).unwrap();
        assert!(c.adopt_pillar(Pillar {
            id: PillarId(1),
            name: "Seafarers".to_owned(),
            modifiers: ModifierSet::new().with("trade", 0.05).with("naval", 0.2),
        }));
        assert!(!c.adopt_pillar(Pillar {
            id: PillarId(1),
            name: "Dup".to_owned(),
            modifiers: ModifierSet::new(),
        }));
        assert!(!c.is_building_unlocked(BuildingDefId(5)));

        registry.add_xp(CultureId(1), TreeType::Economics, 1000.0);
        registry
            .unlock_node(CultureId(1), TreeType::Economics, TechNodeId(1))
            .unwrap();
        let c = registry.get(CultureId(1)).unwrap();
        let modifiers = c.active_modifiers();
        assert!((modifiers.get("trade") - 0.15).abs() < 1e-9);
        assert!((modifiers.get("naval") - 0.2).abs() < 1e-9);
        assert!(c.is_building_unlocked(BuildingDefId(5)));
    }

    #[test]
    fn hybrid_inherits_selected_trees() {
        let mut registry = CultureRegistry::new();
        registry.insert(culture(1)).unwrap();
        registry.insert(culture(2)).unwrap();
        registry.add_xp(CultureId(2), TreeType::Warfare, 1000.0);
        registry
            .unlock_node(CultureId(2), TreeType::Warfare, TechNodeId(1))
            .unwrap();

        let mut selection = BTreeMap::new();
        selection.insert(TreeType::Warfare, HybridParent::Second);
        registry
            .create_hybrid(CultureId(3), "Mixed", (CultureId(1), CultureId(2)), &selection)
            .unwrap();

        let hybrid = registry.get(CultureId(3)).unwrap();
        assert_eq!(hybrid.parents, Some((CultureId(1), CultureId(2))));
        let warfare = hybrid.tree(TreeType::Warfare).unwrap();
        assert!(warfare.is_unlocked(TechNodeId(1)));
        assert_eq!(warfare.culture(), CultureId(3));
        assert!(warfare.accumulated_xp().abs() < f64::EPSILON);
        assert!(!hybrid.tree(TreeType::Economics).unwrap().is_unlocked(TechNodeId(1)));

        assert_eq!(
            registry.create_hybrid(CultureId(4), "Bad", (CultureId(1), CultureId(9)), &selection),
            Err(CultureError::UnknownCulture(CultureId(9)))
        );
    }

    #[test]
    fn save_and_restore_round_trip_progression() {
        let mut registry = CultureRegistry::new();
        registry.insert(culture(1)).unwrap();
        registry.add_xp(CultureId(1), TreeType::Economics, 1600.0);
        registry
            .unlock_node(CultureId(1), TreeType::Economics, TechNodeId(1))
            .unwrap();
        let saves = registry.to_save();
        let json = serde_json::to_string(&saves).unwrap();
        let saves: Vec<CultureSave> = serde_json::from_str(&json).unwrap();

        let mut fresh = CultureRegistry::new();
        fresh.insert(culture(1)).unwrap();
        assert_eq!(fresh.restore(&saves), 1);
        let tree = fresh.get(CultureId(1)).unwrap().tree(TreeType::Economics).unwrap();
        assert!(tree.node(TechNodeId(1)).unwrap().is_unlocked());
        assert!((tree.accumulated_xp() - 600.0).abs() < 1e-9);
        assert!((tree.next_node_cost() - 1500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unlocking_one_tree_leaves_other_costs_alone() {
        let mut registry = CultureRegistry::new();
        registry.insert(culture(1)).unwrap();
        registry.add_xp(CultureId(1), TreeType::Economics, 1000.0);
        registry
            .unlock_node(CultureId(1), TreeType::Economics, TechNodeId(1))
            .unwrap();

        let c = registry.get(CultureId(1)).unwrap();
        let economics = c.tree(TreeType::Economics).unwrap();
        assert!((economics.next_node_cost() - 1500.0).abs() < f64::EPSILON);
        for tree in c.trees().filter(|t| t.tree_type() != TreeType::Economics) {
            assert_eq!(tree.unlocked_count(), 0);
            assert!((tree.next_node_cost() - 1000.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn serialized_registry_keeps_unlock_effects() {
        let mut registry = CultureRegistry::new();
        registry.insert(culture(1)).unwrap();
        registry.add_xp(CultureId(1), TreeType::Economics, 1000.0);
        registry
            .unlock_node(CultureId(1), TreeType::Economics, TechNodeId(1))
            .unwrap();

        let json = serde_json::to_string(&registry).unwrap();
        let loaded: CultureRegistry = serde_json::from_str(&json).unwrap();

        let c = loaded.get(CultureId(1)).unwrap();
        let economics = c.tree(TreeType::Economics).unwrap();
        assert!(economics.is_unlocked(TechNodeId(1)));
        assert!(economics.node(TechNodeId(1)).unwrap().is_unlocked());
        assert!(c.is_building_unlocked(BuildingDefId(5)));
        assert!((c.active_modifiers().get("trade") - 0.1).abs() < 1e-9);
    }
}
