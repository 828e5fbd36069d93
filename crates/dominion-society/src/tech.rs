//! Per-culture tech progression trees.
//!
//! Every culture owns exactly one [`TechProgressionTree`] per [`TreeType`].
//! A tree accumulates XP from buildings, spends it to unlock nodes, and
//! records which realm currently controls it. Trees are fully independent:
//! XP added to one never appears in another, even inside the same culture.
//!
//! Unlock cost grows linearly with the number of nodes already unlocked in
//! the tree:
//!
//! ```text
//! cost = base_node_cost + unlocked_count * node_cost_increment
//! ```

use std::collections::{BTreeMap, BTreeSet};

use dominion_types::{BuildingDefId, CultureId, ModifierSet, RealmId, TechNodeId, TreeType};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ProgressionConfig;
use crate::error::UnlockError;

// ---------------------------------------------------------------------------
// TechNode
// ---------------------------------------------------------------------------

/// One unlockable entry in a tech tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechNode {
    /// Stable node identifier.
    pub id: TechNodeId,
    /// Display name.
    pub name: String,
    /// Nodes that must be unlocked first.
    pub prerequisites: Vec<TechNodeId>,
    /// Building definitions made available by this node.
    pub unlocks_buildings: Vec<BuildingDefId>,
    /// Modifiers granted while unlocked.
    pub modifiers: ModifierSet,
    /// Mirror of the owning tree's unlocked set; rebuilt on restore.
    #[serde(default)]
    unlocked: bool,
}

impl TechNode {
    /// Create a node with no prerequisites, buildings or modifiers.
    pub fn new(id: TechNodeId, name: &str) -> Self {
        Self {
            id,
            name: name.to_owned(),
            prerequisites: Vec::new(),
            unlocks_buildings: Vec::new(),
            modifiers: ModifierSet::new(),
            unlocked: false,
        }
    }

    /// Builder: set the prerequisite nodes.
    #[must_use]
    pub fn with_prerequisites(mut self, prerequisites: &[TechNodeId]) -> Self {
        self.prerequisites = prerequisites.to_vec();
        self
    }

    /// Builder: set the building definitions this node unlocks.
    #[must_use]
    pub fn with_buildings(mut self, buildings: &[BuildingDefId]) -> Self {
        self.unlocks_buildings = buildings.to_vec();
        self
    }

    /// Builder: set the modifiers granted by this node.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: ModifierSet) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Whether the node is unlocked.
    pub const fn is_unlocked(&self) -> bool {
        self.unlocked
    }
}

/// Display state of a node within its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeState {
    /// Prerequisites are not all unlocked.
    Locked,
    /// Prerequisites are met; the node can be bought with enough XP.
    Available,
    /// Already unlocked.
    Unlocked,
}

/// Result of a successful unlock.
#[derive(Debug, Clone, PartialEq)]
pub struct UnlockOutcome {
    /// The node that was unlocked.
    pub node: TechNodeId,
    /// XP spent on the unlock.
    pub cost: f64,
    /// Building definitions the node made available.
    pub unlocked_buildings: Vec<BuildingDefId>,
}

/// Persisted progression of one tree.
///
/// Node definitions are content and are not saved; only XP and the set of
/// unlocked node ids are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechTreeSave {
    /// Spendable XP.
    pub accumulated_xp: f64,
    /// Lifetime XP earned.
    pub total_xp_earned: f64,
    /// Unlocked node ids.
    pub unlocked_node_ids: Vec<TechNodeId>,
}

// ---------------------------------------------------------------------------
// TechProgressionTree
// ---------------------------------------------------------------------------

/// XP pool, node graph and owner of one (culture, tree type) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechProgressionTree {
    /// Culture this tree belongs to.
    culture: CultureId,
    /// Category of this tree.
    tree_type: TreeType,
    /// Spendable XP. Never negative.
    accumulated_xp: f64,
    /// Lifetime XP earned. Never decreases.
    total_xp_earned: f64,
    /// Node definitions keyed by id.
    nodes: BTreeMap<TechNodeId, TechNode>,
    /// Ids of unlocked nodes.
    unlocked: BTreeSet<TechNodeId>,
    /// Realm that controls this tree, if any.
    owner_realm: Option<RealmId>,
    /// Cost of the first unlock.
    base_cost: f64,
    /// Cost added per unlocked node.
    cost_increment: f64,
}

impl TechProgressionTree {
    /// Create an empty tree.
    pub fn new(culture: CultureId, tree_type: TreeType, config: &ProgressionConfig) -> Self {
        Self {
            culture,
            tree_type,
            accumulated_xp: 0.0,
            total_xp_earned: 0.0,
            nodes: BTreeMap::new(),
            unlocked: BTreeSet::new(),
            owner_realm: None,
            base_cost: config.base_node_cost,
            cost_increment: config.node_cost_increment,
        }
    }

    /// Copy this tree's node graph and unlocked set for another culture.
    ///
    /// XP starts at zero and the owner is unset.
    pub fn inherit_for(&self, culture: CultureId) -> Self {
        let mut tree = Self {
            culture,
            tree_type: self.tree_type,
            accumulated_xp: 0.0,
            total_xp_earned: 0.0,
            nodes: self.nodes.clone(),
            unlocked: self.unlocked.clone(),
            owner_realm: None,
            base_cost: self.base_cost,
            cost_increment: self.cost_increment,
        };
        tree.resync_unlocked_flags();
        tree
    }

    /// Add a node definition. Replaces any node with the same id.
    pub fn add_node(&mut self, mut node: TechNode) {
        node.unlocked = self.unlocked.contains(&node.id);
        self.nodes.insert(node.id, node);
    }

    /// Culture this tree belongs to.
    pub const fn culture(&self) -> CultureId {
        self.culture
    }

    /// Category of this tree.
    pub const fn tree_type(&self) -> TreeType {
        self.tree_type
    }

    /// Spendable XP.
    pub const fn accumulated_xp(&self) -> f64 {
        self.accumulated_xp
    }

    /// Lifetime XP earned.
    pub const fn total_xp_earned(&self) -> f64 {
        self.total_xp_earned
    }

    /// Realm controlling this tree.
    pub const fn owner_realm(&self) -> Option<RealmId> {
        self.owner_realm
    }

    /// Record a new controlling realm.
    pub const fn set_owner_realm(&mut self, realm: Option<RealmId>) {
        self.owner_realm = realm;
    }

    /// Number of unlocked nodes.
    pub fn unlocked_count(&self) -> usize {
        self.unlocked.len()
    }

    /// Look up a node.
    pub fn node(&self, id: TechNodeId) -> Option<&TechNode> {
        self.nodes.get(&id)
    }

    /// Every node in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &TechNode> {
        self.nodes.values()
    }

    /// Whether `id` is unlocked.
    pub fn is_unlocked(&self, id: TechNodeId) -> bool {
        self.unlocked.contains(&id)
    }

    /// Add XP to both the spendable and lifetime pools.
    ///
    /// Amounts come from building production and are expected to be
    /// non-negative.
    pub fn add_xp(&mut self, amount: f64) {
        self.accumulated_xp += amount;
        self.total_xp_earned += amount;
    }

    /// Cost of the next unlock in this tree.
    #[allow(clippy::cast_precision_loss)] // node counts stay tiny
    pub fn next_node_cost(&self) -> f64 {
        (self.unlocked.len() as f64).mul_add(self.cost_increment, self.base_cost)
    }

    /// Prerequisites of `id` that are not unlocked yet.
    ///
    /// Empty for unknown nodes.
    pub fn missing_prerequisites(&self, id: TechNodeId) -> Vec<TechNodeId> {
        self.nodes.get(&id).map_or_else(Vec::new, |node| {
            node.prerequisites
                .iter()
                .filter(|p| !self.unlocked.contains(*p))
                .copied()
                .collect()
        })
    }

    /// Whether every prerequisite of `id` is unlocked. `false` for unknown nodes.
    pub fn prerequisites_met(&self, id: TechNodeId) -> bool {
        self.nodes
            .get(&id)
            .is_some_and(|node| node.prerequisites.iter().all(|p| self.unlocked.contains(p)))
    }

    /// Display state of `id`, or `None` for unknown nodes.
    pub fn node_state(&self, id: TechNodeId) -> Option<NodeState> {
        if !self.nodes.contains_key(&id) {
            return None;
        }
        if self.unlocked.contains(&id) {
            Some(NodeState::Unlocked)
        } else if self.prerequisites_met(id) {
            Some(NodeState::Available)
        } else {
            Some(NodeState::Locked)
        }
    }

    /// Locked nodes whose prerequisites are all unlocked, in id order.
    pub fn available_nodes(&self) -> Vec<TechNodeId> {
        self.nodes
            .keys()
            .filter(|id| !self.unlocked.contains(*id) && self.prerequisites_met(**id))
            .copied()
            .collect()
    }

    /// Spend XP to unlock `id`.
    ///
    /// # Errors
    ///
    /// Returns an [`UnlockError`] for unknown nodes, nodes already unlocked,
    /// unmet prerequisites, or insufficient XP. The tree is unchanged on error.
    pub fn unlock_node(&mut self, id: TechNodeId) -> Result<UnlockOutcome, UnlockError> {
        let Some(node) = self.nodes.get(&id) else {
            warn!(culture = %self.culture, tree = %self.tree_type, node = %id, "Unlock rejected: unknown node");
            return Err(UnlockError::UnknownNode {
                tree_type: self.tree_type,
                node: id,
            });
        };

        if self.unlocked.contains(&id) {
            warn!(culture = %self.culture, tree = %self.tree_type, node = %id, "Unlock rejected: already unlocked");
            return Err(UnlockError::AlreadyUnlocked(id));
        }

        let missing = self.missing_prerequisites(id);
        if !missing.is_empty() {
            warn!(
                culture = %self.culture,
                tree = %self.tree_type,
                node = %id,
                missing = ?missing,
                "Unlock rejected: prerequisites unmet"
            );
            return Err(UnlockError::PrerequisitesUnmet { node: id, missing });
        }

        let cost = self.next_node_cost();
        if self.accumulated_xp < cost {
            warn!(
                culture = %self.culture,
                tree = %self.tree_type,
                node = %id,
                cost,
                available = self.accumulated_xp,
                "Unlock rejected: insufficient XP"
            );
            return Err(UnlockError::InsufficientXp {
                node: id,
                required: cost,
                available: self.accumulated_xp,
            });
        }

        let unlocked_buildings = node.unlocks_buildings.clone();
        self.accumulated_xp = (self.accumulated_xp - cost).max(0.0);
        self.unlocked.insert(id);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.unlocked = true;
        }

        info!(
            culture = %self.culture,
            tree = %self.tree_type,
            node = %id,
            cost,
            remaining_xp = self.accumulated_xp,
            "Tech node unlocked"
        );
        Ok(UnlockOutcome {
            node: id,
            cost,
            unlocked_buildings,
        })
    }

    /// Modifiers granted by every unlocked node, summed per key.
    pub fn unlocked_modifiers(&self) -> ModifierSet {
        let mut total = ModifierSet::new();
        for node in self.nodes.values().filter(|n| self.unlocked.contains(&n.id)) {
            total.merge(&node.modifiers);
        }
        total
    }

    /// Whether any unlocked node in this tree unlocks `building`.
    pub fn unlocks_building(&self, building: BuildingDefId) -> bool {
        self.nodes
            .values()
            .any(|n| self.unlocked.contains(&n.id) && n.unlocks_buildings.contains(&building))
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Snapshot XP and unlocked node ids.
    pub fn to_save(&self) -> TechTreeSave {
        TechTreeSave {
            accumulated_xp: self.accumulated_xp,
            total_xp_earned: self.total_xp_earned,
            unlocked_node_ids: self.unlocked.iter().copied().collect(),
        }
    }

    /// Restore XP and unlocked node ids, then resync node flags.
    ///
    /// Ids that no longer exist in the node graph are dropped.
    pub fn restore(&mut self, save: &TechTreeSave) {
        self.accumulated_xp = save.accumulated_xp.max(0.0);
        self.total_xp_earned = save.total_xp_earned.max(self.accumulated_xp);
        self.unlocked = save
            .unlocked_node_ids
            .iter()
            .filter(|id| self.nodes.contains_key(*id))
            .copied()
            .collect();
        let dropped = save.unlocked_node_ids.len().saturating_sub(self.unlocked.len());
        if dropped > 0 {
            warn!(culture = %self.culture, tree = %self.tree_type, dropped, "Dropped unknown node ids on restore");
        }
        self.resync_unlocked_flags();
        debug!(
            culture = %self.culture,
            tree = %self.tree_type,
            unlocked = self.unlocked.len(),
            "Tech tree restored"
        );
    }

    /// Set every node's unlocked flag from the tree's unlocked set.
    pub fn resync_unlocked_flags(&mut self) {
        for (id, node) in &mut self.nodes {
            node.unlocked = self.unlocked.contains(id);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tree() -> TechProgressionTree {
        let mut tree = TechProgressionTree::new(
            CultureId(1),
            TreeType::Economics,
            &ProgressionConfig::default(),
        );
        tree.add_node(
            TechNode::new(TechNodeId(1), "Currency")
                .with_buildings(&[BuildingDefId(10)])
                .with_modifiers(ModifierSet::new().with("trade", 0.1)),
        );
        tree.add_node(
            TechNode::new(TechNodeId(2), "Banking")
                .with_prerequisites(&[TechNodeId(1)])
                .with_modifiers(ModifierSet::new().with("trade", 0.2)),
        );
        tree.add_node(TechNode::new(TechNodeId(3), "Guilds"));
        tree
    }

    #[test]
    fn cost_grows_with_each_unlock() {
        let mut tree = tree();
        tree.add_xp(10_000.0);
        assert!((tree.next_node_cost() - 1000.0).abs() < f64::EPSILON);
        tree.unlock_node(TechNodeId(1)).unwrap();
        assert!((tree.next_node_cost() - 1500.0).abs() < f64::EPSILON);
        tree.unlock_node(TechNodeId(3)).unwrap();
        assert!((tree.next_node_cost() - 2000.0).abs() < f64::EPSILON);
        // 10000 - 1000 - 1500
        assert!((tree.accumulated_xp() - 7500.0).abs() < f64::EPSILON);
        assert!((tree.total_xp_earned() - 10_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unlock_is_gated_by_prerequisites() {
        let mut tree = tree();
        tree.add_xp(5000.0);
        assert_eq!(
            tree.unlock_node(TechNodeId(2)),
            Err(UnlockError::PrerequisitesUnmet {
                node: TechNodeId(2),
                missing: vec![TechNodeId(1)],
            })
        );
        assert!((tree.accumulated_xp() - 5000.0).abs() < f64::EPSILON);
        assert_eq!(tree.node_state(TechNodeId(2)), Some(NodeState::Locked));

        let outcome = tree.unlock_node(TechNodeId(1)).unwrap();
        assert_eq!(outcome.unlocked_buildings, vec![BuildingDefId(10)]);
        assert_eq!(tree.node_state(TechNodeId(2)), Some(NodeState::Available));
        assert!(tree.unlock_node(TechNodeId(2)).is_ok());
    }

    #[test]
    fn unlock_rejections_leave_tree_unchanged() {
        let mut tree = tree();
        tree.add_xp(999.0);
        assert!(matches!(
            tree.unlock_node(TechNodeId(1)),
            Err(UnlockError::InsufficientXp { .. })
        ));
        assert!(matches!(
            tree.unlock_node(TechNodeId(42)),
            Err(UnlockError::UnknownNode { .. })
        ));
        tree.add_xp(1.0);
        tree.unlock_node(TechNodeId(1)).unwrap();
        assert_eq!(
            tree.unlock_node(TechNodeId(1)),
            Err(UnlockError::AlreadyUnlocked(TechNodeId(1)))
        );
        assert_eq!(tree.unlocked_count(), 1);
        assert!(tree.accumulated_xp().abs() < f64::EPSILON);
    }

    #[test]
    fn available_nodes_excludes_locked_and_unlocked() {
        let mut tree = tree();
        assert_eq!(tree.available_nodes(), vec![TechNodeId(1), TechNodeId(3)]);
        tree.add_xp(1000.0);
        tree.unlock_node(TechNodeId(1)).unwrap();
        assert_eq!(tree.available_nodes(), vec![TechNodeId(2), TechNodeId(3)]);
    }

    #[test]
    fn modifiers_and_buildings_follow_unlocks() {
        let mut tree = tree();
        assert!(!tree.unlocks_building(BuildingDefId(10)));
        tree.add_xp(2500.0);
        tree.unlock_node(TechNodeId(1)).unwrap();
        tree.unlock_node(TechNodeId(2)).unwrap();
        assert!(tree.unlocks_building(BuildingDefId(10)));
        assert!((tree.unlocked_modifiers().get("trade") - 0.3).abs() < 1e-9);
    }

    #[test]
    fn restore_resyncs_node_flags() {
        let mut original = tree();
        original.add_xp(1200.0);
        original.unlock_node(TechNodeId(1)).unwrap();
        let save = original.to_save();
        let json = serde_json::to_string(&save).unwrap();
        let save: TechTreeSave = serde_json::from_str(&json).unwrap();

        let mut restored = tree();
        restored.restore(&save);
        assert!(restored.node(TechNodeId(1)).unwrap().is_unlocked());
        assert!(!restored.node(TechNodeId(2)).unwrap().is_unlocked());
        assert!((restored.accumulated_xp() - 200.0).abs() < 1e-9);
        assert!((restored.total_xp_earned() - 1200.0).abs() < 1e-9);
        assert!((restored.next_node_cost() - 1500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn restore_drops_unknown_ids() {
        let mut tree = tree();
        tree.restore(&TechTreeSave {
            accumulated_xp: 5.0,
            total_xp_earned: 5.0,
            unlocked_node_ids: vec![TechNodeId(3), TechNodeId(99)],
        });
        assert_eq!(tree.unlocked_count(), 1);
        assert!(tree.is_unlocked(TechNodeId(3)));
    }

    #[test]
    fn inherited_tree_keeps_unlocks_but_not_xp() {
        let mut parent = tree();
        parent.add_xp(1000.0);
        parent.unlock_node(TechNodeId(1)).unwrap();
        parent.set_owner_realm(Some(RealmId(4)));
        parent.add_xp(300.0);

        let child = parent.inherit_for(CultureId(9));
        assert_eq!(child.culture(), CultureId(9));
        assert!(child.node(TechNodeId(1)).unwrap().is_unlocked());
        assert!(child.accumulated_xp().abs() < f64::EPSILON);
        assert_eq!(child.owner_realm(), None);
    }
}
