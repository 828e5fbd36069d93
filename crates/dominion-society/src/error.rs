//! Error types for the `dominion-society` crate.
//!
//! Every rejected operation returns one of these values and leaves all state
//! untouched. Callers branch on the variant; nothing here is retried.

use dominion_types::{ContractId, CultureId, RealmId, ResourceKind, TechNodeId, TreeType};
use rust_decimal::Decimal;

/// Reasons a tech node unlock was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UnlockError {
    /// The culture does not exist in the registry.
    #[error("unknown culture: {0}")]
    UnknownCulture(CultureId),

    /// The node does not belong to the tree.
    #[error("node {node} not found in {tree_type} tree")]
    UnknownNode {
        /// The tree that was searched.
        tree_type: TreeType,
        /// The requested node.
        node: TechNodeId,
    },

    /// The node is already unlocked.
    #[error("node {0} is already unlocked")]
    AlreadyUnlocked(TechNodeId),

    /// At least one prerequisite is still locked.
    #[error("node {node} has unmet prerequisites: {missing:?}")]
    PrerequisitesUnmet {
        /// The requested node.
        node: TechNodeId,
        /// Prerequisites that are not unlocked yet.
        missing: Vec<TechNodeId>,
    },

    /// The tree does not hold enough spendable XP.
    #[error("node {node} costs {required} XP but only {available} is available")]
    InsufficientXp {
        /// The requested node.
        node: TechNodeId,
        /// The dynamic cost of the next unlock.
        required: f64,
        /// Spendable XP in the tree.
        available: f64,
    },
}

/// Errors from culture registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CultureError {
    /// A culture with this id already exists.
    #[error("duplicate culture id: {0}")]
    DuplicateCulture(CultureId),

    /// The culture does not exist in the registry.
    #[error("unknown culture: {0}")]
    UnknownCulture(CultureId),
}

/// Errors from contract operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractError {
    /// The contract does not exist.
    #[error("unknown contract: {0}")]
    UnknownContract(ContractId),

    /// A realm cannot be its own subject.
    #[error("realm {0} cannot contract with itself")]
    SelfContract(RealmId),

    /// A percentage obligation fell outside `[0, 100]`.
    #[error("obligation {value}% for {resource:?} is outside 0..=100")]
    ObligationOutOfRange {
        /// The resource, or `None` for the manpower obligation.
        resource: Option<ResourceKind>,
        /// The offending percentage.
        value: Decimal,
    },
}
