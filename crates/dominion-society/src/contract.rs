//! Government contracts between a parent realm and its subjects.
//!
//! A contract binds a subject (a vassal realm or an individual agent) to
//! hand over a percentage of selected resources and manpower, and may strip
//! it of some governance rights. Subject loyalty follows from how fair the
//! terms are:
//!
//! ```text
//! loyalty = 100 - avg(resource %) - 0.5 * manpower % - 10 * restrictions
//! ```
//!
//! clamped to `[0, 100]`. Contracts with a fixed term age one month at a
//! time and are removed once expired.

use std::collections::BTreeMap;

use dominion_types::{AgentId, ContractId, RealmId, ResourceKind};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ContractError;

// ---------------------------------------------------------------------------
// Terms
// ---------------------------------------------------------------------------

/// The party bound by a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContractSubject {
    /// A vassal realm.
    Realm(RealmId),
    /// An individual (governor, mercenary captain, ...).
    Agent(AgentId),
}

/// How long a contract runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractDuration {
    /// Expires after this many months.
    Months(u32),
    /// Never expires.
    Permanent,
}

/// Governance rights the subject gives up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceRestrictions {
    /// Subject may not conduct its own diplomacy.
    pub foreign_policy: bool,
    /// Subject's armies answer to the parent.
    pub military_command: bool,
    /// Parent sets the subject's taxes.
    pub taxation: bool,
    /// Subject must follow the parent's state religion.
    pub religious_conformity: bool,
}

impl GovernanceRestrictions {
    /// Number of restrictions in force.
    pub fn count(&self) -> u32 {
        [
            self.foreign_policy,
            self.military_command,
            self.taxation,
            self.religious_conformity,
        ]
        .into_iter()
        .map(u32::from)
        .sum()
    }
}

/// What the subject owes the parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractTerms {
    /// Percentage of each resource handed over, in `[0, 100]`.
    pub obligations: BTreeMap<ResourceKind, Decimal>,
    /// Percentage of manpower levied, in `[0, 100]`.
    pub manpower: Decimal,
    /// Governance rights surrendered.
    pub restrictions: GovernanceRestrictions,
    /// Contract length.
    pub duration: ContractDuration,
}

impl ContractTerms {
    /// Check every percentage lies in `[0, 100]`.
    ///
    /// # Errors
    ///
    /// [`ContractError::ObligationOutOfRange`] for the first offending value.
    pub fn validate(&self) -> Result<(), ContractError> {
        let in_range = |v: Decimal| v >= Decimal::ZERO && v <= Decimal::ONE_HUNDRED;
        for (resource, value) in &self.obligations {
            if !in_range(*value) {
                return Err(ContractError::ObligationOutOfRange {
                    resource: Some(*resource),
                    value: *value,
                });
            }
        }
        if !in_range(self.manpower) {
            return Err(ContractError::ObligationOutOfRange {
                resource: None,
                value: self.manpower,
            });
        }
        Ok(())
    }
}

/// Loyalty a subject feels under `terms`.
pub fn fairness_loyalty(terms: &ContractTerms) -> Decimal {
    let resource_avg = if terms.obligations.is_empty() {
        Decimal::ZERO
    } else {
        let sum: Decimal = terms.obligations.values().copied().sum();
        let len = u32::try_from(terms.obligations.len()).unwrap_or(u32::MAX);
        sum.checked_div(Decimal::from(len)).unwrap_or(Decimal::ZERO)
    };
    let manpower_penalty = terms.manpower.saturating_mul(Decimal::new(5, 1));
    let restriction_penalty = Decimal::TEN.saturating_mul(Decimal::from(terms.restrictions.count()));

    Decimal::ONE_HUNDRED
        .saturating_sub(resource_avg)
        .saturating_sub(manpower_penalty)
        .saturating_sub(restriction_penalty)
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
}

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

/// An agreement between a parent realm and one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    /// Unique contract identifier.
    pub id: ContractId,
    /// The realm receiving obligations.
    pub parent: RealmId,
    /// The bound party.
    pub subject: ContractSubject,
    /// Current terms.
    terms: ContractTerms,
    /// Subject loyalty in `[0, 100]`.
    loyalty: Decimal,
    /// Months the contract has run.
    months_elapsed: u32,
}

impl Contract {
    /// Current terms.
    pub const fn terms(&self) -> &ContractTerms {
        &self.terms
    }

    /// Subject loyalty in `[0, 100]`.
    pub const fn loyalty(&self) -> Decimal {
        self.loyalty
    }

    /// Months the contract has run.
    pub const fn months_elapsed(&self) -> u32 {
        self.months_elapsed
    }

    /// Whether a fixed-term contract has run its course.
    pub const fn is_expired(&self) -> bool {
        match self.terms.duration {
            ContractDuration::Months(limit) => self.months_elapsed >= limit,
            ContractDuration::Permanent => false,
        }
    }
}

// ---------------------------------------------------------------------------
// ContractBook
// ---------------------------------------------------------------------------

/// Every contract in force.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractBook {
    /// Contracts keyed by id.
    contracts: BTreeMap<ContractId, Contract>,
}

impl ContractBook {
    /// Create an empty book.
    pub const fn new() -> Self {
        Self {
            contracts: BTreeMap::new(),
        }
    }

    /// Create a contract and compute its initial loyalty.
    ///
    /// # Errors
    ///
    /// [`ContractError::SelfContract`] when a realm would be its own subject,
    /// [`ContractError::ObligationOutOfRange`] for invalid percentages.
    pub fn create(
        &mut self,
        parent: RealmId,
        subject: ContractSubject,
        terms: ContractTerms,
    ) -> Result<ContractId, ContractError> {
        if subject == ContractSubject::Realm(parent) {
            warn!(realm = %parent, "Contract rejected: realm cannot bind itself");
            return Err(ContractError::SelfContract(parent));
        }
        terms.validate().inspect_err(|e| {
            warn!(realm = %parent, error = %e, "Contract rejected");
        })?;

        let id = ContractId::new();
        let loyalty = fairness_loyalty(&terms);
        self.contracts.insert(
            id,
            Contract {
                id,
                parent,
                subject,
                terms,
                loyalty,
                months_elapsed: 0,
            },
        );
        info!(contract = %id, parent = %parent, subject = ?subject, %loyalty, "Contract signed");
        Ok(id)
    }

    /// Look up a contract.
    pub fn get(&self, id: ContractId) -> Option<&Contract> {
        self.contracts.get(&id)
    }

    /// Replace a contract's terms and recompute loyalty.
    ///
    /// # Errors
    ///
    /// [`ContractError::UnknownContract`] or
    /// [`ContractError::ObligationOutOfRange`]; the contract is unchanged on error.
    pub fn update_terms(&mut self, id: ContractId, terms: ContractTerms) -> Result<Decimal, ContractError> {
        let contract = self
            .contracts
            .get_mut(&id)
            .ok_or(ContractError::UnknownContract(id))?;
        terms.validate()?;
        contract.loyalty = fairness_loyalty(&terms);
        contract.terms = terms;
        debug!(contract = %id, loyalty = %contract.loyalty, "Contract terms updated");
        Ok(contract.loyalty)
    }

    /// Recompute loyalty from the current terms.
    ///
    /// # Errors
    ///
    /// [`ContractError::UnknownContract`].
    pub fn update_loyalty(&mut self, id: ContractId) -> Result<Decimal, ContractError> {
        let contract = self
            .contracts
            .get_mut(&id)
            .ok_or(ContractError::UnknownContract(id))?;
        contract.loyalty = fairness_loyalty(&contract.terms);
        Ok(contract.loyalty)
    }

    /// Dissolve a contract.
    pub fn remove(&mut self, id: ContractId) -> Option<Contract> {
        self.contracts.remove(&id)
    }

    /// Contracts held by `parent`.
    pub fn for_parent(&self, parent: RealmId) -> impl Iterator<Item = &Contract> {
        self.contracts.values().filter(move |c| c.parent == parent)
    }

    /// Number of contracts in force.
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    /// Whether no contracts are in force.
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    /// Age every contract by one month and remove the expired ones.
    ///
    /// Returns the removed contracts.
    pub fn advance_month(&mut self) -> Vec<Contract> {
        for contract in self.contracts.values_mut() {
            contract.months_elapsed = contract.months_elapsed.saturating_add(1);
        }
        let expired: Vec<ContractId> = self
            .contracts
            .values()
            .filter(|c| c.is_expired())
            .map(|c| c.id)
            .collect();

        let mut removed = Vec::with_capacity(expired.len());
        for id in expired {
            if let Some(contract) = self.contracts.remove(&id) {
                info!(
                    contract = %id,
                    parent = %contract.parent,
                    months = contract.months_elapsed,
                    "Contract expired"
                );
                removed.push(contract);
            }
        }
        removed
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn terms(gold: i64, food: i64, manpower: i64, duration: ContractDuration) -> ContractTerms {
        let mut obligations = BTreeMap::new();
        obligations.insert(ResourceKind::Gold, Decimal::from(gold));
        obligations.insert(ResourceKind::Food, Decimal::from(food));
        ContractTerms {
            obligations,
            manpower: Decimal::from(manpower),
            restrictions: GovernanceRestrictions::default(),
            duration,
        }
    }

    #[test]
    fn loyalty_follows_fairness_formula() {
        let mut t = terms(20, 10, 10, ContractDuration::Permanent);
        // 100 - 15 - 5 = 80
        assert_eq!(fairness_loyalty(&t), Decimal::from(80));

        t.restrictions.foreign_policy = true;
        t.restrictions.taxation = true;
        // 80 - 20 = 60
        assert_eq!(fairness_loyalty(&t), Decimal::from(60));

        let harsh = terms(100, 100, 100, ContractDuration::Permanent);
        assert_eq!(fairness_loyalty(&harsh), Decimal::ZERO);

        let mut lenient = terms(0, 0, 0, ContractDuration::Permanent);
        lenient.obligations.clear();
        assert_eq!(fairness_loyalty(&lenient), Decimal::ONE_HUNDRED);
        lenient.manpower = Decimal::new(15, 0);
        assert_eq!(fairness_loyalty(&lenient), Decimal::new(925, 1));
    }

    #[test]
    fn invalid_contracts_are_rejected() {
        let mut book = ContractBook::new();
        assert_eq!(
            book.create(
                RealmId(1),
                ContractSubject::Realm(RealmId(1)),
                terms(10, 10, 10, ContractDuration::Permanent)
            ),
            Err(ContractError::SelfContract(RealmId(1)))
        );
        assert_eq!(
            book.create(
                RealmId(1),
                ContractSubject::Realm(RealmId(2)),
                terms(120, 10, 10, ContractDuration::Permanent)
            ),
            Err(ContractError::ObligationOutOfRange {
                resource: Some(ResourceKind::Gold),
                value: Decimal::from(120),
            })
        );
        assert!(matches!(
            book.create(
                RealmId(1),
                ContractSubject::Agent(AgentId(3)),
                terms(10, 10, -1, ContractDuration::Permanent)
            ),
            Err(ContractError::ObligationOutOfRange { resource: None, .. })
        ));
        assert!(book.is_empty());
    }

    #[test]
    fn update_terms_recomputes_loyalty() {
        let mut book = ContractBook::new();
        let id = book
            .create(
                RealmId(1),
                ContractSubject::Realm(RealmId(2)),
                terms(20, 10, 10, ContractDuration::Permanent),
            )
            .unwrap();
        assert_eq!(book.get(id).unwrap().loyalty(), Decimal::from(80));

        let loyalty = book
            .update_terms(id, terms(50, 50, 0, ContractDuration::Permanent))
            .unwrap();
        assert_eq!(loyalty, Decimal::from(50));
        assert!(book.update_terms(id, terms(50, 101, 0, ContractDuration::Permanent)).is_err());
        assert_eq!(book.get(id).unwrap().loyalty(), Decimal::from(50));
        assert_eq!(book.update_loyalty(id).unwrap(), Decimal::from(50));

        let missing = ContractId::new();
        assert_eq!(book.update_loyalty(missing), Err(ContractError::UnknownContract(missing)));
    }

    #[test]
    fn fixed_term_contracts_expire() {
        let mut book = ContractBook::new();
        let short = book
            .create(
                RealmId(1),
                ContractSubject::Realm(RealmId(2)),
                terms(10, 10, 0, ContractDuration::Months(2)),
            )
            .unwrap();
        let forever = book
            .create(
                RealmId(1),
                ContractSubject::Agent(AgentId(7)),
                terms(10, 10, 0, ContractDuration::Permanent),
            )
            .unwrap();
        book.create(
            RealmId(5),
            ContractSubject::Realm(RealmId(6)),
            terms(0, 0, 0, ContractDuration::Permanent),
        )
        .unwrap();
        assert_eq!(book.for_parent(RealmId(1)).count(), 2);

        assert!(book.advance_month().is_empty());
        let expired = book.advance_month();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired.first().unwrap().id, short);
        assert!(book.get(short).is_none());
        assert_eq!(book.get(forever).unwrap().months_elapsed(), 2);
        assert!(book.remove(forever).is_some());
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn contract_serializes() {
        let mut book = ContractBook::new();
        let id = book
            .create(
                RealmId(1),
                ContractSubject::Realm(RealmId(2)),
                terms(10, 30, 20, ContractDuration::Months(12)),
            )
            .unwrap();
        let json = serde_json::to_string(book.get(id).unwrap()).unwrap();
        let back: Contract = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, book.get(id).unwrap());
    }
}
