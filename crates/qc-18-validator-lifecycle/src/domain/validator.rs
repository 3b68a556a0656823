//! Validator domain entities

use crate::domain::{Address, Amount, BlockNumber, EpochNumber};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Where a validator stands in the lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Membership {
    /// Registered with the staking ledger, not producing blocks
    Candidate,
    /// Member of the current active set
    Active,
    /// Punished and ineligible until the jail window ends
    Jailed,
}

/// Lifecycle view of one validator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorRecord {
    pub address: Address,
    /// Missed blocks in the current period
    pub unavailability_count: u32,
    /// 0 when never jailed
    pub jailed_until: BlockNumber,
    pub membership: Membership,
    /// Collateral as reported by the staking ledger, if any
    pub collateral: Option<Amount>,
}

/// Ordered, size-capped active validator set
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSet {
    /// Epoch the set was computed for
    pub epoch: EpochNumber,
    /// Block at which the set was computed
    pub computed_at: BlockNumber,
    validators: Vec<Address>,
    /// Quick lookup by address
    #[serde(skip)]
    lookup: HashMap<Address, usize>,
}

impl ActiveSet {
    /// Create a new active set
    pub fn new(epoch: EpochNumber, computed_at: BlockNumber, validators: Vec<Address>) -> Self {
        let lookup = validators
            .iter()
            .enumerate()
            .map(|(i, v)| (*v, i))
            .collect();
        Self {
            epoch,
            computed_at,
            validators,
            lookup,
        }
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn contains(&self, validator: &Address) -> bool {
        self.lookup.contains_key(validator)
    }

    /// Position in the ranked set
    pub fn position(&self, validator: &Address) -> Option<usize> {
        self.lookup.get(validator).copied()
    }

    pub fn validators(&self) -> &[Address] {
        &self.validators
    }

    /// Members of `self` missing from `other`.
    pub fn difference(&self, other: &ActiveSet) -> Vec<Address> {
        self.validators
            .iter()
            .filter(|v| !other.contains(v))
            .copied()
            .collect()
    }

    /// Rebuild the lookup table (after deserialization)
    pub fn rebuild_lookup(&mut self) {
        self.lookup = self
            .validators
            .iter()
            .enumerate()
            .map(|(i, v)| (*v, i))
            .collect();
    }
}
