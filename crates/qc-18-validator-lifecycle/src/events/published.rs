//! Published events (Outgoing)
//!
//! Notices emitted by the lifecycle service and by the staking ledger.
//! Payload shapes are fixed: consumers match on them field by field.

use crate::domain::{Address, Amount, BlockNumber, PeriodNumber, SlashTier};
use serde::{Deserialize, Serialize};

/// Every notice the subsystem can publish
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    /// A validator crossed an unavailability threshold
    UnavailabilitySlashed {
        validator: Address,
        tier: SlashTier,
        period: PeriodNumber,
    },
    /// Penalty applied. Misdemeanors publish `(validator, 0, 0)`
    ValidatorPunished {
        validator: Address,
        jailed_until: BlockNumber,
        slashed_amount: Amount,
    },
    /// Active set recomputed at a wrap-up, published even when unchanged
    ValidatorSetUpdated { validators: Vec<Address> },
    /// Stake added to a validator
    Staked { validator: Address, amount: Amount },
    /// Stake delegated to a validator
    Delegated {
        delegator: Address,
        validator: Address,
        amount: Amount,
    },
    /// Stake removed from a validator
    Unstaked { validator: Address, amount: Amount },
    /// Delegation withdrawn from a validator
    Undelegated {
        delegator: Address,
        validator: Address,
        amount: Amount,
    },
}

impl LifecycleEvent {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::UnavailabilitySlashed { .. } => "UnavailabilitySlashed",
            Self::ValidatorPunished { .. } => "ValidatorPunished",
            Self::ValidatorSetUpdated { .. } => "ValidatorSetUpdated",
            Self::Staked { .. } => "Staked",
            Self::Delegated { .. } => "Delegated",
            Self::Unstaked { .. } => "Unstaked",
            Self::Undelegated { .. } => "Undelegated",
        }
    }
}
