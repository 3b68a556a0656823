//! # Validator Set Rotation
//!
//! Epoch arithmetic and the active-set selection run at every wrap-up.
//!
//! ## Algorithm
//!
//! 1. Take the candidate pool in proposal order with its collateral
//! 2. Drop candidates that are jailed at the wrap-up block
//! 3. Drop candidates below `min_validator_balance` (or with no stake record)
//! 4. Stable-sort by descending collateral (ties keep proposal order)
//! 5. Keep the first `max_validator_number`
//!
//! Eligibility is evaluated against state as of the wrap-up call only.

use crate::config::{EpochConfig, PenaltyConfig};
use crate::domain::{
    ActiveSet, Address, Amount, BlockNumber, EpochNumber, JailRegistry, PeriodNumber,
};
use serde::{Deserialize, Serialize};

/// Maps block heights onto epochs and periods.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EpochClock {
    blocks_in_epoch: BlockNumber,
    epochs_in_period: u64,
}

impl EpochClock {
    /// Both lengths must be non-zero; `LifecycleConfig::validate` rejects
    /// configurations that violate this.
    pub fn new(config: &EpochConfig) -> Self {
        debug_assert!(
            config.number_of_blocks_in_epoch > 0,
            "number_of_blocks_in_epoch must be > 0"
        );
        debug_assert!(
            config.number_of_epochs_in_period > 0,
            "number_of_epochs_in_period must be > 0"
        );
        Self {
            blocks_in_epoch: config.number_of_blocks_in_epoch,
            epochs_in_period: config.number_of_epochs_in_period,
        }
    }

    pub fn epoch_of(&self, block: BlockNumber) -> EpochNumber {
        block / self.blocks_in_epoch
    }

    pub fn period_of(&self, block: BlockNumber) -> PeriodNumber {
        self.epoch_of(block) / self.epochs_in_period
    }

    /// Last block of its epoch.
    pub fn is_epoch_ending(&self, block: BlockNumber) -> bool {
        block % self.blocks_in_epoch == self.blocks_in_epoch - 1
    }

    /// Last block of its period.
    pub fn is_period_ending(&self, block: BlockNumber) -> bool {
        self.is_epoch_ending(block) && (self.epoch_of(block) + 1) % self.epochs_in_period == 0
    }

    /// First block of `epoch`.
    pub fn epoch_start(&self, epoch: EpochNumber) -> BlockNumber {
        epoch.saturating_mul(self.blocks_in_epoch)
    }
}

/// A candidate as seen by the rotator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateStake {
    pub address: Address,
    /// `None` when the staking ledger has no valid collateral record
    pub collateral: Option<Amount>,
}

/// Result of one wrap-up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationOutcome {
    pub epoch: EpochNumber,
    pub period: PeriodNumber,
    /// This wrap-up opened a new period and reset the counters
    pub period_started: bool,
    /// New ordered active set
    pub validators: Vec<Address>,
    /// In the new set, not in the previous one
    pub joined: Vec<Address>,
    /// In the previous set, not in the new one
    pub left: Vec<Address>,
}

impl RotationOutcome {
    pub fn is_unchanged(&self) -> bool {
        self.joined.is_empty() && self.left.is_empty()
    }
}

/// Active-set selection policy.
#[derive(Clone, Debug)]
pub struct ValidatorSetRotator {
    min_validator_balance: Amount,
    max_validator_number: usize,
}

impl ValidatorSetRotator {
    pub fn new(config: &PenaltyConfig) -> Self {
        Self {
            min_validator_balance: config.min_validator_balance,
            max_validator_number: config.max_validator_number,
        }
    }

    /// Whether a candidate may enter the active set at `at_block`.
    pub fn is_eligible(
        &self,
        candidate: &CandidateStake,
        jail: &JailRegistry,
        at_block: BlockNumber,
    ) -> bool {
        if jail.is_jailed(&candidate.address, at_block) {
            return false;
        }
        matches!(candidate.collateral, Some(c) if c >= self.min_validator_balance)
    }

    /// Rank eligible candidates and cap the result.
    pub fn select(
        &self,
        candidates: &[CandidateStake],
        jail: &JailRegistry,
        at_block: BlockNumber,
    ) -> Vec<Address> {
        let mut eligible: Vec<(Address, Amount)> = candidates
            .iter()
            .filter(|c| self.is_eligible(c, jail, at_block))
            .filter_map(|c| c.collateral.map(|amount| (c.address, amount)))
            .collect();

        // sort_by is stable: equal collateral keeps proposal order
        eligible.sort_by(|a, b| b.1.cmp(&a.1));
        eligible.truncate(self.max_validator_number);
        eligible.into_iter().map(|(address, _)| address).collect()
    }

    /// Compute the next active set and its diff against `previous`.
    pub fn rotate(
        &self,
        previous: &ActiveSet,
        candidates: &[CandidateStake],
        jail: &JailRegistry,
        at_block: BlockNumber,
        clock: &EpochClock,
    ) -> (ActiveSet, RotationOutcome) {
        let epoch = clock.epoch_of(at_block);
        let next = ActiveSet::new(epoch, at_block, self.select(candidates, jail, at_block));

        let outcome = RotationOutcome {
            epoch,
            period: clock.period_of(at_block),
            period_started: false,
            validators: next.validators().to_vec(),
            joined: next.difference(previous),
            left: previous.difference(&next),
        };
        (next, outcome)
    }
}
