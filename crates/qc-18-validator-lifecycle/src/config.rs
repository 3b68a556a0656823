//! Configuration types for the validator lifecycle

use crate::domain::{Amount, BlockNumber, LifecycleError, LifecycleResult};
use serde::{Deserialize, Serialize};

/// Blocks per day at a 3 second block time
pub const BLOCKS_PER_DAY: BlockNumber = 28_800;

/// Full lifecycle configuration, fixed at construction.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct LifecycleConfig {
    /// Slashing and eligibility policy
    #[serde(default)]
    pub penalty: PenaltyConfig,

    /// Epoch / period geometry
    #[serde(default)]
    pub epoch: EpochConfig,
}

/// Penalty thresholds and validator eligibility policy
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct PenaltyConfig {
    /// Missed blocks in one period that trigger a misdemeanor
    pub misdemeanor_threshold: u32,

    /// Missed blocks in one period that trigger a felony
    pub felony_threshold: u32,

    /// Blocks a felon stays jailed
    pub felony_jail_blocks: BlockNumber,

    /// Stake removed on felony
    pub slash_felony_amount: Amount,

    /// Stake removed on proven double-signing
    pub slash_double_sign_amount: Amount,

    /// Minimum collateral for active-set eligibility
    pub min_validator_balance: Amount,

    /// Upper bound of the active set
    pub max_validator_number: usize,

    /// Upper bound of the candidate pool held by the staking ledger
    pub max_validator_candidate: usize,
}

impl Default for PenaltyConfig {
    fn default() -> Self {
        Self {
            misdemeanor_threshold: 50,
            felony_threshold: 150,
            felony_jail_blocks: BLOCKS_PER_DAY * 2,
            slash_felony_amount: 1,
            slash_double_sign_amount: 1_000,
            min_validator_balance: 100,
            max_validator_number: 21,
            max_validator_candidate: 100,
        }
    }
}

/// Epoch and period lengths
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct EpochConfig {
    /// Blocks per epoch
    pub number_of_blocks_in_epoch: BlockNumber,

    /// Epochs per period (one day by default)
    pub number_of_epochs_in_period: u64,
}

impl Default for EpochConfig {
    fn default() -> Self {
        Self {
            number_of_blocks_in_epoch: 600,
            number_of_epochs_in_period: 48,
        }
    }
}

impl LifecycleConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json(json: &str) -> LifecycleResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| LifecycleError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the state machines cannot operate under.
    pub fn validate(&self) -> LifecycleResult<()> {
        let p = &self.penalty;
        if p.misdemeanor_threshold == 0 {
            return Err(invalid("misdemeanor_threshold must be > 0"));
        }
        if p.misdemeanor_threshold >= p.felony_threshold {
            return Err(invalid(format!(
                "misdemeanor_threshold ({}) must be below felony_threshold ({})",
                p.misdemeanor_threshold, p.felony_threshold
            )));
        }
        if p.max_validator_number == 0 {
            return Err(invalid("max_validator_number must be > 0"));
        }
        if p.max_validator_candidate < p.max_validator_number {
            return Err(invalid(format!(
                "max_validator_candidate ({}) must be >= max_validator_number ({})",
                p.max_validator_candidate, p.max_validator_number
            )));
        }
        if self.epoch.number_of_blocks_in_epoch == 0 {
            return Err(invalid("number_of_blocks_in_epoch must be > 0"));
        }
        if self.epoch.number_of_epochs_in_period == 0 {
            return Err(invalid("number_of_epochs_in_period must be > 0"));
        }
        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> LifecycleError {
    LifecycleError::InvalidConfig(reason.into())
}
