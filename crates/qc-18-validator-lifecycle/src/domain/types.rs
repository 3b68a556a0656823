//! Primitive types shared by the lifecycle domain

use serde::{Deserialize, Serialize};
use std::fmt;

/// Validator / delegator account address (20 bytes)
pub type Address = [u8; 20];

/// Block header hash
pub type HeaderHash = [u8; 32];

/// Block height
pub type BlockNumber = u64;

/// Collateral amount in the smallest staking unit
pub type Amount = u128;

/// Epoch ordinal
pub type EpochNumber = u64;

/// Period ordinal (a fixed number of epochs)
pub type PeriodNumber = u64;

/// Render an address as `0x`-prefixed hex for logs and error messages.
pub fn fmt_address(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}

/// Severity selected for one unavailability report.
///
/// Exactly one tier is chosen per report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlashTier {
    /// Below (or between) thresholds
    None,
    /// Counter reached `misdemeanor_threshold` on this report
    Misdemeanor,
    /// Counter reached `felony_threshold` on this report
    Felony,
    /// Punished directly from double-sign evidence
    DoubleSign,
}

impl SlashTier {
    /// Label used for metrics and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Misdemeanor => "misdemeanor",
            Self::Felony => "felony",
            Self::DoubleSign => "double_sign",
        }
    }
}

impl fmt::Display for SlashTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
