//! Error types for the validator lifecycle subsystem

use super::{fmt_address, Address, Amount, BlockNumber};

/// Validator lifecycle error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("Unauthorized caller: expected {}, got {}", fmt_address(.expected), fmt_address(.actual))]
    UnauthorizedCaller { expected: Address, actual: Address },

    #[error("Unknown validator: {}", fmt_address(.0))]
    UnknownValidator(Address),

    #[error("Unavailability already reported in block {block}")]
    DuplicateReport { block: BlockNumber },

    #[error("Out of order block: last processed {last}, got {got}")]
    OutOfOrderBlock { last: BlockNumber, got: BlockNumber },

    #[error("Invalid double-sign evidence against {}", fmt_address(.0))]
    InvalidEvidence(Address),

    #[error("Double-sign evidence against {} at height {height} already processed", fmt_address(.validator))]
    EvidenceAlreadyProcessed {
        validator: Address,
        height: BlockNumber,
    },

    #[error("Insufficient stake: required {required}, provided {provided}")]
    InsufficientStake { required: Amount, provided: Amount },

    #[error("Validator candidate limit reached: {limit}")]
    CandidateLimitReached { limit: usize },

    #[error("Address is already a validator candidate: {}", fmt_address(.0))]
    AlreadyCandidate(Address),

    #[error("No stake record for {}", fmt_address(.0))]
    NoStakeRecord(Address),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Staking ledger error: {0}")]
    LedgerError(String),

    #[error("Event bus error: {0}")]
    EventBusError(String),
}

/// Result type for lifecycle operations
pub type LifecycleResult<T> = Result<T, LifecycleError>;
