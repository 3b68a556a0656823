//! Driving ports (Inbound API)

use crate::domain::{
    Address, BlockNumber, DoubleSignEvidence, EpochNumber, LifecycleResult, PenaltyDecision,
    PeriodNumber, RotationOutcome, UnavailabilityReport, ValidatorRecord,
};

/// Primary validator lifecycle API
///
/// State-changing calls carry the caller address and are only accepted from
/// the designated block-producer reporter.
pub trait ValidatorLifecycleApi: Send + Sync {
    /// Report that `validator` missed its block at `current_block`
    ///
    /// # Rules
    /// - At most one report per block
    /// - Misdemeanor / felony fire only at the exact threshold crossing
    fn record_unavailability(
        &self,
        caller: Address,
        validator: Address,
        current_block: BlockNumber,
    ) -> LifecycleResult<UnavailabilityReport>;

    /// Punish verified double-sign evidence (bypasses the counters)
    fn slash_double_sign(
        &self,
        caller: Address,
        evidence: DoubleSignEvidence,
        current_block: BlockNumber,
    ) -> LifecycleResult<PenaltyDecision>;

    /// Recompute the active set at an epoch boundary
    fn wrap_up_epoch(
        &self,
        caller: Address,
        current_block: BlockNumber,
    ) -> LifecycleResult<RotationOutcome>;

    /// Current ordered active set
    fn get_validators(&self) -> Vec<Address>;

    /// Jail release blocks in input order, 0 for never jailed
    fn get_jail_untils(&self, validators: &[Address]) -> Vec<BlockNumber>;

    /// Unavailability counter of `validator` in `period`
    fn unavailability_count(&self, validator: &Address, period: PeriodNumber) -> u32;

    /// Lifecycle view of a validator, `None` if never seen
    fn validator_record(&self, validator: &Address, at_block: BlockNumber)
        -> Option<ValidatorRecord>;

    /// Notices of committed transitions not yet accepted by the event bus
    fn pending_notices(&self) -> usize;

    /// Retry delivery of pending notices, in order. Returns how many were
    /// delivered; fails if the bus still rejects them.
    fn flush_notices(&self) -> LifecycleResult<usize>;

    fn epoch_of(&self, block: BlockNumber) -> EpochNumber;

    fn period_of(&self, block: BlockNumber) -> PeriodNumber;
}
