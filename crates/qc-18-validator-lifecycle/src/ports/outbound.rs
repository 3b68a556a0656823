//! Driven ports (Outbound dependencies)

use crate::domain::{Address, Amount, LifecycleResult};
use crate::events::LifecycleEvent;

/// Event bus for published notices
pub trait EventBus: Send + Sync {
    /// Publish one notice. Notices of one operation are published in order.
    fn publish(&self, event: LifecycleEvent) -> Result<(), String>;

    /// Publish notices that belong to one state transition.
    ///
    /// Adapters that can should deliver all or none of `events`. The default
    /// publishes in order and stops at the first failure.
    fn publish_batch(&self, events: Vec<LifecycleEvent>) -> Result<(), String> {
        for event in events {
            self.publish(event)?;
        }
        Ok(())
    }
}

/// Staking ledger (consumed, not owned)
///
/// Authoritative source of validator collateral. Collateral is self-stake
/// plus delegated stake.
pub trait StakingLedger: Send + Sync {
    /// Candidate pool in proposal order
    fn candidates(&self) -> Vec<Address>;

    /// Whether `validator` has a candidate record
    fn is_candidate(&self, validator: &Address) -> bool;

    /// Total collateral, `None` without a stake record
    fn balance_of(&self, validator: &Address) -> Option<Amount>;

    /// Register a candidate with an initial self-stake.
    ///
    /// Emits `Staked` and `Delegated`.
    fn propose_validator(&self, candidate: Address, amount: Amount) -> LifecycleResult<()>;

    /// Top up self-stake. Emits `Staked` and `Delegated`.
    fn stake(&self, validator: Address, amount: Amount) -> LifecycleResult<()>;

    /// Slash `amount` of collateral and unstake it.
    ///
    /// Emits `Unstaked` and `Undelegated` and returns the amount removed.
    /// Fails if `validator` has no stake record. On any error the stake is
    /// left untouched.
    fn slash_and_unstake(&self, validator: &Address, amount: Amount) -> LifecycleResult<Amount>;
}
