//! In-memory staking ledger adapter
//!
//! Keeps candidate records in proposal order. Collateral is the validator's
//! self-stake plus everything delegated to it. Slashing only touches the
//! validator's own stake.

use crate::config::PenaltyConfig;
use crate::domain::{fmt_address, Address, Amount, LifecycleError, LifecycleResult};
use crate::events::LifecycleEvent;
use crate::ports::{EventBus, StakingLedger};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Candidate admission policy enforced by the ledger
#[derive(Clone, Copy, Debug)]
pub struct LedgerPolicy {
    /// Smallest initial self-stake accepted by `propose_validator`
    pub min_validator_balance: Amount,
    /// Size limit of the candidate pool
    pub max_validator_candidate: usize,
}

impl From<&PenaltyConfig> for LedgerPolicy {
    fn from(config: &PenaltyConfig) -> Self {
        Self {
            min_validator_balance: config.min_validator_balance,
            max_validator_candidate: config.max_validator_candidate,
        }
    }
}

#[derive(Debug, Default)]
struct StakeRecord {
    self_stake: Amount,
    /// delegator -> amount (excluding self-delegation)
    delegations: HashMap<Address, Amount>,
}

impl StakeRecord {
    fn total(&self) -> Amount {
        self.delegations
            .values()
            .fold(self.self_stake, |acc, a| acc.saturating_add(*a))
    }
}

#[derive(Debug, Default)]
struct LedgerState {
    /// Candidates in proposal order
    order: Vec<Address>,
    records: HashMap<Address, StakeRecord>,
}

/// In-memory StakingLedger adapter
pub struct InMemoryStakingLedger<B: EventBus> {
    state: RwLock<LedgerState>,
    policy: LedgerPolicy,
    event_bus: Arc<B>,
}

impl<B: EventBus> InMemoryStakingLedger<B> {
    pub fn new(policy: LedgerPolicy, event_bus: Arc<B>) -> Self {
        Self {
            state: RwLock::new(LedgerState::default()),
            policy,
            event_bus,
        }
    }

    /// Delegate stake from a third party. Emits `Delegated`.
    pub fn delegate(
        &self,
        delegator: Address,
        validator: Address,
        amount: Amount,
    ) -> LifecycleResult<()> {
        if delegator == validator {
            return self.add_self_stake(validator, amount, false);
        }

        let mut state = self.state.write();
        let record = state
            .records
            .get_mut(&validator)
            .ok_or(LifecycleError::NoStakeRecord(validator))?;
        let previous = record.delegations.get(&delegator).copied();
        record
            .delegations
            .insert(delegator, previous.unwrap_or(0).saturating_add(amount));

        let notice = LifecycleEvent::Delegated {
            delegator,
            validator,
            amount,
        };
        if let Err(e) = self.emit(vec![notice]) {
            if let Some(record) = state.records.get_mut(&validator) {
                match previous {
                    Some(previous) => record.delegations.insert(delegator, previous),
                    None => record.delegations.remove(&delegator),
                };
            }
            return Err(e);
        }
        Ok(())
    }

    /// Self-stake of `validator`, `None` without a record
    pub fn self_stake_of(&self, validator: &Address) -> Option<Amount> {
        self.state.read().records.get(validator).map(|r| r.self_stake)
    }

    pub fn candidate_count(&self) -> usize {
        self.state.read().order.len()
    }

    /// Publish the notices of one mutation.
    ///
    /// Called with the ledger lock held; callers restore their mutation on
    /// error so stake and notices commit together.
    fn emit(&self, events: Vec<LifecycleEvent>) -> LifecycleResult<()> {
        self.event_bus
            .publish_batch(events)
            .map_err(LifecycleError::EventBusError)
    }

    fn stake_added_notices(validator: Address, amount: Amount) -> Vec<LifecycleEvent> {
        vec![
            LifecycleEvent::Staked { validator, amount },
            LifecycleEvent::Delegated {
                delegator: validator,
                validator,
                amount,
            },
        ]
    }

    /// Increase self-stake; `with_staked` selects the proposal/top-up notice
    /// pair over a bare self-delegation.
    fn add_self_stake(
        &self,
        validator: Address,
        amount: Amount,
        with_staked: bool,
    ) -> LifecycleResult<()> {
        let mut state = self.state.write();
        let record = state
            .records
            .get_mut(&validator)
            .ok_or(LifecycleError::NoStakeRecord(validator))?;
        let previous = record.self_stake;
        record.self_stake = previous.saturating_add(amount);

        let notices = if with_staked {
            Self::stake_added_notices(validator, amount)
        } else {
            vec![LifecycleEvent::Delegated {
                delegator: validator,
                validator,
                amount,
            }]
        };
        if let Err(e) = self.emit(notices) {
            if let Some(record) = state.records.get_mut(&validator) {
                record.self_stake = previous;
            }
            return Err(e);
        }
        Ok(())
    }
}

impl<B: EventBus> StakingLedger for InMemoryStakingLedger<B> {
    fn candidates(&self) -> Vec<Address> {
        self.state.read().order.clone()
    }

    fn is_candidate(&self, validator: &Address) -> bool {
        self.state.read().records.contains_key(validator)
    }

    fn balance_of(&self, validator: &Address) -> Option<Amount> {
        self.state.read().records.get(validator).map(StakeRecord::total)
    }

    fn propose_validator(&self, candidate: Address, amount: Amount) -> LifecycleResult<()> {
        let mut state = self.state.write();
        if state.records.contains_key(&candidate) {
            return Err(LifecycleError::AlreadyCandidate(candidate));
        }
        if amount < self.policy.min_validator_balance {
            return Err(LifecycleError::InsufficientStake {
                required: self.policy.min_validator_balance,
                provided: amount,
            });
        }
        if state.order.len() >= self.policy.max_validator_candidate {
            return Err(LifecycleError::CandidateLimitReached {
                limit: self.policy.max_validator_candidate,
            });
        }

        state.order.push(candidate);
        state.records.insert(
            candidate,
            StakeRecord {
                self_stake: amount,
                delegations: HashMap::new(),
            },
        );

        if let Err(e) = self.emit(Self::stake_added_notices(candidate, amount)) {
            state.order.pop();
            state.records.remove(&candidate);
            tracing::warn!(candidate = %fmt_address(&candidate), error = %e, "candidate proposal rolled back");
            return Err(e);
        }

        tracing::info!(
            candidate = %fmt_address(&candidate),
            amount = %amount,
            "validator candidate proposed"
        );
        Ok(())
    }

    fn stake(&self, validator: Address, amount: Amount) -> LifecycleResult<()> {
        self.add_self_stake(validator, amount, true)
    }

    fn slash_and_unstake(&self, validator: &Address, amount: Amount) -> LifecycleResult<Amount> {
        let mut state = self.state.write();
        let record = state
            .records
            .get_mut(validator)
            .ok_or(LifecycleError::NoStakeRecord(*validator))?;
        let slashed = amount.min(record.self_stake);
        record.self_stake -= slashed;

        let notices = vec![
            LifecycleEvent::Unstaked {
                validator: *validator,
                amount: slashed,
            },
            LifecycleEvent::Undelegated {
                delegator: *validator,
                validator: *validator,
                amount: slashed,
            },
        ];
        if let Err(e) = self.emit(notices) {
            if let Some(record) = state.records.get_mut(validator) {
                record.self_stake += slashed;
            }
            tracing::warn!(validator = %fmt_address(validator), error = %e, "slash rolled back");
            return Err(e);
        }

        tracing::debug!(
            validator = %fmt_address(validator),
            requested = %amount,
            slashed = %slashed,
            "stake slashed"
        );
        Ok(slashed)
    }
}
