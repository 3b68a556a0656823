//! Validator Lifecycle Service - Core business logic
//!
//! # Flow
//! - Consensus reporter → `record_unavailability` → penalty tier →
//!   (maybe) jail + slash → notices
//! - Epoch boundary → `wrap_up_epoch` → period reset → active-set
//!   recomputation → `ValidatorSetUpdated`
//!
//! # Atomicity
//! Every call runs under one write lock. The stake slash is the only
//! fallible side effect and runs before any local mutation is committed,
//! so a rejected call leaves counters, jail windows and the active set
//! untouched.
//!
//! Notices of a committed transition go through an ordered outbox. A bus
//! failure after commit does not turn the call into a rejection: the call
//! returns `Ok`, the notices stay queued (`pending_notices`) and are
//! delivered first on the next call or on `flush_notices`.

use crate::config::LifecycleConfig;
use crate::domain::{
    fmt_address, ActiveSet, Address, Amount, BlockNumber, CandidateStake, DoubleSignEvidence,
    EpochNumber, LifecycleError, LifecycleResult, Membership, PenaltyDecision, PeriodNumber,
    RotationOutcome, SlashTier, UnavailabilityReport, ValidatorRecord,
};
use crate::events::LifecycleEvent;
use crate::metrics;
use crate::ports::{EventBus, StakingLedger, ValidatorLifecycleApi};
use crate::state::LifecycleState;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Validator Lifecycle Service
pub struct ValidatorLifecycleService<E, L>
where
    E: EventBus,
    L: StakingLedger,
{
    event_bus: Arc<E>,
    ledger: Arc<L>,
    state: RwLock<LifecycleState>,
    config: LifecycleConfig,
    /// The only address allowed to report and to trigger wrap-ups
    reporter: Address,
}

/// Dependencies for ValidatorLifecycleService
pub struct LifecycleDependencies<E, L> {
    pub event_bus: Arc<E>,
    pub ledger: Arc<L>,
    pub config: LifecycleConfig,
    /// Block-producer reporting authority
    pub reporter: Address,
}

impl<E, L> ValidatorLifecycleService<E, L>
where
    E: EventBus,
    L: StakingLedger,
{
    /// Create a new service. Fails on an invalid configuration.
    pub fn new(deps: LifecycleDependencies<E, L>) -> LifecycleResult<Self> {
        deps.config.validate()?;
        let state = LifecycleState::new(&deps.config);
        Ok(Self::from_parts(deps, state))
    }

    /// Create with a pre-existing active set
    pub fn with_active_set(
        deps: LifecycleDependencies<E, L>,
        active_set: ActiveSet,
    ) -> LifecycleResult<Self> {
        deps.config.validate()?;
        let state = LifecycleState::with_active_set(&deps.config, active_set);
        Ok(Self::from_parts(deps, state))
    }

    fn from_parts(deps: LifecycleDependencies<E, L>, state: LifecycleState) -> Self {
        Self {
            event_bus: deps.event_bus,
            ledger: deps.ledger,
            state: RwLock::new(state),
            config: deps.config,
            reporter: deps.reporter,
        }
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    fn authorize(&self, caller: Address) -> LifecycleResult<()> {
        if caller != self.reporter {
            warn!(
                caller = %fmt_address(&caller),
                "rejected call from unauthorized caller"
            );
            return Err(LifecycleError::UnauthorizedCaller {
                expected: self.reporter,
                actual: caller,
            });
        }
        Ok(())
    }

    /// Queue `events` behind any undelivered notices and drain the outbox
    /// in order. Returns how many notices were delivered.
    fn deliver(
        &self,
        state: &mut LifecycleState,
        events: Vec<LifecycleEvent>,
    ) -> LifecycleResult<usize> {
        state.pending_notices.extend(events);
        let mut delivered = 0;
        while let Some(event) = state.pending_notices.front() {
            if let Err(e) = self.event_bus.publish(event.clone()) {
                warn!(
                    pending = state.pending_notices.len(),
                    error = %e,
                    "notice delivery deferred"
                );
                return Err(LifecycleError::EventBusError(e));
            }
            state.pending_notices.pop_front();
            delivered += 1;
        }
        Ok(delivered)
    }

    /// Deliver notices of a transition that has already been committed.
    fn deliver_committed(&self, state: &mut LifecycleState, events: Vec<LifecycleEvent>) {
        // Failure is logged by `deliver`; the notices stay queued.
        let _ = self.deliver(state, events);
    }

    /// Slash on the ledger, then jail. Returns `(jailed_until, slashed)`.
    ///
    /// The ledger call is the only fallible step and runs first.
    fn apply_punishment(
        &self,
        state: &mut LifecycleState,
        decision: &PenaltyDecision,
    ) -> LifecycleResult<(BlockNumber, Amount)> {
        let validator = decision.validator;
        let jail_until = decision.jail_until.unwrap_or(0);

        let slashed = self
            .ledger
            .slash_and_unstake(&validator, decision.slash_amount)
            .map_err(|e| match e {
                LifecycleError::NoStakeRecord(v) => LifecycleError::UnknownValidator(v),
                other => other,
            })?;

        if state.jail.jail(validator, jail_until) {
            metrics::record_validator_jailed();
        } else {
            debug!(
                validator = %fmt_address(&validator),
                requested = jail_until,
                existing = state.jail.jail_until_of(&validator),
                "jail request does not extend current window"
            );
        }
        Ok((state.jail.jail_until_of(&validator), slashed))
    }

    fn check_report_order(state: &LifecycleState, block: BlockNumber) -> LifecycleResult<()> {
        match state.last_report_block {
            Some(last) if block == last => Err(LifecycleError::DuplicateReport { block }),
            Some(last) if block < last => Err(LifecycleError::OutOfOrderBlock { last, got: block }),
            _ => Ok(()),
        }
    }

    fn record_unavailability_internal(
        &self,
        validator: Address,
        current_block: BlockNumber,
    ) -> LifecycleResult<UnavailabilityReport> {
        let mut state = self.state.write();
        if let Err(e) = Self::check_report_order(&state, current_block) {
            warn!(validator = %fmt_address(&validator), block = current_block, error = %e, "unavailability report rejected");
            return Err(e);
        }

        let period = state.clock.period_of(current_block);
        let current = state.tracker.count_of(&validator, period);
        if state.penalty.is_saturated(current) {
            state.last_report_block = Some(current_block);
            debug!(
                validator = %fmt_address(&validator),
                period,
                count = current,
                "counter saturated at felony threshold, report ignored"
            );
            return Ok(UnavailabilityReport {
                count: current,
                decision: PenaltyDecision::none(validator, period),
            });
        }

        let count = state.tracker.record_unavailability(validator, period);
        let decision = state
            .penalty
            .evaluate(validator, count, period, current_block);

        let events = match decision.tier {
            SlashTier::Felony => match self.apply_punishment(&mut state, &decision) {
                Ok((jailed_until, slashed)) => {
                    info!(
                        validator = %fmt_address(&validator),
                        period,
                        jailed_until,
                        slashed = %slashed,
                        "felony: validator jailed and slashed"
                    );
                    vec![
                        LifecycleEvent::UnavailabilitySlashed {
                            validator,
                            tier: SlashTier::Felony,
                            period,
                        },
                        LifecycleEvent::ValidatorPunished {
                            validator,
                            jailed_until,
                            slashed_amount: slashed,
                        },
                    ]
                }
                Err(e) => {
                    state.tracker.revert_last(validator, period);
                    warn!(validator = %fmt_address(&validator), error = %e, "felony penalty rejected");
                    return Err(e);
                }
            },
            SlashTier::Misdemeanor => {
                info!(
                    validator = %fmt_address(&validator),
                    period,
                    count,
                    "misdemeanor: unavailability threshold reached"
                );
                vec![
                    LifecycleEvent::UnavailabilitySlashed {
                        validator,
                        tier: SlashTier::Misdemeanor,
                        period,
                    },
                    LifecycleEvent::ValidatorPunished {
                        validator,
                        jailed_until: 0,
                        slashed_amount: 0,
                    },
                ]
            }
            SlashTier::None | SlashTier::DoubleSign => {
                debug!(validator = %fmt_address(&validator), period, count, "unavailability recorded");
                Vec::new()
            }
        };

        state.last_report_block = Some(current_block);
        self.deliver_committed(&mut state, events);
        drop(state);

        metrics::record_unavailability_report();
        if decision.tier != SlashTier::None {
            metrics::record_penalty(decision.tier.as_str());
        }
        Ok(UnavailabilityReport { count, decision })
    }

    fn slash_double_sign_internal(
        &self,
        evidence: DoubleSignEvidence,
        current_block: BlockNumber,
    ) -> LifecycleResult<PenaltyDecision> {
        let mut state = self.state.write();
        let decision = state
            .penalty
            .evaluate_double_sign(&evidence, current_block)
            .map_err(|e| {
                warn!(validator = %fmt_address(&evidence.validator), error = %e, "double-sign evidence rejected");
                e
            })?;

        let (jailed_until, slashed) = self.apply_punishment(&mut state, &decision)?;
        state.penalty.commit_evidence(&evidence);
        self.deliver_committed(
            &mut state,
            vec![LifecycleEvent::ValidatorPunished {
                validator: evidence.validator,
                jailed_until,
                slashed_amount: slashed,
            }],
        );
        drop(state);

        info!(
            validator = %fmt_address(&evidence.validator),
            height = evidence.height,
            jailed_until,
            slashed = %slashed,
            "double-sign: validator jailed and slashed"
        );
        metrics::record_penalty(SlashTier::DoubleSign.as_str());

        Ok(PenaltyDecision {
            jail_until: Some(jailed_until),
            slash_amount: slashed,
            ..decision
        })
    }

    fn wrap_up_epoch_internal(&self, current_block: BlockNumber) -> LifecycleResult<RotationOutcome> {
        let mut state = self.state.write();
        if let Some(last) = state.last_wrap_up_block {
            if current_block < last {
                warn!(last, got = current_block, "wrap-up for an earlier block rejected");
                return Err(LifecycleError::OutOfOrderBlock {
                    last,
                    got: current_block,
                });
            }
        }

        let period = state.clock.period_of(current_block);
        let period_started = state.tracker.reset_period(period);
        if period_started {
            info!(period, block = current_block, "new period: unavailability counters reset");
        }

        let candidates: Vec<CandidateStake> = self
            .ledger
            .candidates()
            .into_iter()
            .map(|address| CandidateStake {
                address,
                collateral: self.ledger.balance_of(&address),
            })
            .collect();

        let LifecycleState {
            rotator,
            jail,
            clock,
            active_set,
            ..
        } = &*state;
        let (next, mut outcome) = rotator.rotate(active_set, &candidates, jail, current_block, clock);
        outcome.period_started = period_started;

        state.active_set = next;
        state.last_wrap_up_block = Some(current_block);
        self.deliver_committed(
            &mut state,
            vec![LifecycleEvent::ValidatorSetUpdated {
                validators: outcome.validators.clone(),
            }],
        );
        drop(state);

        if outcome.is_unchanged() {
            debug!(epoch = outcome.epoch, size = outcome.validators.len(), "validator set unchanged");
        } else {
            info!(
                epoch = outcome.epoch,
                size = outcome.validators.len(),
                joined = outcome.joined.len(),
                left = outcome.left.len(),
                "validator set updated"
            );
        }
        metrics::record_epoch_wrap_up(outcome.validators.len());
        Ok(outcome)
    }
}

impl<E, L> ValidatorLifecycleApi for ValidatorLifecycleService<E, L>
where
    E: EventBus + 'static,
    L: StakingLedger + 'static,
{
    fn record_unavailability(
        &self,
        caller: Address,
        validator: Address,
        current_block: BlockNumber,
    ) -> LifecycleResult<UnavailabilityReport> {
        self.authorize(caller)?;
        self.record_unavailability_internal(validator, current_block)
    }

    fn slash_double_sign(
        &self,
        caller: Address,
        evidence: DoubleSignEvidence,
        current_block: BlockNumber,
    ) -> LifecycleResult<PenaltyDecision> {
        self.authorize(caller)?;
        self.slash_double_sign_internal(evidence, current_block)
    }

    fn wrap_up_epoch(
        &self,
        caller: Address,
        current_block: BlockNumber,
    ) -> LifecycleResult<RotationOutcome> {
        self.authorize(caller)?;
        self.wrap_up_epoch_internal(current_block)
    }

    fn get_validators(&self) -> Vec<Address> {
        self.state.read().active_set.validators().to_vec()
    }

    fn get_jail_untils(&self, validators: &[Address]) -> Vec<BlockNumber> {
        self.state.read().jail.jail_untils(validators)
    }

    fn unavailability_count(&self, validator: &Address, period: PeriodNumber) -> u32 {
        self.state.read().tracker.count_of(validator, period)
    }

    fn validator_record(
        &self,
        validator: &Address,
        at_block: BlockNumber,
    ) -> Option<ValidatorRecord> {
        let state = self.state.read();
        let period = state.clock.period_of(at_block);
        let unavailability_count = state.tracker.count_of(validator, period);
        let jailed_until = state.jail.jail_until_of(validator);
        let is_candidate = self.ledger.is_candidate(validator);
        let is_active = state.active_set.contains(validator);

        if !is_candidate && !is_active && unavailability_count == 0 && jailed_until == 0 {
            return None;
        }

        let membership = if state.jail.is_jailed(validator, at_block) {
            Membership::Jailed
        } else if is_active {
            Membership::Active
        } else {
            Membership::Candidate
        };

        Some(ValidatorRecord {
            address: *validator,
            unavailability_count,
            jailed_until,
            membership,
            collateral: self.ledger.balance_of(validator),
        })
    }

    fn pending_notices(&self) -> usize {
        self.state.read().pending_notices.len()
    }

    fn flush_notices(&self) -> LifecycleResult<usize> {
        let mut state = self.state.write();
        self.deliver(&mut state, Vec::new())
    }

    fn epoch_of(&self, block: BlockNumber) -> EpochNumber {
        self.state.read().clock.epoch_of(block)
    }

    fn period_of(&self, block: BlockNumber) -> PeriodNumber {
        self.state.read().clock.period_of(block)
    }
}
