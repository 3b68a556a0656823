use crate::config::LifecycleConfig;
use crate::domain::{
    ActiveSet, BlockNumber, EpochClock, JailRegistry, PenaltyEngine, SlashTracker,
    ValidatorSetRotator,
};
use crate::events::LifecycleEvent;
use std::collections::VecDeque;

/// Encapsulates the mutable state of the Validator Lifecycle Service.
///
/// Held behind a single lock: one state transition per call, all or nothing.
pub struct LifecycleState {
    pub tracker: SlashTracker,
    pub penalty: PenaltyEngine,
    pub jail: JailRegistry,
    pub rotator: ValidatorSetRotator,
    pub clock: EpochClock,
    pub active_set: ActiveSet,
    /// Block of the last accepted unavailability report
    pub last_report_block: Option<BlockNumber>,
    /// Block of the last wrap-up
    pub last_wrap_up_block: Option<BlockNumber>,
    /// Notices of committed transitions awaiting delivery, oldest first
    pub pending_notices: VecDeque<LifecycleEvent>,
}

impl LifecycleState {
    pub fn new(config: &LifecycleConfig) -> Self {
        Self {
            tracker: SlashTracker::new(),
            penalty: PenaltyEngine::new(config.penalty.clone()),
            jail: JailRegistry::new(),
            rotator: ValidatorSetRotator::new(&config.penalty),
            clock: EpochClock::new(&config.epoch),
            active_set: ActiveSet::default(),
            last_report_block: None,
            last_wrap_up_block: None,
            pending_notices: VecDeque::new(),
        }
    }

    /// Start from a known active set (e.g. genesis validators)
    pub fn with_active_set(config: &LifecycleConfig, active_set: ActiveSet) -> Self {
        Self {
            active_set,
            ..Self::new(config)
        }
    }
}
