//! # Slash Tracker - Unavailability Counters
//!
//! Counts missed-block reports per validator per period.
//!
//! Counters are keyed by `(validator, period)`, so a new period starts from
//! zero simply by addressing a new key. `reset_period` only garbage-collects
//! the keys of periods that are over.
//!
//! The tracker does not deduplicate: every call is one missed block as
//! reported by the consensus layer.

use crate::domain::{Address, PeriodNumber};
use std::collections::HashMap;

/// Per-validator, per-period unavailability counters.
#[derive(Debug, Default)]
pub struct SlashTracker {
    /// (validator, period) -> missed blocks
    counters: HashMap<(Address, PeriodNumber), u32>,
    /// Highest period reset so far
    current_period: PeriodNumber,
}

impl SlashTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the counter and return the post-increment value.
    pub fn record_unavailability(&mut self, validator: Address, period: PeriodNumber) -> u32 {
        let count = self.counters.entry((validator, period)).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    /// Counter value for `(validator, period)`, zero if never reported.
    pub fn count_of(&self, validator: &Address, period: PeriodNumber) -> u32 {
        self.counters
            .get(&(*validator, period))
            .copied()
            .unwrap_or(0)
    }

    /// Undo the last increment. Used when a penalty triggered by it fails.
    pub fn revert_last(&mut self, validator: Address, period: PeriodNumber) {
        if let Some(count) = self.counters.get_mut(&(validator, period)) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.counters.remove(&(validator, period));
            }
        }
    }

    /// Drop counters of every period before `period`.
    ///
    /// Returns `true` if `period` is newer than the last reset.
    pub fn reset_period(&mut self, period: PeriodNumber) -> bool {
        if period <= self.current_period {
            return false;
        }
        self.current_period = period;
        self.counters.retain(|(_, p), _| *p >= period);
        true
    }

    /// Last period passed to `reset_period`.
    pub fn current_period(&self) -> PeriodNumber {
        self.current_period
    }

    /// Number of live counters.
    pub fn tracked(&self) -> usize {
        self.counters.len()
    }
}
