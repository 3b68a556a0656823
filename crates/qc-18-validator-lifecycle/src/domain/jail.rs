//! # Jail Registry
//!
//! Holds "ineligible until block N" markers per validator.
//!
//! Jail windows are monotonic: a new sentence can extend a window but never
//! shorten it, so a validator is never released early.

use crate::domain::{Address, BlockNumber};
use std::collections::HashMap;

/// Validator -> block number until which it is ineligible.
#[derive(Debug, Default)]
pub struct JailRegistry {
    jailed_until: HashMap<Address, BlockNumber>,
}

impl JailRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jail `validator` until `until_block`.
    ///
    /// Sets the window to `max(existing, until_block)`. Returns `false` when
    /// the request would not extend the current window (no-op).
    pub fn jail(&mut self, validator: Address, until_block: BlockNumber) -> bool {
        let current = self.jailed_until.entry(validator).or_insert(0);
        if until_block <= *current {
            return false;
        }
        *current = until_block;
        true
    }

    /// `jailed_until > at_block`.
    pub fn is_jailed(&self, validator: &Address, at_block: BlockNumber) -> bool {
        self.jail_until_of(validator) > at_block
    }

    /// Jail release block, 0 if never jailed.
    pub fn jail_until_of(&self, validator: &Address) -> BlockNumber {
        self.jailed_until.get(validator).copied().unwrap_or(0)
    }

    /// Batch form of [`Self::jail_until_of`], in input order.
    pub fn jail_untils(&self, validators: &[Address]) -> Vec<BlockNumber> {
        validators.iter().map(|v| self.jail_until_of(v)).collect()
    }

    /// Number of validators still jailed at `at_block`.
    pub fn jailed_count(&self, at_block: BlockNumber) -> usize {
        self.jailed_until
            .values()
            .filter(|until| **until > at_block)
            .count()
    }
}
