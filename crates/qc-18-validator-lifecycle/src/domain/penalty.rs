//! # Penalty Engine - Tier Selection
//!
//! Maps an unavailability counter (or verified double-sign evidence) to a
//! penalty decision. The engine decides; the service applies the decision
//! (jail, slash, notices) as one unit.
//!
//! ## Escalation
//!
//! ```text
//! count <  misdemeanor            -> None
//! count == misdemeanor            -> Misdemeanor (notice only)
//! misdemeanor < count < felony    -> None
//! count == felony                 -> Felony (jail + slash)
//! ```
//!
//! Only the exact crossing fires. Comparing with `>=` would re-punish on
//! every report past the threshold.

use crate::config::PenaltyConfig;
use crate::domain::{
    Address, Amount, BlockNumber, HeaderHash, LifecycleError, LifecycleResult, PeriodNumber,
    SlashTier,
};
use std::collections::HashSet;

/// Evidence that a validator signed two conflicting headers at one height.
///
/// Signature checks happen outside this crate; `verified` carries the
/// verdict of that check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DoubleSignEvidence {
    pub validator: Address,
    pub height: BlockNumber,
    pub header_a: HeaderHash,
    pub header_b: HeaderHash,
    pub verified: bool,
}

impl DoubleSignEvidence {
    /// Evidence is usable only if verified and the headers actually differ.
    pub fn is_valid(&self) -> bool {
        self.verified && self.header_a != self.header_b
    }
}

/// Outcome of evaluating one report or one piece of evidence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PenaltyDecision {
    pub validator: Address,
    pub tier: SlashTier,
    /// Period the counter belongs to (unavailability path only)
    pub period: Option<PeriodNumber>,
    /// Block until which the validator becomes ineligible
    pub jail_until: Option<BlockNumber>,
    /// Stake to slash
    pub slash_amount: Amount,
}

impl PenaltyDecision {
    /// No penalty for this report.
    pub fn none(validator: Address, period: PeriodNumber) -> Self {
        Self {
            validator,
            tier: SlashTier::None,
            period: Some(period),
            jail_until: None,
            slash_amount: 0,
        }
    }

    /// Whether the decision jails and slashes.
    pub fn is_punitive(&self) -> bool {
        self.jail_until.is_some()
    }
}

/// Result of one unavailability report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnavailabilityReport {
    /// Counter value after this report
    pub count: u32,
    pub decision: PenaltyDecision,
}

impl UnavailabilityReport {
    pub fn tier(&self) -> SlashTier {
        self.decision.tier
    }
}

/// Penalty tier selection.
#[derive(Debug)]
pub struct PenaltyEngine {
    config: PenaltyConfig,
    /// (validator, height) pairs already punished for double-signing
    processed_evidence: HashSet<(Address, BlockNumber)>,
}

impl PenaltyEngine {
    pub fn new(config: PenaltyConfig) -> Self {
        Self {
            config,
            processed_evidence: HashSet::new(),
        }
    }

    pub fn config(&self) -> &PenaltyConfig {
        &self.config
    }

    /// Decide the tier for a post-increment counter value.
    pub fn evaluate(
        &self,
        validator: Address,
        count: u32,
        period: PeriodNumber,
        current_block: BlockNumber,
    ) -> PenaltyDecision {
        if count == self.config.felony_threshold {
            PenaltyDecision {
                validator,
                tier: SlashTier::Felony,
                period: Some(period),
                jail_until: Some(current_block.saturating_add(self.config.felony_jail_blocks)),
                slash_amount: self.config.slash_felony_amount,
            }
        } else if count == self.config.misdemeanor_threshold {
            PenaltyDecision {
                tier: SlashTier::Misdemeanor,
                ..PenaltyDecision::none(validator, period)
            }
        } else {
            PenaltyDecision::none(validator, period)
        }
    }

    /// Whether the counter already sits at the felony threshold.
    ///
    /// Further reports in the same period must not escalate again.
    pub fn is_saturated(&self, count: u32) -> bool {
        count >= self.config.felony_threshold
    }

    /// Decide the punishment for double-sign evidence.
    ///
    /// Bypasses the counters entirely. Does not mark the evidence as
    /// processed; call [`Self::commit_evidence`] once the penalty is applied.
    pub fn evaluate_double_sign(
        &self,
        evidence: &DoubleSignEvidence,
        current_block: BlockNumber,
    ) -> LifecycleResult<PenaltyDecision> {
        if !evidence.is_valid() {
            return Err(LifecycleError::InvalidEvidence(evidence.validator));
        }
        if self
            .processed_evidence
            .contains(&(evidence.validator, evidence.height))
        {
            return Err(LifecycleError::EvidenceAlreadyProcessed {
                validator: evidence.validator,
                height: evidence.height,
            });
        }

        Ok(PenaltyDecision {
            validator: evidence.validator,
            tier: SlashTier::DoubleSign,
            period: None,
            jail_until: Some(current_block.saturating_add(self.config.felony_jail_blocks)),
            slash_amount: self.config.slash_double_sign_amount,
        })
    }

    /// Record that the evidence has been acted on.
    pub fn commit_evidence(&mut self, evidence: &DoubleSignEvidence) {
        self.processed_evidence
            .insert((evidence.validator, evidence.height));
    }
}
