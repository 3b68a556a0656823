//! # qc-18-validator-lifecycle
//!
//! Validator lifecycle subsystem for Quantum-Chain.
//!
//! ## Architecture
//!
//! Tracks validator liveness per period, escalates missed blocks into
//! penalties and recomputes the active validator set at every epoch
//! boundary.
//!
//! ```text
//! Block Production ──record_unavailability──→ [Lifecycle (18)] ──slash──→ [Staking Ledger]
//!                  ──wrap_up_epoch─────────→        │
//!                                                   ↓
//!                                              [Event Bus]
//!                      UnavailabilitySlashed / ValidatorPunished / ValidatorSetUpdated
//! ```
//!
//! ### Penalty Escalation
//!
//! - `count == misdemeanor_threshold`: notice only
//! - `count == felony_threshold`: jail for `felony_jail_blocks` and slash
//!   `slash_felony_amount`
//! - verified double-sign evidence: jail and slash `slash_double_sign_amount`
//!
//! Counters reset when a wrap-up opens a new period. Jail windows only
//! ever grow.
//!
//! ### Active Set Selection
//!
//! Unjailed candidates with collateral at or above `min_validator_balance`,
//! ranked by collateral (ties keep proposal order), capped at
//! `max_validator_number`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use qc_18_validator_lifecycle::{
//!     InMemoryEventBus, InMemoryStakingLedger, LedgerPolicy, LifecycleConfig,
//!     LifecycleDependencies, ValidatorLifecycleApi, ValidatorLifecycleService,
//! };
//!
//! let config = LifecycleConfig::default();
//! let bus = Arc::new(InMemoryEventBus::new());
//! let ledger = Arc::new(InMemoryStakingLedger::new((&config.penalty).into(), bus.clone()));
//!
//! let service = ValidatorLifecycleService::new(LifecycleDependencies {
//!     event_bus: bus,
//!     ledger,
//!     config,
//!     reporter,
//! })?;
//!
//! service.record_unavailability(reporter, missed_proposer, block)?;
//! service.wrap_up_epoch(reporter, last_block_of_epoch)?;
//! ```
//!
//! ## Security
//!
//! - State-changing calls are accepted only from the configured reporter
//! - At most one unavailability report per block
//! - Double-sign evidence is punished once per (validator, height)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod events;
pub mod metrics;
pub mod ports;
pub mod service;
pub mod state;

// Re-export main types
pub use adapters::{InMemoryEventBus, InMemoryStakingLedger, LedgerPolicy};
pub use config::{EpochConfig, LifecycleConfig, PenaltyConfig};
pub use domain::{
    ActiveSet, Address, Amount, BlockNumber, DoubleSignEvidence, EpochClock, LifecycleError,
    LifecycleResult, Membership, PenaltyDecision, RotationOutcome, SlashTier,
    UnavailabilityReport, ValidatorRecord,
};
pub use events::LifecycleEvent;
pub use ports::{EventBus, StakingLedger, ValidatorLifecycleApi};
pub use service::{LifecycleDependencies, ValidatorLifecycleService};
