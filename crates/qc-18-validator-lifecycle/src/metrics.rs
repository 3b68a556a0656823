//! # Validator Lifecycle Metrics
//!
//! Prometheus metrics for slashing and rotation.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! qc-18-validator-lifecycle = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `lifecycle_unavailability_reports_total` - Counter of accepted missed-block reports
//! - `lifecycle_penalties_total` - Counter of penalties (by tier)
//! - `lifecycle_validators_jailed_total` - Counter of jail sentences
//! - `lifecycle_epoch_wrapups_total` - Counter of wrap-ups
//! - `lifecycle_active_validators` - Size of the current active set

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, IntCounter,
    IntCounterVec, IntGauge,
};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Accepted unavailability reports
    pub static ref UNAVAILABILITY_REPORTS: IntCounter = register_int_counter!(
        "lifecycle_unavailability_reports_total",
        "Total number of accepted unavailability reports"
    )
    .expect("Failed to create UNAVAILABILITY_REPORTS metric");

    /// Penalties applied, labeled by tier
    pub static ref PENALTIES: IntCounterVec = register_int_counter_vec!(
        "lifecycle_penalties_total",
        "Total number of penalties applied",
        &["tier"]
    )
    .expect("Failed to create PENALTIES metric");

    /// Jail sentences
    pub static ref VALIDATORS_JAILED: IntCounter = register_int_counter!(
        "lifecycle_validators_jailed_total",
        "Total number of jail sentences"
    )
    .expect("Failed to create VALIDATORS_JAILED metric");

    /// Epoch wrap-ups
    pub static ref EPOCH_WRAPUPS: IntCounter = register_int_counter!(
        "lifecycle_epoch_wrapups_total",
        "Total number of epoch wrap-ups"
    )
    .expect("Failed to create EPOCH_WRAPUPS metric");

    /// Active set size after the last wrap-up
    pub static ref ACTIVE_VALIDATORS: IntGauge = register_int_gauge!(
        "lifecycle_active_validators",
        "Number of validators in the active set"
    )
    .expect("Failed to create ACTIVE_VALIDATORS metric");
}

/// Record an accepted unavailability report
#[cfg(feature = "metrics")]
pub fn record_unavailability_report() {
    UNAVAILABILITY_REPORTS.inc();
}

/// Record a penalty with its tier label
#[cfg(feature = "metrics")]
pub fn record_penalty(tier: &str) {
    PENALTIES.with_label_values(&[tier]).inc();
}

/// Record a jail sentence
#[cfg(feature = "metrics")]
pub fn record_validator_jailed() {
    VALIDATORS_JAILED.inc();
}

/// Record a wrap-up and the resulting set size
#[cfg(feature = "metrics")]
pub fn record_epoch_wrap_up(active_validators: usize) {
    EPOCH_WRAPUPS.inc();
    ACTIVE_VALIDATORS.set(active_validators as i64);
}

// No-op implementations when metrics feature is disabled
#[cfg(not(feature = "metrics"))]
pub fn record_unavailability_report() {}

#[cfg(not(feature = "metrics"))]
pub fn record_penalty(_tier: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_validator_jailed() {}

#[cfg(not(feature = "metrics"))]
pub fn record_epoch_wrap_up(_active_validators: usize) {}
