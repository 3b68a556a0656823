//! Property-based tests for the validator lifecycle.
//!
//! # Unavailability Counters
//! - Counter never exceeds the felony threshold within a period
//! - Misdemeanor and felony each fire at most once per validator per period
//!
//! # Jail Registry
//! - Jail windows never shrink
//!
//! # Active Set Selection
//! - Size capped at `max_validator_number`
//! - Every member is unjailed and meets the minimum balance
//! - Members ordered by non-increasing collateral, without duplicates

use proptest::prelude::*;
use qc_18_validator_lifecycle::domain::{CandidateStake, JailRegistry, ValidatorSetRotator};
use qc_18_validator_lifecycle::{
    Address, Amount, BlockNumber, EpochConfig, InMemoryEventBus, InMemoryStakingLedger,
    LedgerPolicy, LifecycleConfig, LifecycleDependencies, PenaltyConfig, SlashTier,
    StakingLedger, ValidatorLifecycleApi, ValidatorLifecycleService,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

const REPORTER: Address = [0xAB; 20];

fn validator(id: u8) -> Address {
    [id; 20]
}

fn penalty_config(max_validators: usize) -> PenaltyConfig {
    PenaltyConfig {
        misdemeanor_threshold: 3,
        felony_threshold: 7,
        felony_jail_blocks: 500,
        slash_felony_amount: 5,
        slash_double_sign_amount: 50,
        min_validator_balance: 100,
        max_validator_number: max_validators,
        max_validator_candidate: 64,
    }
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

/// Sequence of missed-block reports, as validator ids in 1..=4.
fn arb_reports() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(1u8..=4, 0..60)
}

fn arb_candidates() -> impl Strategy<Value = Vec<(u8, Option<Amount>)>> {
    prop::collection::vec(
        (any::<u8>(), prop::option::weighted(0.9, 0u128..400)),
        0..40,
    )
    .prop_map(|raw| {
        let mut seen = HashSet::new();
        raw.into_iter().filter(|(id, _)| seen.insert(*id)).collect()
    })
}

fn arb_jails() -> impl Strategy<Value = Vec<(u8, BlockNumber)>> {
    prop::collection::vec((0u8..8, 0u64..10_000), 0..50)
}

// ============================================================================
// Unavailability Counters
// ============================================================================

proptest! {
    #[test]
    fn counter_bounded_and_penalties_fire_once(reports in arb_reports()) {
        let config = LifecycleConfig {
            penalty: penalty_config(21),
            epoch: EpochConfig {
                number_of_blocks_in_epoch: 1_000,
                number_of_epochs_in_period: 10,
            },
        };
        let bus = Arc::new(InMemoryEventBus::new());
        let ledger = Arc::new(InMemoryStakingLedger::new(
            LedgerPolicy::from(&config.penalty),
            bus.clone(),
        ));
        for id in 1..=4 {
            ledger.propose_validator(validator(id), 200).unwrap();
        }
        let service = ValidatorLifecycleService::new(LifecycleDependencies {
            event_bus: bus,
            ledger,
            config,
            reporter: REPORTER,
        })
        .unwrap();

        let mut fired: HashMap<(u8, SlashTier), u32> = HashMap::new();
        for (i, id) in reports.iter().enumerate() {
            let report = service
                .record_unavailability(REPORTER, validator(*id), i as u64 + 1)
                .unwrap();
            prop_assert!(report.count <= 7);
            if report.tier() != SlashTier::None {
                *fired.entry((*id, report.tier())).or_insert(0) += 1;
            }
        }

        for id in 1..=4u8 {
            let count = service.unavailability_count(&validator(id), 0);
            let reported = reports.iter().filter(|r| **r == id).count() as u32;
            prop_assert_eq!(count, reported.min(7));
            prop_assert!(fired.get(&(id, SlashTier::Misdemeanor)).copied().unwrap_or(0) <= 1);
            prop_assert_eq!(
                fired.get(&(id, SlashTier::Felony)).copied().unwrap_or(0),
                u32::from(reported >= 7)
            );
        }
    }
}

// ============================================================================
// Jail Registry
// ============================================================================

proptest! {
    #[test]
    fn jail_windows_never_shrink(jails in arb_jails()) {
        let mut registry = JailRegistry::new();
        let mut expected: HashMap<u8, BlockNumber> = HashMap::new();

        for (id, until) in jails {
            let before = registry.jail_until_of(&validator(id));
            let extended = registry.jail(validator(id), until);
            let after = registry.jail_until_of(&validator(id));

            prop_assert!(after >= before);
            prop_assert_eq!(extended, until > before);
            let slot = expected.entry(id).or_insert(0);
            *slot = (*slot).max(until);
        }

        for (id, until) in expected {
            prop_assert_eq!(registry.jail_until_of(&validator(id)), until);
        }
    }
}

// ============================================================================
// Active Set Selection
// ============================================================================

proptest! {
    #[test]
    fn selection_respects_eligibility_and_order(
        candidates in arb_candidates(),
        jails in arb_jails(),
        max in 1usize..10,
        at_block in 0u64..10_000,
    ) {
        let rotator = ValidatorSetRotator::new(&penalty_config(max));
        let mut jail = JailRegistry::new();
        for (id, until) in jails {
            jail.jail(validator(id), until);
        }
        let stakes: Vec<CandidateStake> = candidates
            .iter()
            .map(|(id, collateral)| CandidateStake {
                address: validator(*id),
                collateral: *collateral,
            })
            .collect();
        let collateral: HashMap<Address, Option<Amount>> =
            stakes.iter().map(|c| (c.address, c.collateral)).collect();

        let selected = rotator.select(&stakes, &jail, at_block);

        prop_assert!(selected.len() <= max);
        let unique: HashSet<_> = selected.iter().collect();
        prop_assert_eq!(unique.len(), selected.len());

        let mut previous = Amount::MAX;
        for address in &selected {
            prop_assert!(!jail.is_jailed(address, at_block));
            let amount = collateral[address].unwrap_or(0);
            prop_assert!(amount >= 100);
            prop_assert!(amount <= previous);
            previous = amount;
        }

        let eligible = stakes
            .iter()
            .filter(|c| rotator.is_eligible(c, &jail, at_block))
            .count();
        prop_assert_eq!(selected.len(), eligible.min(max));
    }
}
