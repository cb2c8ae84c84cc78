//! Property-based tests for simulation and analysis
//!
//! Core properties tested:
//! 1. Simulated outcome sets always hold n_users records per group
//! 2. Analysis outputs stay inside their mathematical ranges
//! 3. Analysis is a pure function of the counts
//! 4. p-value never increases as treatment pulls ahead of control
//! 5. Recommendation agrees with p-value and effect direction

use proptest::prelude::*;
use splitcheck::analysis::{analyze, analyze_counts, Recommendation};
use splitcheck::simulation::{simulate_seeded, Group};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_simulation_group_sizes(
        n_users in 1u64..2000,
        cr_control in 0.0f64..=1.0,
        cr_treatment in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let outcomes = simulate_seeded(n_users, cr_control, cr_treatment, seed).unwrap();

        prop_assert_eq!(outcomes.group(Group::Control).len() as u64, n_users);
        prop_assert_eq!(outcomes.group(Group::Treatment).len() as u64, n_users);
        prop_assert!(outcomes.group(Group::Control).iter().all(|r| r.group == Group::Control));
        prop_assert!(outcomes.group(Group::Treatment).iter().all(|r| r.group == Group::Treatment));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_analysis_ranges(
        (n_users, success_control, success_treatment) in (1u64..100_000)
            .prop_flat_map(|n| (Just(n), 0..=n, 0..=n)),
    ) {
        let result = analyze_counts(success_control, success_treatment, n_users).unwrap();

        prop_assert!((0.0..=1.0).contains(&result.control_rate));
        prop_assert!((0.0..=1.0).contains(&result.treatment_rate));
        prop_assert!((0.0..=1.0).contains(&result.p_value), "p = {}", result.p_value);

        for ci in [result.confidence_interval_control, result.confidence_interval_treatment] {
            prop_assert!(0.0 <= ci.lower && ci.lower <= ci.upper && ci.upper <= 1.0);
        }
        prop_assert!(result.confidence_interval_control.contains(result.control_rate));
        prop_assert!(result.confidence_interval_treatment.contains(result.treatment_rate));

        prop_assert_eq!(result.lift.is_none(), success_control == 0);
    }

    #[test]
    fn prop_analysis_deterministic(
        (n_users, success_control, success_treatment) in (1u64..50_000)
            .prop_flat_map(|n| (Just(n), 0..=n, 0..=n)),
    ) {
        let a = analyze_counts(success_control, success_treatment, n_users).unwrap();
        let b = analyze_counts(success_control, success_treatment, n_users).unwrap();
        prop_assert_eq!(a.p_value.to_bits(), b.p_value.to_bits());
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_p_value_monotone_when_treatment_ahead(
        (n_users, success_control, bump) in (2u64..20_000)
            .prop_flat_map(|n| (Just(n), 0..n))
            .prop_flat_map(|(n, c)| (Just(n), Just(c), 0..=(n - c))),
    ) {
        prop_assume!(success_control + bump < n_users);
        let lower = analyze_counts(success_control, success_control + bump, n_users).unwrap();
        let higher = analyze_counts(success_control, success_control + bump + 1, n_users).unwrap();

        prop_assert!(higher.treatment_rate >= lower.treatment_rate);
        prop_assert!(
            higher.p_value <= lower.p_value + 1e-12,
            "p rose from {} to {}",
            lower.p_value,
            higher.p_value
        );
        if let (Some(lo), Some(hi)) = (lower.lift, higher.lift) {
            prop_assert!(hi >= lo);
        }
    }

    #[test]
    fn prop_recommendation_consistent(
        (n_users, success_control, success_treatment) in (1u64..50_000)
            .prop_flat_map(|n| (Just(n), 0..=n, 0..=n)),
    ) {
        let result = analyze_counts(success_control, success_treatment, n_users).unwrap();
        let expected = if result.p_value < 0.05 {
            if success_treatment > success_control {
                Recommendation::RolloutPositive
            } else {
                Recommendation::RolloutNegative
            }
        } else {
            Recommendation::Inconclusive
        };
        prop_assert_eq!(result.recommendation(), expected);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_simulate_then_analyze_never_fails(
        n_users in 1u64..3000,
        cr_control in 0.0f64..=1.0,
        cr_treatment in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let outcomes = simulate_seeded(n_users, cr_control, cr_treatment, seed).unwrap();
        let result = analyze(&outcomes, n_users).unwrap();
        prop_assert_eq!(result.n_users, n_users);
        prop_assert!(result.success_control <= n_users);
        prop_assert!(result.success_treatment <= n_users);
    }
}
