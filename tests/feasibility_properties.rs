//! Property-based tests for the feasibility calculator
//!
//! These tests check the planning invariants across arbitrary valid and
//! partial drafts rather than a handful of hand-picked scenarios.

use field_monitoring::domain::validation_constants::test_runs::DEFAULT_PROPTEST_CASES;
use field_monitoring::domain::{
    compute_derived, safe_divide_ceil, Computation, DerivedMetrics, FeasibilityRatio,
    ParameterDraft,
};
use proptest::prelude::*;

pub mod generators {
    use super::*;

    /// Complete drafts in realistic planning ranges
    pub fn complete_draft() -> impl Strategy<Value = ParameterDraft> {
        (1i64..=120, 1i64..=10, 1i64..=5_000, proptest::option::of(0i64..=5_000)).prop_map(
            |(duration, risk, sites, feasible)| {
                let draft = ParameterDraft::new(duration, risk, sites);
                match feasible {
                    Some(feasible) => draft.with_feasible_sites(feasible),
                    None => draft,
                }
            },
        )
    }

    /// Drafts with at least one required field absent; present values may be
    /// anything, including invalid ones
    pub fn incomplete_draft() -> impl Strategy<Value = ParameterDraft> {
        (
            proptest::option::of(any::<i64>()),
            proptest::option::of(any::<i64>()),
            proptest::option::of(any::<i64>()),
            proptest::option::of(any::<i64>()),
        )
            .prop_filter_map(
                "at least one required field must be missing",
                |(duration, risk, sites, feasible)| {
                    let draft = ParameterDraft {
                        operation_duration: duration,
                        risk_level: risk,
                        number_of_sites: sites,
                        feasible_number_of_sites: feasible,
                    };
                    (!draft.missing_fields().is_empty()).then_some(draft)
                },
            )
    }
}

fn derived(draft: ParameterDraft) -> DerivedMetrics {
    match compute_derived(draft) {
        Ok(Computation::Computed { derived, .. }) => derived,
        other => panic!("expected a computed draft, got {other:?}"),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(DEFAULT_PROPTEST_CASES))]

    #[test]
    fn incomplete_drafts_are_returned_unchanged(draft in generators::incomplete_draft()) {
        prop_assert_eq!(compute_derived(draft).unwrap(), Computation::NotComputed(draft));
    }

    #[test]
    fn intervals_never_fall_below_one_month(draft in generators::complete_draft()) {
        let metrics = derived(draft);
        prop_assert!(metrics.minimum_required_interval >= 1);
        prop_assert!(metrics.adjusted_required_interval >= 1);
    }

    #[test]
    fn targeted_sites_cover_every_site_over_the_interval(draft in generators::complete_draft()) {
        let metrics = derived(draft);
        let sites = u64::try_from(draft.number_of_sites.unwrap()).unwrap();
        let covered = u64::from(metrics.targeted_number_of_sites)
            * u64::from(metrics.minimum_required_interval);
        prop_assert!(covered >= sites);
        prop_assert!(metrics.targeted_number_of_sites >= 1);
    }

    #[test]
    fn default_feasibility_matches_target(
        duration in 1i64..=120,
        risk in 1i64..=10,
        sites in 1i64..=5_000,
    ) {
        let metrics = derived(ParameterDraft::new(duration, risk, sites));
        prop_assert_eq!(metrics.feasible_number_of_sites, metrics.targeted_number_of_sites);
        prop_assert_eq!(metrics.feasibility_ratio, FeasibilityRatio::full());
        prop_assert_eq!(metrics.adjusted_required_interval, metrics.minimum_required_interval);
    }

    #[test]
    fn ratio_is_kept_at_two_decimal_places(draft in generators::complete_draft()) {
        let ratio = derived(draft).feasibility_ratio.as_decimal();
        prop_assert_eq!(ratio.scale(), 2);
        prop_assert_eq!(ratio, ratio.round_dp(2));
    }

    #[test]
    fn higher_risk_level_never_lengthens_the_interval(
        duration in 1i64..=120,
        sites in 1i64..=5_000,
        risk in 1i64..=10,
        extra in 0i64..=20,
    ) {
        let base = derived(ParameterDraft::new(duration, risk, sites));
        let raised = derived(ParameterDraft::new(duration, risk + extra, sites));
        prop_assert!(raised.minimum_required_interval <= base.minimum_required_interval);
        prop_assert!(raised.targeted_number_of_sites >= base.targeted_number_of_sites);
    }

    #[test]
    fn less_capacity_never_shortens_the_adjusted_interval(
        duration in 1i64..=120,
        risk in 1i64..=10,
        sites in 1i64..=5_000,
        feasible in 0i64..=5_000,
        extra in 0i64..=500,
    ) {
        let lower = derived(ParameterDraft::new(duration, risk, sites).with_feasible_sites(feasible));
        let higher = derived(
            ParameterDraft::new(duration, risk, sites).with_feasible_sites(feasible + extra),
        );
        // A ratio that rounds to zero floors the interval at one month
        prop_assume!(lower.adjusted_required_frequency > 0);
        prop_assert!(lower.feasibility_ratio <= higher.feasibility_ratio);
        prop_assert!(lower.adjusted_required_interval >= higher.adjusted_required_interval);
    }

    #[test]
    fn computation_is_deterministic(draft in generators::complete_draft()) {
        prop_assert_eq!(compute_derived(draft).unwrap(), compute_derived(draft).unwrap());
    }

    #[test]
    fn safe_divide_ceil_respects_floor(
        numerator in 0u64..=1_000_000,
        denominator in 0u64..=1_000,
        floor in 0u64..=10,
    ) {
        let result = safe_divide_ceil(numerator, denominator, floor);
        prop_assert!(result >= floor);
        if denominator > 0 {
            prop_assert!(result * denominator >= numerator);
        }
    }
}
