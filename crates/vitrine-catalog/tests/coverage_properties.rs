use proptest::prelude::*;

use vitrine_catalog::CoverageAnalyzer;
use vitrine_core::domain::{Chrono, FormId, Hook, KbeLayer, SignatureId, SpecimenRecord};

fn any_record() -> impl Strategy<Value = SpecimenRecord> {
    (
        0..SignatureId::ALL.len(),
        0..FormId::ALL.len(),
        0..Chrono::ALL.len(),
        0..KbeLayer::ALL.len(),
        0..Hook::ALL.len(),
        any::<i32>(),
        any::<bool>(),
        proptest::option::of("[a-z]{1,8}"),
    )
        .prop_map(|(sig, form, chrono, kbe, hook, seed, is_seal, mechanism)| {
            SpecimenRecord {
                signature: Some(SignatureId::ALL[sig]),
                form: Some(FormId::ALL[form]),
                chrono: Some(Chrono::ALL[chrono]),
                kbe_layer: Some(KbeLayer::ALL[kbe]),
                hook: Some(Hook::ALL[hook]),
                seed: i64::from(seed),
                is_seal,
                mechanism,
            }
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn partition_is_always_additive(catalog in proptest::collection::vec(any_record(), 0..60)) {
        let report = CoverageAnalyzer::default().analyze(&catalog).unwrap();
        prop_assert_eq!(
            report.with_mechanism + report.without_mechanism,
            report.total_specimens
        );
        prop_assert!(report.coverage_percentage.is_finite());
        prop_assert!((0.0..=100.0).contains(&report.coverage_percentage));
    }

    #[test]
    fn reversal_never_changes_the_report(catalog in proptest::collection::vec(any_record(), 0..40)) {
        let forward = CoverageAnalyzer::default().analyze(&catalog).unwrap();
        let mut reversed = catalog;
        reversed.reverse();
        let backward = CoverageAnalyzer::default().analyze(&reversed).unwrap();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn combination_counts_sum_to_total(catalog in proptest::collection::vec(any_record(), 0..40)) {
        let report = CoverageAnalyzer::default().analyze(&catalog).unwrap();
        let sum: usize = report.top_combinations.iter().map(|c| c.count).sum();
        prop_assert_eq!(sum, report.total_specimens);
    }
}
