//! Property-based tests using proptest.
//!
//! These tests verify the ranking and normalization invariants of the
//! matcher over randomly generated breed tables.

use breedmatch::prelude::*;
use proptest::prelude::*;
use std::collections::HashSet;

// Strategy for one breed's raw feature values
fn values_strategy() -> impl Strategy<Value = [f64; 6]> {
    (
        0.0f64..200.0,
        0.0f64..1.0,
        0.0f64..1.0,
        0.0f64..1.0,
        5.0f64..25.0,
        0.0f64..10.0,
    )
        .prop_map(|(pop, train, dem, energy, min_h, extra)| {
            [pop, train, dem, energy, min_h, min_h + extra]
        })
}

// Strategy for a matcher over 3..40 uniquely named breeds
fn matcher_strategy() -> impl Strategy<Value = BreedMatcher> {
    proptest::collection::vec(values_strategy(), 3..40).prop_filter_map(
        "degenerate population",
        |rows| {
            let records = rows
                .into_iter()
                .enumerate()
                .map(|(i, values)| RawBreedRecord::from_values(format!("breed-{i}"), values))
                .collect();
            BreedMatcher::new(records).ok()
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn fit_then_transform_reproduces_index(matcher in matcher_strategy()) {
        let expected: Vec<FeatureVector> = matcher
            .population()
            .iter()
            .map(|r| matcher.stats().transform(&r.features()))
            .collect();
        prop_assert_eq!(matcher.normalized_matrix(), Some(expected));
    }

    #[test]
    fn by_example_excludes_self_and_is_sorted(
        matcher in matcher_strategy(),
        pick in any::<prop::sample::Index>(),
        k_pick in any::<prop::sample::Index>(),
    ) {
        let n = matcher.population_size();
        let breed = matcher.population().get(pick.index(n)).unwrap().name.clone();
        let k = 1 + k_pick.index(n - 1);

        let matches = matcher.match_by_example(&breed, k).unwrap();
        prop_assert_eq!(matches.len(), k);
        prop_assert!(matches.iter().all(|m| m.breed.name != breed));
        prop_assert!(matches.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn by_example_with_max_k_returns_every_other_breed(
        matcher in matcher_strategy(),
        pick in any::<prop::sample::Index>(),
    ) {
        let n = matcher.population_size();
        let breed = matcher.population().get(pick.index(n)).unwrap().name.clone();

        let matches = matcher.match_by_example(&breed, n - 1).unwrap();
        let names: HashSet<&str> = matches.iter().map(|m| m.breed.name.as_str()).collect();
        prop_assert_eq!(names.len(), n - 1);
        prop_assert!(!names.contains(breed.as_str()));
    }

    #[test]
    fn by_preference_is_deterministic_and_sorted(
        matcher in matcher_strategy(),
        values in values_strategy(),
        k_pick in any::<prop::sample::Index>(),
    ) {
        let n = matcher.population_size();
        let k = 1 + k_pick.index(n);
        let preference = Preference::from_values(&values).unwrap();

        let first = matcher.match_by_preference(&preference, k).unwrap();
        let second = matcher.match_by_preference(&preference, k).unwrap();
        prop_assert_eq!(first.len(), k);
        prop_assert!(first.windows(2).all(|w| w[0].distance <= w[1].distance));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn by_preference_rejects_k_above_population(
        matcher in matcher_strategy(),
        values in values_strategy(),
        extra in 1usize..10,
    ) {
        let preference = Preference::from_values(&values).unwrap();
        let k = matcher.population_size() + extra;
        let err = matcher.match_by_preference(&preference, k).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::InvalidK);
    }

    #[test]
    fn constant_feature_is_degenerate(
        rows in proptest::collection::vec(values_strategy(), 2..20),
        constant in 0.0f64..1.0,
    ) {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(i, values)| {
                RawBreedRecord::from_values(format!("breed-{i}"), values)
                    .with(Feature::Demeanor, constant)
            })
            .collect();

        match BreedMatcher::new(records) {
            Err(Error::DegenerateFeature { feature, .. }) => {
                // An earlier feature can also be constant by chance
                prop_assert!(feature.index() <= Feature::Demeanor.index());
            }
            other => prop_assert!(false, "expected degenerate feature, got {:?}", other.err()),
        }
    }
}
