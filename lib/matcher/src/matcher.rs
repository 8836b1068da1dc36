//! Breed matching session
//!
//! A [`BreedMatcher`] owns one population snapshot together with the
//! normalization stats and neighbor index fit from it. The three are built
//! together in [`BreedMatcher::new`] and never change afterwards.

use crate::preference::Preference;
use ahash::AHashMap;
use breedmatch_core::{
    build_population_with, BreedRecord, Error, FeaturePopulation, FeatureVector, NeighborIndex,
    NormalizationStats, PopulationOptions, RawBreedRecord, Result,
};
use serde::Serialize;
use tracing::{debug, info};

/// One ranked result of a breed query
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BreedMatch {
    /// 1-based rank, nearest first
    pub rank: usize,
    pub breed: BreedRecord,
    /// Euclidean distance in normalized feature space
    pub distance: f64,
}

/// Immutable population, stats and index triple answering breed queries
#[derive(Debug, Clone)]
pub struct BreedMatcher {
    population: FeaturePopulation,
    stats: NormalizationStats,
    index: NeighborIndex,
    positions: AHashMap<String, usize>,
}

impl BreedMatcher {
    /// Build a session from raw dataset rows with default options
    pub fn new(records: Vec<RawBreedRecord>) -> Result<Self> {
        Self::with_options(records, &PopulationOptions::default())
    }

    pub fn with_options(records: Vec<RawBreedRecord>, options: &PopulationOptions) -> Result<Self> {
        let population = build_population_with(records, options)?;
        Self::from_population(population)
    }

    /// Fit stats and build the index from an existing population
    pub fn from_population(population: FeaturePopulation) -> Result<Self> {
        let stats = NormalizationStats::fit(&population)?;
        let normalized: Vec<FeatureVector> = population
            .iter()
            .map(|record| stats.transform(&record.features()))
            .collect();
        let index = NeighborIndex::build(&normalized);

        let positions = population
            .iter()
            .enumerate()
            .map(|(i, record)| (record.name.clone(), i))
            .collect();

        info!(breeds = population.len(), "breed matcher ready");

        Ok(Self {
            population,
            stats,
            index,
            positions,
        })
    }

    /// Breeds most similar to `breed_name`, excluding the breed itself
    ///
    /// `k` must be in `1..=population_size - 1`.
    pub fn match_by_example(&self, breed_name: &str, k: usize) -> Result<Vec<BreedMatch>> {
        let position = *self
            .positions
            .get(breed_name)
            .ok_or_else(|| Error::BreedNotFound(breed_name.to_string()))?;

        let max = self.population.len() - 1;
        if k < 1 || k > max {
            return Err(Error::InvalidK { k, max });
        }

        let query = self
            .stored_vector(position)
            .ok_or_else(|| Error::BreedNotFound(breed_name.to_string()))?;
        let neighbors = self.index.query(query, k + 1)?;
        debug!(breed = breed_name, k, "by-example query");

        Ok(self.to_matches(
            neighbors
                .into_iter()
                .filter(|n| n.index != position)
                .take(k)
                .map(|n| (n.index, n.distance)),
        ))
    }

    /// Breeds closest to a set of raw trait preferences
    ///
    /// The preference is normalized with this session's fitted stats.
    /// `k` must be in `1..=population_size`.
    pub fn match_by_preference(&self, preference: &Preference, k: usize) -> Result<Vec<BreedMatch>> {
        let raw = preference.to_vector()?;
        let max = self.population.len();
        if k < 1 || k > max {
            return Err(Error::InvalidK { k, max });
        }

        let query = self.stats.transform(&raw);
        let neighbors = self.index.query(query.as_slice(), k)?;
        debug!(k, "by-preference query");

        Ok(self.to_matches(neighbors.into_iter().map(|n| (n.index, n.distance))))
    }

    fn to_matches(&self, hits: impl Iterator<Item = (usize, f64)>) -> Vec<BreedMatch> {
        hits.enumerate()
            .filter_map(|(i, (position, distance))| {
                self.population.get(position).map(|breed| BreedMatch {
                    rank: i + 1,
                    breed: breed.clone(),
                    distance,
                })
            })
            .collect()
    }

    fn stored_vector(&self, position: usize) -> Option<&[f64]> {
        self.index.get(position)
    }

    pub fn stats(&self) -> &NormalizationStats {
        &self.stats
    }

    pub fn population(&self) -> &FeaturePopulation {
        &self.population
    }

    pub fn population_size(&self) -> usize {
        self.population.len()
    }

    pub fn contains(&self, breed_name: &str) -> bool {
        self.positions.contains_key(breed_name)
    }

    pub fn record(&self, breed_name: &str) -> Option<&BreedRecord> {
        self.positions
            .get(breed_name)
            .and_then(|&i| self.population.get(i))
    }

    /// The normalized vector stored in the index for a breed
    pub fn normalized_vector(&self, breed_name: &str) -> Option<FeatureVector> {
        let position = *self.positions.get(breed_name)?;
        FeatureVector::from_slice(self.stored_vector(position)?).ok()
    }

    /// Every stored normalized vector in population order
    ///
    /// `None` if any position has no vector of the expected dimension.
    pub fn normalized_matrix(&self) -> Option<Vec<FeatureVector>> {
        (0..self.population.len())
            .map(|i| FeatureVector::from_slice(self.stored_vector(i)?).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use breedmatch_core::{ErrorKind, Feature};

    /// Two tight pairs far apart: (Alpha, Bravo) and (Charlie, Delta)
    fn toy() -> BreedMatcher {
        BreedMatcher::new(vec![
            RawBreedRecord::from_values("Alpha", [1.0, 0.10, 0.10, 0.10, 10.0, 12.0]),
            RawBreedRecord::from_values("Bravo", [2.0, 0.15, 0.12, 0.12, 11.0, 13.0]),
            RawBreedRecord::from_values("Charlie", [50.0, 0.90, 0.90, 0.85, 25.0, 28.0]),
            RawBreedRecord::from_values("Delta", [55.0, 0.85, 0.95, 0.90, 26.0, 30.0]),
        ])
        .unwrap()
    }

    fn names(matches: &[BreedMatch]) -> Vec<&str> {
        matches.iter().map(|m| m.breed.name.as_str()).collect()
    }

    #[test]
    fn test_match_by_example_finds_nearest_pair() {
        let matcher = toy();
        assert_eq!(names(&matcher.match_by_example("Alpha", 1).unwrap()), vec!["Bravo"]);
        assert_eq!(names(&matcher.match_by_example("Delta", 1).unwrap()), vec!["Charlie"]);
    }

    #[test]
    fn test_match_by_example_excludes_self() {
        let matcher = toy();
        let matches = matcher.match_by_example("Charlie", 3).unwrap();
        assert_eq!(matches.len(), 3);
        assert!(!names(&matches).contains(&"Charlie"));
        assert_eq!(matches[0].rank, 1);
        assert_eq!(matches[2].rank, 3);
        assert!(matches.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_match_by_example_excludes_self_among_duplicates() {
        let matcher = BreedMatcher::new(vec![
            RawBreedRecord::from_values("Twin A", [1.0, 0.5, 0.5, 0.5, 10.0, 12.0]),
            RawBreedRecord::from_values("Twin B", [1.0, 0.5, 0.5, 0.5, 10.0, 12.0]),
            RawBreedRecord::from_values("Twin C", [1.0, 0.5, 0.5, 0.5, 10.0, 12.0]),
            RawBreedRecord::from_values("Other", [9.0, 0.9, 0.1, 0.2, 20.0, 24.0]),
        ])
        .unwrap();

        let matches = matcher.match_by_example("Twin C", 2).unwrap();
        assert_eq!(names(&matches), vec!["Twin A", "Twin B"]);
        assert!(matches.iter().all(|m| m.distance == 0.0));
    }

    #[test]
    fn test_match_by_example_k_bounds() {
        let matcher = toy();
        assert_eq!(matcher.match_by_example("Alpha", 3).unwrap().len(), 3);
        assert!(matches!(
            matcher.match_by_example("Alpha", 4),
            Err(Error::InvalidK { k: 4, max: 3 })
        ));
        assert!(matches!(
            matcher.match_by_example("Alpha", 0),
            Err(Error::InvalidK { k: 0, max: 3 })
        ));
    }

    #[test]
    fn test_unknown_breed_is_case_sensitive() {
        let matcher = toy();
        let err = matcher.match_by_example("alpha", 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BreedNotFound);
        assert!(err.to_string().contains("alpha"));
    }

    #[test]
    fn test_match_by_preference_uses_population_stats() {
        let matcher = toy();
        let preference = Preference::from_values(&[52.0, 0.88, 0.92, 0.88, 25.5, 29.0]).unwrap();
        let matches = matcher.match_by_preference(&preference, 2).unwrap();

        let mut top_two = names(&matches);
        top_two.sort_unstable();
        assert_eq!(top_two, vec!["Charlie", "Delta"]);

        let expected = matcher
            .stats()
            .transform(&preference.to_vector().unwrap())
            .l2_distance(&matcher.normalized_vector(&matches[0].breed.name).unwrap());
        assert_eq!(matches[0].distance, expected);
    }

    #[test]
    fn test_match_by_preference_returns_exact_breed_at_zero() {
        let matcher = toy();
        let bravo = matcher.record("Bravo").unwrap().features();
        let matches = matcher.match_by_preference(&Preference::from(bravo), 1).unwrap();
        assert_eq!(names(&matches), vec!["Bravo"]);
        assert!(matches[0].distance.abs() < 1e-12);
    }

    #[test]
    fn test_match_by_preference_k_bounds() {
        let matcher = toy();
        let preference = Preference::from_values(&[1.0, 0.1, 0.1, 0.1, 10.0, 12.0]).unwrap();
        assert_eq!(matcher.match_by_preference(&preference, 4).unwrap().len(), 4);
        assert!(matches!(
            matcher.match_by_preference(&preference, 5),
            Err(Error::InvalidK { k: 5, max: 4 })
        ));
    }

    #[test]
    fn test_match_by_preference_rejects_incomplete_preference() {
        let matcher = toy();
        let preference = Preference::new().with(Feature::Popularity, 3.0);
        let err = matcher.match_by_preference(&preference, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPreference);
        assert!(err.to_string().contains("trainability"));
    }

    #[test]
    fn test_degenerate_population_fails_to_build() {
        let err = BreedMatcher::new(vec![
            RawBreedRecord::from_values("A", [1.0, 0.5, 0.1, 0.1, 10.0, 12.0]),
            RawBreedRecord::from_values("B", [2.0, 0.5, 0.2, 0.3, 11.0, 14.0]),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            Error::DegenerateFeature { feature: Feature::Trainability, .. }
        ));
    }

    #[test]
    fn test_accessors() {
        let matcher = toy();
        assert_eq!(matcher.population_size(), 4);
        assert!(matcher.contains("Delta"));
        assert!(!matcher.contains("Echo"));
        assert_eq!(matcher.stats().samples(), 4);
        assert_eq!(matcher.normalized_matrix().unwrap().len(), 4);
    }

    #[test]
    fn test_missing_index_entry_is_surfaced() {
        let mut matcher = toy();
        let vectors = matcher.normalized_matrix().unwrap();
        matcher.index = NeighborIndex::build(&vectors[..2]);

        assert!(matcher.normalized_matrix().is_none());
        assert!(matcher.normalized_vector("Alpha").is_some());
        assert!(matcher.normalized_vector("Delta").is_none());
        assert!(matches!(
            matcher.match_by_example("Delta", 1),
            Err(Error::BreedNotFound(_))
        ));
    }
}
