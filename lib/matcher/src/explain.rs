//! Explainability for breed matches
//!
//! Breaks a match distance down by feature so a caller can show which
//! traits made two breeds close or far apart.

use crate::matcher::{BreedMatch, BreedMatcher};
use crate::preference::Preference;
use breedmatch_core::{Error, Feature, FeatureVector, NormalizationStats, Result};
use serde::Serialize;

/// How much one feature contributes to a match distance
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeatureContribution {
    pub feature: Feature,
    /// Normalized query value
    pub query: f64,
    /// Normalized value of the matched breed
    pub candidate: f64,
    /// `candidate - query`, in standard deviations
    pub difference: f64,
    /// Share of the squared distance due to this feature, in `[0, 1]`
    pub share: f64,
}

/// A match with its per-feature distance breakdown
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MatchExplanation {
    pub rank: usize,
    pub breed: String,
    pub distance: f64,
    pub contributions: Vec<FeatureContribution>,
}

impl MatchExplanation {
    /// Explain a match against a normalized query vector
    pub fn compute(stats: &NormalizationStats, query: &FeatureVector, m: &BreedMatch) -> Self {
        let candidate = stats.transform(&m.breed.features());
        let diff = &candidate - query;
        let squared_total: f64 = diff.as_slice().iter().map(|d| d * d).sum();

        let contributions = Feature::ALL
            .iter()
            .map(|&feature| {
                let difference = diff[feature];
                let share = if squared_total > 0.0 {
                    difference * difference / squared_total
                } else {
                    0.0
                };
                FeatureContribution {
                    feature,
                    query: query[feature],
                    candidate: candidate[feature],
                    difference,
                    share,
                }
            })
            .collect();

        Self {
            rank: m.rank,
            breed: m.breed.name.clone(),
            distance: m.distance,
            contributions,
        }
    }

    /// Feature with the largest share of the distance, if any is non-zero
    pub fn top_feature(&self) -> Option<Feature> {
        self.contributions
            .iter()
            .filter(|c| c.share > 0.0)
            .max_by(|a, b| a.share.total_cmp(&b.share))
            .map(|c| c.feature)
    }
}

/// Summary statistics for one query's results
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MatchSummary {
    pub results_count: usize,
    pub best_distance: Option<f64>,
    pub mean_distance: Option<f64>,
    /// Feature contributing most to the distance of the best match
    pub top_contributing_feature: Option<Feature>,
}

impl MatchSummary {
    /// Compute a summary from explanations sorted nearest first
    pub fn compute(explanations: &[MatchExplanation]) -> Self {
        if explanations.is_empty() {
            return Self {
                results_count: 0,
                best_distance: None,
                mean_distance: None,
                top_contributing_feature: None,
            };
        }

        let total: f64 = explanations.iter().map(|e| e.distance).sum();
        Self {
            results_count: explanations.len(),
            best_distance: Some(explanations[0].distance),
            mean_distance: Some(total / explanations.len() as f64),
            top_contributing_feature: explanations[0].top_feature(),
        }
    }
}

impl BreedMatcher {
    /// Normalized query vector a by-example query for `breed_name` uses
    pub fn example_query(&self, breed_name: &str) -> Result<FeatureVector> {
        self.normalized_vector(breed_name)
            .ok_or_else(|| Error::BreedNotFound(breed_name.to_string()))
    }

    /// Normalized query vector a by-preference query uses
    pub fn preference_query(&self, preference: &Preference) -> Result<FeatureVector> {
        Ok(self.stats().transform(&preference.to_vector()?))
    }

    /// Explain each match against a normalized query vector
    pub fn explain(&self, query: &FeatureVector, matches: &[BreedMatch]) -> Vec<MatchExplanation> {
        matches
            .iter()
            .map(|m| MatchExplanation::compute(self.stats(), query, m))
            .collect()
    }
}
