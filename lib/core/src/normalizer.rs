//! Z-score normalization fit on a breed population
//!
//! Statistics are fit once per population snapshot and reused for every
//! vector normalized against that snapshot, including synthetic queries.

use crate::feature::{Feature, FEATURE_COUNT};
use crate::record::FeaturePopulation;
use crate::vector::FeatureVector;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Per-feature mean and sample standard deviation
///
/// Every standard deviation is strictly positive; [`NormalizationStats::fit`]
/// refuses to build stats that would divide by zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizationStats {
    mean: FeatureVector,
    std: FeatureVector,
    /// Number of records the stats were fit on
    samples: usize,
}

impl NormalizationStats {
    /// Fit mean and sample standard deviation (ddof = 1) per feature
    pub fn fit(population: &FeaturePopulation) -> Result<Self> {
        let n = population.len();
        if n < 2 {
            return Err(Error::PopulationTooSmall { size: n });
        }

        let vectors = population.feature_vectors();

        // Constant columns are caught by value so mean rounding cannot mask them.
        for feature in Feature::ALL {
            let first = vectors[0].get(feature);
            if vectors.iter().all(|v| v.get(feature) == first) {
                return Err(Error::DegenerateFeature { feature, value: first });
            }
        }

        let mut mean = [0.0; FEATURE_COUNT];
        let mut std = [0.0; FEATURE_COUNT];
        for feature in Feature::ALL {
            let j = feature.index();
            let (m, s) = column_stats(vectors.iter().map(|v| v.as_slice()[j]));
            if !m.is_finite() || !s.is_finite() {
                return Err(overflow(population, feature));
            }
            if s <= 0.0 {
                return Err(Error::DegenerateFeature {
                    feature,
                    value: vectors[0].get(feature),
                });
            }
            mean[j] = m;
            std[j] = s;
        }

        Ok(Self {
            mean: FeatureVector::new(mean),
            std: FeatureVector::new(std),
            samples: n,
        })
    }

    /// Standardize a raw vector: `(v - mean) / std` per feature
    pub fn transform(&self, vector: &FeatureVector) -> FeatureVector {
        let mut out = [0.0; FEATURE_COUNT];
        for (j, o) in out.iter_mut().enumerate() {
            *o = (vector.as_slice()[j] - self.mean.as_slice()[j]) / self.std.as_slice()[j];
        }
        FeatureVector::new(out)
    }

    /// Map a normalized vector back to raw units
    pub fn inverse_transform(&self, vector: &FeatureVector) -> FeatureVector {
        let mut out = [0.0; FEATURE_COUNT];
        for (j, o) in out.iter_mut().enumerate() {
            *o = vector.as_slice()[j] * self.std.as_slice()[j] + self.mean.as_slice()[j];
        }
        FeatureVector::new(out)
    }

    pub fn mean(&self, feature: Feature) -> f64 {
        self.mean.get(feature)
    }

    pub fn std(&self, feature: Feature) -> f64 {
        self.std.get(feature)
    }

    pub fn means(&self) -> &FeatureVector {
        &self.mean
    }

    pub fn stds(&self) -> &FeatureVector {
        &self.std
    }

    pub fn samples(&self) -> usize {
        self.samples
    }
}

/// Mean and sample std of one column
///
/// Values are scaled by the column's largest magnitude first so that
/// finite inputs cannot overflow the sum of squared deviations.
fn column_stats(values: impl Iterator<Item = f64> + Clone) -> (f64, f64) {
    let n = values.clone().count() as f64;
    let scale = values.clone().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if scale == 0.0 {
        return (0.0, 0.0);
    }

    let mean = values.clone().map(|v| v / scale).sum::<f64>() / n;
    let var = values
        .map(|v| {
            let diff = v / scale - mean;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1.0);
    (mean * scale, var.sqrt() * scale)
}

fn overflow(population: &FeaturePopulation, feature: Feature) -> Error {
    let widest = population
        .iter()
        .max_by(|a, b| a.features()[feature].abs().total_cmp(&b.features()[feature].abs()));
    match widest {
        Some(record) => Error::data(
            record.name.clone(),
            format!(
                "{} value {} is too large to normalize",
                feature.column(),
                record.features()[feature]
            ),
        ),
        None => Error::PopulationTooSmall { size: 0 },
    }
}
