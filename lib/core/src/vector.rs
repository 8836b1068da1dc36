use crate::feature::{Feature, FEATURE_COUNT};
use serde::{Deserialize, Serialize};
use std::ops::{Index, Sub};

/// A breed feature vector in canonical [`Feature`] order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct FeatureVector {
    data: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    #[inline]
    #[must_use]
    pub fn new(data: [f64; FEATURE_COUNT]) -> Self {
        Self { data }
    }

    /// Build from a slice, failing if it does not hold exactly
    /// [`FEATURE_COUNT`] values
    pub fn from_slice(data: &[f64]) -> crate::Result<Self> {
        let data: [f64; FEATURE_COUNT] =
            data.try_into().map_err(|_| crate::Error::InvalidDimension {
                expected: FEATURE_COUNT,
                actual: data.len(),
            })?;
        Ok(Self { data })
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        FEATURE_COUNT
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    #[must_use]
    pub fn to_array(self) -> [f64; FEATURE_COUNT] {
        self.data
    }

    #[inline]
    pub fn get(&self, feature: Feature) -> f64 {
        self.data[feature.index()]
    }

    /// Iterate `(feature, value)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL.into_iter().map(move |f| (f, self.data[f.index()]))
    }

    /// Compute L2 (Euclidean) distance
    #[inline]
    pub fn l2_distance(&self, other: &FeatureVector) -> f64 {
        l2_distance(&self.data, &other.data)
    }
}

impl Index<Feature> for FeatureVector {
    type Output = f64;

    fn index(&self, feature: Feature) -> &f64 {
        &self.data[feature.index()]
    }
}

impl Sub for &FeatureVector {
    type Output = FeatureVector;

    fn sub(self, other: &FeatureVector) -> FeatureVector {
        let mut data = [0.0; FEATURE_COUNT];
        for (i, out) in data.iter_mut().enumerate() {
            *out = self.data[i] - other.data[i];
        }
        FeatureVector::new(data)
    }
}

/// Euclidean distance between two equal-length slices
///
/// Uses two accumulators so the sum pipelines; callers check lengths.
#[inline]
pub fn l2_distance(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    let mut sum0 = 0.0;
    let mut sum1 = 0.0;
    let mut chunks_a = a.chunks_exact(2);
    let mut chunks_b = b.chunks_exact(2);
    for (ca, cb) in (&mut chunks_a).zip(&mut chunks_b) {
        let d0 = ca[0] - cb[0];
        let d1 = ca[1] - cb[1];
        sum0 += d0 * d0;
        sum1 += d1 * d1;
    }
    for (x, y) in chunks_a.remainder().iter().zip(chunks_b.remainder()) {
        let d = x - y;
        sum0 += d * d;
    }
    (sum0 + sum1).sqrt()
}
