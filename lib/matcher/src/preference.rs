//! User trait preferences for by-preference queries

use breedmatch_core::{Error, Feature, FeatureVector, Result, FEATURE_COUNT};
use serde::{Deserialize, Serialize};

/// Desired raw value for each feature
///
/// Values are in the dataset's own units (popularity rank, 0-1 trait
/// scores, inches). Every feature must be set before the preference can
/// be matched.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Preference {
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub trainability: Option<f64>,
    #[serde(default)]
    pub demeanor: Option<f64>,
    #[serde(default)]
    pub energy_level: Option<f64>,
    #[serde(default)]
    pub min_height: Option<f64>,
    #[serde(default)]
    pub max_height: Option<f64>,
}

impl Preference {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from values in canonical feature order
    ///
    /// A short slice leaves the trailing features unset; a long one is a
    /// dimension error.
    pub fn from_values(values: &[f64]) -> Result<Self> {
        if values.len() > FEATURE_COUNT {
            return Err(Error::InvalidDimension {
                expected: FEATURE_COUNT,
                actual: values.len(),
            });
        }
        let mut preference = Self::new();
        for (feature, &value) in Feature::ALL.iter().zip(values) {
            preference = preference.with(*feature, value);
        }
        Ok(preference)
    }

    #[must_use]
    pub fn with(mut self, feature: Feature, value: f64) -> Self {
        *self.slot_mut(feature) = Some(value);
        self
    }

    pub fn get(&self, feature: Feature) -> Option<f64> {
        match feature {
            Feature::Popularity => self.popularity,
            Feature::Trainability => self.trainability,
            Feature::Demeanor => self.demeanor,
            Feature::EnergyLevel => self.energy_level,
            Feature::MinHeight => self.min_height,
            Feature::MaxHeight => self.max_height,
        }
    }

    fn slot_mut(&mut self, feature: Feature) -> &mut Option<f64> {
        match feature {
            Feature::Popularity => &mut self.popularity,
            Feature::Trainability => &mut self.trainability,
            Feature::Demeanor => &mut self.demeanor,
            Feature::EnergyLevel => &mut self.energy_level,
            Feature::MinHeight => &mut self.min_height,
            Feature::MaxHeight => &mut self.max_height,
        }
    }

    /// Raw query vector, or the first feature that is unset or not finite
    pub fn to_vector(&self) -> Result<FeatureVector> {
        let mut values = [0.0; FEATURE_COUNT];
        for feature in Feature::ALL {
            let value = self.get(feature).ok_or_else(|| Error::InvalidPreference {
                feature,
                reason: "value is missing".to_string(),
            })?;
            if !value.is_finite() {
                return Err(Error::InvalidPreference {
                    feature,
                    reason: format!("{} is not a finite number", value),
                });
            }
            values[feature.index()] = value;
        }
        Ok(FeatureVector::new(values))
    }
}

impl From<FeatureVector> for Preference {
    fn from(vector: FeatureVector) -> Self {
        let mut preference = Self::new();
        for (feature, value) in vector.iter() {
            preference = preference.with(feature, value);
        }
        preference
    }
}
