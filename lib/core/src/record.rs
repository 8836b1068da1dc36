//! Breed records and the population builder
//!
//! Rows arrive from the data collaborator as [`RawBreedRecord`]s with loosely
//! typed values. [`build_population`] turns them into a [`FeaturePopulation`]:
//! deduplicated by name, coerced to numbers, restricted to complete records.

use crate::feature::{Feature, FEATURE_COUNT};
use crate::vector::FeatureVector;
use crate::{Error, Result};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// One row of the input dataset, before validation
///
/// Feature values are kept as raw JSON so that numbers encoded as strings
/// can be coerced and genuinely bad values reported.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawBreedRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub popularity: Option<Value>,
    #[serde(default)]
    pub trainability_value: Option<Value>,
    #[serde(default)]
    pub demeanor_value: Option<Value>,
    #[serde(default)]
    pub energy_level_value: Option<Value>,
    #[serde(default)]
    pub min_height: Option<Value>,
    #[serde(default)]
    pub max_height: Option<Value>,
}

impl RawBreedRecord {
    /// Create a row with a name and no feature values
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Create a complete numeric row in canonical feature order
    pub fn from_values(name: impl Into<String>, values: [f64; FEATURE_COUNT]) -> Self {
        let mut raw = Self::new(name);
        for feature in Feature::ALL {
            raw = raw.with(feature, values[feature.index()]);
        }
        raw
    }

    /// Set one raw feature value
    #[must_use]
    pub fn with(mut self, feature: Feature, value: impl Into<Value>) -> Self {
        *self.slot_mut(feature) = Some(value.into());
        self
    }

    pub fn raw(&self, feature: Feature) -> Option<&Value> {
        match feature {
            Feature::Popularity => self.popularity.as_ref(),
            Feature::Trainability => self.trainability_value.as_ref(),
            Feature::Demeanor => self.demeanor_value.as_ref(),
            Feature::EnergyLevel => self.energy_level_value.as_ref(),
            Feature::MinHeight => self.min_height.as_ref(),
            Feature::MaxHeight => self.max_height.as_ref(),
        }
    }

    fn slot_mut(&mut self, feature: Feature) -> &mut Option<Value> {
        match feature {
            Feature::Popularity => &mut self.popularity,
            Feature::Trainability => &mut self.trainability_value,
            Feature::Demeanor => &mut self.demeanor_value,
            Feature::EnergyLevel => &mut self.energy_level_value,
            Feature::MinHeight => &mut self.min_height,
            Feature::MaxHeight => &mut self.max_height,
        }
    }
}

/// A validated breed with all six features present and finite
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BreedRecord {
    pub name: String,
    pub popularity: f64,
    pub trainability: f64,
    pub demeanor: f64,
    pub energy_level: f64,
    pub min_height: f64,
    pub max_height: f64,
}

impl BreedRecord {
    pub fn new(name: impl Into<String>, features: FeatureVector) -> Self {
        let [popularity, trainability, demeanor, energy_level, min_height, max_height] =
            features.to_array();
        Self {
            name: name.into(),
            popularity,
            trainability,
            demeanor,
            energy_level,
            min_height,
            max_height,
        }
    }

    /// Feature vector in canonical order
    pub fn features(&self) -> FeatureVector {
        FeatureVector::new([
            self.popularity,
            self.trainability,
            self.demeanor,
            self.energy_level,
            self.min_height,
            self.max_height,
        ])
    }
}

/// Options for [`build_population_with`]
#[derive(Debug, Clone, Copy, Default)]
pub struct PopulationOptions {
    /// Exclude rows whose values fall outside the source data's documented
    /// ranges: `max_height < min_height`, a 0-1 trait outside `[0, 1]`, or
    /// negative popularity.
    pub validate_ranges: bool,
}

/// Ordered, deduplicated, complete breed records
///
/// Position in the population is the key used by the neighbor index.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct FeaturePopulation {
    records: Vec<BreedRecord>,
}

impl FeaturePopulation {
    /// Wrap already validated records
    ///
    /// Later records sharing a name with an earlier one are dropped; any
    /// non-finite value is a data error.
    pub fn from_records(records: Vec<BreedRecord>) -> Result<Self> {
        let mut seen = AHashSet::with_capacity(records.len());
        let mut kept = Vec::with_capacity(records.len());
        for record in records {
            if let Some((feature, value)) = record.features().iter().find(|(_, v)| !v.is_finite()) {
                return Err(Error::data(
                    &record.name,
                    format!("{} is not a finite number ({})", feature, value),
                ));
            }
            if seen.insert(record.name.clone()) {
                kept.push(record);
            }
        }
        Ok(Self { records: kept })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&BreedRecord> {
        self.records.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BreedRecord> {
        self.records.iter()
    }

    /// Raw feature vectors in population order
    pub fn feature_vectors(&self) -> Vec<FeatureVector> {
        self.records.iter().map(BreedRecord::features).collect()
    }
}

/// Build a population with default options
pub fn build_population(records: Vec<RawBreedRecord>) -> Result<FeaturePopulation> {
    build_population_with(records, &PopulationOptions::default())
}

/// Build a population from raw rows
///
/// Deduplicates by exact name (first occurrence wins, and fixes the
/// population order), coerces every present value to a number, and drops
/// rows missing any feature. A value that cannot be coerced fails the build.
pub fn build_population_with(
    records: Vec<RawBreedRecord>,
    options: &PopulationOptions,
) -> Result<FeaturePopulation> {
    let total = records.len();
    let mut seen = AHashSet::with_capacity(total);
    let mut complete = Vec::with_capacity(total);

    for (row, raw) in records.into_iter().enumerate() {
        let name = raw.name.trim();
        if name.is_empty() {
            return Err(Error::data(
                format!("<row {}>", row),
                "breed name is empty",
            ));
        }
        if !seen.insert(raw.name.clone()) {
            debug!(breed = %raw.name, row, "skipping duplicate breed");
            continue;
        }

        let mut values = [0.0; FEATURE_COUNT];
        let mut missing = Vec::new();
        for feature in Feature::ALL {
            match coerce(&raw.name, feature, raw.raw(feature))? {
                Some(value) => values[feature.index()] = value,
                None => missing.push(feature.name()),
            }
        }
        if !missing.is_empty() {
            debug!(breed = %raw.name, missing = ?missing, "skipping incomplete breed");
            continue;
        }

        let record = BreedRecord::new(raw.name, FeatureVector::new(values));
        if options.validate_ranges {
            if let Some(reason) = range_violation(&record) {
                debug!(breed = %record.name, %reason, "skipping out-of-range breed");
                continue;
            }
        }
        complete.push(record);
    }

    debug!(rows = total, kept = complete.len(), "built breed population");
    Ok(FeaturePopulation { records: complete })
}

/// Coerce one raw value; `Ok(None)` means the value is missing
fn coerce(breed: &str, feature: Feature, raw: Option<&Value>) -> Result<Option<f64>> {
    let invalid = |shown: &dyn std::fmt::Display| {
        Error::data(
            breed,
            format!("{} value {} is not numeric", feature.column(), shown),
        )
    };

    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(invalid(n)),
        },
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("na") {
                return Ok(None);
            }
            match trimmed.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(Some(v)),
                _ => Err(invalid(&format!("\"{}\"", s))),
            }
        }
        Some(other) => Err(invalid(other)),
    }
}

fn range_violation(record: &BreedRecord) -> Option<String> {
    if record.max_height < record.min_height {
        return Some(format!(
            "max_height {} is below min_height {}",
            record.max_height, record.min_height
        ));
    }
    if record.popularity < 0.0 {
        return Some(format!("popularity {} is negative", record.popularity));
    }
    record
        .features()
        .iter()
        .find(|(f, v)| f.is_unit_interval() && !(0.0..=1.0).contains(v))
        .map(|(f, v)| format!("{} {} is outside [0, 1]", f, v))
}
