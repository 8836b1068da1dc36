//! The fixed feature schema shared by breed records, query vectors and
//! normalization statistics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of features in every breed feature vector
pub const FEATURE_COUNT: usize = 6;

/// One column of the breed feature table
///
/// Declaration order is the canonical vector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Popularity,
    Trainability,
    Demeanor,
    EnergyLevel,
    MinHeight,
    MaxHeight,
}

impl Feature {
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Popularity,
        Feature::Trainability,
        Feature::Demeanor,
        Feature::EnergyLevel,
        Feature::MinHeight,
        Feature::MaxHeight,
    ];

    /// Position of this feature inside a feature vector
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Feature::Popularity => "popularity",
            Feature::Trainability => "trainability",
            Feature::Demeanor => "demeanor",
            Feature::EnergyLevel => "energy_level",
            Feature::MinHeight => "min_height",
            Feature::MaxHeight => "max_height",
        }
    }

    /// Column name used by the input dataset for this feature
    pub fn column(self) -> &'static str {
        match self {
            Feature::Popularity => "popularity",
            Feature::Trainability => "trainability_value",
            Feature::Demeanor => "demeanor_value",
            Feature::EnergyLevel => "energy_level_value",
            Feature::MinHeight => "min_height",
            Feature::MaxHeight => "max_height",
        }
    }

    /// Whether the source data scores this trait on a 0-1 scale
    pub fn is_unit_interval(self) -> bool {
        matches!(
            self,
            Feature::Trainability | Feature::Demeanor | Feature::EnergyLevel
        )
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
