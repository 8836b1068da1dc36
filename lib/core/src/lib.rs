//! # breedmatch Core
//!
//! Core library for breedmatch.
//!
//! This crate provides the fundamental data structures and algorithms:
//!
//! - [`Feature`] / [`FeatureVector`] - The fixed six-feature breed schema
//! - [`BreedRecord`] / [`FeaturePopulation`] - Validated, deduplicated breed table
//! - [`NormalizationStats`] - Z-score statistics fit on a population
//! - [`NeighborIndex`] - Exact k-nearest-neighbor search under Euclidean distance
//!
//! ## Example
//!
//! ```rust
//! use breedmatch_core::{build_population, NeighborIndex, NormalizationStats, RawBreedRecord};
//!
//! let population = build_population(vec![
//!     RawBreedRecord::from_values("Beagle", [6.0, 0.8, 0.6, 0.8, 13.0, 15.0]),
//!     RawBreedRecord::from_values("Pug", [32.0, 0.6, 0.8, 0.6, 10.0, 13.0]),
//!     RawBreedRecord::from_values("Akita", [47.0, 0.6, 0.4, 0.8, 24.0, 28.0]),
//! ]).unwrap();
//!
//! let stats = NormalizationStats::fit(&population).unwrap();
//! let normalized: Vec<_> = population
//!     .iter()
//!     .map(|record| stats.transform(&record.features()))
//!     .collect();
//! let index = NeighborIndex::build(&normalized);
//!
//! let neighbors = index.query(normalized[0].as_slice(), 2).unwrap();
//! assert_eq!(neighbors[0].index, 0);
//! ```

pub mod error;
pub mod feature;
pub mod vector;
pub mod record;
pub mod normalizer;
pub mod index;

pub use error::{Error, ErrorKind, Result};
pub use feature::{Feature, FEATURE_COUNT};
pub use vector::FeatureVector;
pub use record::{
    build_population, build_population_with, BreedRecord, FeaturePopulation, PopulationOptions,
    RawBreedRecord,
};
pub use normalizer::NormalizationStats;
pub use index::{NeighborIndex, Neighbor};
