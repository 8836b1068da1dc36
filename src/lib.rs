//! # breedmatch
//!
//! Find dog breeds similar to a reference breed, or closest to a set of
//! trait preferences, with z-score normalized exact k-nearest-neighbor
//! search over a small table of breed attributes.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! breedmatch --data breeds.json example Beagle -k 5
//! breedmatch --data breeds.json prefer --popularity 20 --trainability 0.8 \
//!     --demeanor 0.6 --energy-level 0.6 --min-height 12 --max-height 16
//! breedmatch --data breeds.json stats --out stats.json
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use breedmatch::prelude::*;
//!
//! let matcher = BreedMatcher::new(vec![
//!     RawBreedRecord::from_values("Beagle", [6.0, 0.8, 0.6, 0.8, 13.0, 15.0]),
//!     RawBreedRecord::from_values("Pug", [32.0, 0.6, 0.8, 0.6, 10.0, 13.0]),
//!     RawBreedRecord::from_values("Akita", [47.0, 0.6, 0.4, 0.8, 24.0, 28.0]),
//! ]).unwrap();
//!
//! let similar = matcher.match_by_example("Pug", 1).unwrap();
//! assert_eq!(similar.len(), 1);
//! ```
//!
//! ## Crate Structure
//!
//! - `breedmatch-core` - Feature table, normalizer, neighbor index
//! - `breedmatch-matcher` - Matching sessions, explanations, reloadable handle
//! - `breedmatch-storage` - Dataset loading and JSON export

// Re-export core types
pub use breedmatch_core::{
    build_population, build_population_with,
    BreedRecord, FeaturePopulation, PopulationOptions, RawBreedRecord,
    Feature, FeatureVector, FEATURE_COUNT,
    NormalizationStats, NeighborIndex, Neighbor,
    Error, ErrorKind, Result,
};

// Re-export matcher
pub use breedmatch_matcher::{
    BreedMatch, BreedMatcher, MatcherHandle, Preference,
    MatchExplanation, MatchSummary, FeatureContribution,
};

// Re-export storage
pub use breedmatch_storage::{export_json, load_records, StorageError};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        BreedMatch, BreedMatcher, MatcherHandle, Preference,
        RawBreedRecord, BreedRecord, PopulationOptions,
        Feature, FeatureVector, NormalizationStats,
        Error, ErrorKind, Result,
    };
}
