//! # breedmatch Matcher
//!
//! Breed matching sessions built on `breedmatch-core`.
//!
//! ## Features
//!
//! - **By-example queries**: breeds most similar to a named breed, excluding itself
//! - **By-preference queries**: breeds closest to a set of desired trait values
//! - **Explainability**: per-feature breakdown of every match distance
//! - **Reloadable sessions**: atomic swap of the population/stats/index triple
//!
//! ## Example
//!
//! ```rust
//! use breedmatch_matcher::{BreedMatcher, Preference};
//! use breedmatch_core::RawBreedRecord;
//!
//! let matcher = BreedMatcher::new(vec![
//!     RawBreedRecord::from_values("Beagle", [6.0, 0.8, 0.6, 0.8, 13.0, 15.0]),
//!     RawBreedRecord::from_values("Pug", [32.0, 0.6, 0.8, 0.6, 10.0, 13.0]),
//!     RawBreedRecord::from_values("Akita", [47.0, 0.6, 0.4, 0.8, 24.0, 28.0]),
//! ]).unwrap();
//!
//! let similar = matcher.match_by_example("Beagle", 2).unwrap();
//! assert_eq!(similar.len(), 2);
//!
//! let preference = Preference::from_values(&[20.0, 0.7, 0.7, 0.7, 12.0, 15.0]).unwrap();
//! let best = matcher.match_by_preference(&preference, 1).unwrap();
//! assert_eq!(best[0].rank, 1);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Population  │────>│    Stats    │────>│    Index    │
//! │  (records)  │     │ (mean, std) │     │ (k-NN scan) │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!       │                    │                   │
//!       └────────────────────┼───────────────────┘
//!                     ┌─────────────┐
//!                     │ BreedMatcher│
//!                     └─────────────┘
//!                            │
//!                     ┌─────────────┐
//!                     │   Explain   │
//!                     └─────────────┘
//! ```

pub mod preference;
pub mod matcher;
pub mod explain;
pub mod session;

// Re-export main types for convenience
pub use preference::Preference;
pub use matcher::{BreedMatch, BreedMatcher};
pub use explain::{FeatureContribution, MatchExplanation, MatchSummary};
pub use session::MatcherHandle;
