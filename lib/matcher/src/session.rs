//! Shared handle over the current matching session
//!
//! Readers take an `Arc` snapshot and query it without holding the lock.
//! Reloads build a complete new [`BreedMatcher`] before swapping it in, so
//! no reader ever sees a population paired with another snapshot's stats.

use crate::matcher::BreedMatcher;
use breedmatch_core::{PopulationOptions, RawBreedRecord, Result};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub struct MatcherHandle {
    current: RwLock<Arc<BreedMatcher>>,
    generation: AtomicU64,
    options: PopulationOptions,
}

impl MatcherHandle {
    pub fn new(matcher: BreedMatcher) -> Self {
        Self::with_options(matcher, PopulationOptions::default())
    }

    /// Wrap a session; `options` are used for later reloads
    pub fn with_options(matcher: BreedMatcher, options: PopulationOptions) -> Self {
        Self {
            current: RwLock::new(Arc::new(matcher)),
            generation: AtomicU64::new(0),
            options,
        }
    }

    /// The session current at the time of the call
    pub fn snapshot(&self) -> Arc<BreedMatcher> {
        self.current.read().clone()
    }

    /// Number of successful reloads
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Rebuild from new rows and swap the session in
    ///
    /// On error the current session stays in place.
    pub fn reload(&self, records: Vec<RawBreedRecord>) -> Result<Arc<BreedMatcher>> {
        let rebuilt = match BreedMatcher::with_options(records, &self.options) {
            Ok(matcher) => Arc::new(matcher),
            Err(e) => {
                warn!(error = %e, "reload failed; keeping current session");
                return Err(e);
            }
        };

        let previous = std::mem::replace(&mut *self.current.write(), rebuilt.clone());
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        info!(
            generation,
            breeds = rebuilt.population_size(),
            previous_breeds = previous.population_size(),
            "swapped breed matcher"
        );
        Ok(rebuilt)
    }
}
