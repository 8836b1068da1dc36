use crate::feature::Feature;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid data for breed '{breed}': {reason}")]
    Data { breed: String, reason: String },

    #[error("Feature '{feature}' has zero variance (every breed has value {value}); cannot normalize")]
    DegenerateFeature { feature: Feature, value: f64 },

    #[error("Population has {size} complete breed(s); at least 2 are needed to normalize")]
    PopulationTooSmall { size: usize },

    #[error("Breed not found: {0}")]
    BreedNotFound(String),

    #[error("Invalid preference for '{feature}': {reason}")]
    InvalidPreference { feature: Feature, reason: String },

    #[error("Invalid k: {k} (must be between 1 and {max})")]
    InvalidK { k: usize, max: usize },

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },
}

/// Coarse classification of [`Error`] for callers that map failures to
/// user-facing messages or exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Data,
    DegenerateFeature,
    BreedNotFound,
    InvalidPreference,
    InvalidK,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Data { .. } | Error::InvalidDimension { .. } => ErrorKind::Data,
            Error::DegenerateFeature { .. } | Error::PopulationTooSmall { .. } => {
                ErrorKind::DegenerateFeature
            }
            Error::BreedNotFound(_) => ErrorKind::BreedNotFound,
            Error::InvalidPreference { .. } => ErrorKind::InvalidPreference,
            Error::InvalidK { .. } => ErrorKind::InvalidK,
        }
    }

    pub(crate) fn data(breed: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Data {
            breed: breed.into(),
            reason: reason.into(),
        }
    }
}
