//! Dataset I/O for breedmatch
//!
//! Loads raw breed rows for the matcher and writes query output. Nothing
//! here validates or cleans rows; that happens in
//! [`breedmatch_core::build_population`].

pub mod error;
pub mod dataset;
pub mod export;

pub use error::{Result, StorageError};
pub use dataset::{load_records, parse_json, parse_json_lines, DatasetFormat};
pub use export::export_json;
