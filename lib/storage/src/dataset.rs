//! Reading raw breed rows from disk
//!
//! Two layouts are supported: a JSON array of row objects (`.json`) and
//! JSON Lines with one row object per line (`.jsonl` / `.ndjson`).

use crate::error::{Result, StorageError};
use breedmatch_core::RawBreedRecord;
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Json,
    JsonLines,
}

impl DatasetFormat {
    /// Pick the format from the file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(DatasetFormat::Json),
            "jsonl" | "ndjson" => Some(DatasetFormat::JsonLines),
            _ => None,
        }
    }
}

/// Load every row of a dataset file
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<RawBreedRecord>> {
    let path = path.as_ref();
    let format = DatasetFormat::from_path(path)
        .ok_or_else(|| StorageError::UnsupportedFormat(path.to_path_buf()))?;

    let content = fs::read_to_string(path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records = match format {
        DatasetFormat::Json => parse_json(&content, path)?,
        DatasetFormat::JsonLines => parse_json_lines(&content, path)?,
    };
    info!(path = %path.display(), rows = records.len(), "loaded breed dataset");
    Ok(records)
}

/// Parse a JSON array of rows; `path` is only used in errors
pub fn parse_json(content: &str, path: &Path) -> Result<Vec<RawBreedRecord>> {
    serde_json::from_str(content).map_err(|source| StorageError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse one row per non-blank line; `path` is only used in errors
pub fn parse_json_lines(content: &str, path: &Path) -> Result<Vec<RawBreedRecord>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str::<RawBreedRecord>(line).map_err(|source| StorageError::ParseLine {
                path: path.to_path_buf(),
                line: i + 1,
                source,
            })
        })
        .collect()
}
