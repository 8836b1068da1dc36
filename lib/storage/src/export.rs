use crate::error::{Result, StorageError};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Write `value` as pretty JSON, replacing `path` atomically
///
/// Readers of `path` see either the old file or the complete new one.
pub fn export_json<T: Serialize, P: AsRef<Path>>(path: P, value: &T) -> Result<()> {
    let path = path.as_ref();
    let bytes = serde_json::to_vec_pretty(value)?;

    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|file| {
            file.write_all(&bytes)?;
            file.write_all(b"\n")
        })
        .map_err(|e| StorageError::Io {
            path: path.to_path_buf(),
            source: match e {
                atomicwrites::Error::Internal(e) | atomicwrites::Error::User(e) => e,
            },
        })?;

    debug!(path = %path.display(), bytes = bytes.len(), "exported json");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_export_writes_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");

        export_json(&path, &json!({"samples": 3})).unwrap();
        export_json(&path, &json!({"samples": 4})).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["samples"], 4);
    }

    #[test]
    fn test_export_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = export_json(dir.path().join("nope/stats.json"), &json!({})).unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }
}
