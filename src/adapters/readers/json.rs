//! JSON document reader

use crate::domain::lenient::collect_valid;
use crate::domain::{Result, TrackplanError};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Deserializes the whole JSON document at `path` into `T`
///
/// # Errors
///
/// Returns [`TrackplanError::SourceLoad`] if the file is missing or the
/// document does not match `T`.
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();

    let file = File::open(path).map_err(|e| TrackplanError::source_load(path, e))?;
    let document = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| TrackplanError::source_load(path, e))?;

    tracing::debug!(path = %path.display(), "JSON document loaded");
    Ok(document)
}

/// Reads a top-level JSON list at `path`, keeping the elements that fit `T`
///
/// Malformed elements are skipped with a warning.
///
/// # Errors
///
/// Returns [`TrackplanError::SourceLoad`] if the file is missing, is not
/// JSON, or its top level is not a list.
pub fn read_json_list<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<T>> {
    let path = path.as_ref();
    let document: Value = read_json(path)?;

    if !document.is_array() {
        return Err(TrackplanError::source_load(path, "expected a top-level list"));
    }
    let total = document.as_array().map_or(0, Vec::len);
    let records = collect_valid(document, &path.display().to_string());

    if records.len() < total {
        tracing::warn!(
            path = %path.display(),
            skipped = total - records.len(),
            "Skipped malformed records"
        );
    }
    Ok(records)
}
