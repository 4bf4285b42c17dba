//! CSV reader

use crate::domain::{Result, TrackplanError};
use std::collections::HashMap;
use std::path::Path;

/// One CSV row keyed by trimmed column name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row(HashMap<String, String>);

impl Row {
    /// Value of `column`, or `""` when the column is absent from this row
    pub fn get(&self, column: &str) -> &str {
        self.0.get(column).map(String::as_str).unwrap_or("")
    }

    /// Trimmed value of `column`
    pub fn get_trimmed(&self, column: &str) -> &str {
        self.get(column).trim()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }
}

impl FromIterator<(String, String)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Row(iter.into_iter().collect())
    }
}

/// Reads every row of the CSV file at `path`
///
/// Column names are trimmed. Rows the parser rejects are skipped with a
/// warning; rows shorter than the header simply lack the trailing columns.
///
/// # Errors
///
/// Returns [`TrackplanError::SourceLoad`] if the file is missing or its
/// header cannot be read.
pub fn read_rows(path: impl AsRef<Path>) -> Result<Vec<Row>> {
    let path = path.as_ref();

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| TrackplanError::source_load(path, e))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| TrackplanError::source_load(path, e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for (index, record) in reader.records().enumerate() {
        match record {
            Ok(record) => rows.push(
                headers
                    .iter()
                    .cloned()
                    .zip(record.iter().map(str::to_string))
                    .collect(),
            ),
            Err(e) => {
                skipped += 1;
                tracing::warn!(
                    path = %path.display(),
                    line = index + 2,
                    error = %e,
                    "Skipping malformed CSV row"
                );
            }
        }
    }

    tracing::debug!(
        path = %path.display(),
        rows = rows.len(),
        skipped,
        "CSV file loaded"
    );

    Ok(rows)
}
