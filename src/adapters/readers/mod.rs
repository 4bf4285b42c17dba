//! Raw source readers
//!
//! Leaf readers for the file-backed sources. They know nothing about the
//! shape of any particular platform: the tabular reader yields
//! `column → value` rows, the JSON reader deserializes into whatever typed
//! model the caller names. Any failure is a [`TrackplanError::SourceLoad`]
//! carrying the file path.
//!
//! [`TrackplanError::SourceLoad`]: crate::domain::TrackplanError::SourceLoad

pub mod json;
pub mod tabular;

pub use json::{read_json, read_json_list};
pub use tabular::{read_rows, Row};
