//! Normalized usage-analytics records
//!
//! These are the shapes every usage-analytics query returns, whichever
//! reader backs the adapter. Fields a reader cannot supply are filled with
//! their documented default (empty string, zero, `false`) rather than
//! omitted, so serialized records always carry the same keys and types.

use serde::{Serialize, Serializer};
use std::fmt;

/// Activity state of an event
///
/// The live API only knows active vs. deleted; exports may carry other
/// values, which are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Activity {
    Active,
    Deleted,
    Other(String),
}

impl Activity {
    /// Maps the API's `is_active` flag
    pub fn from_flag(is_active: bool) -> Self {
        if is_active {
            Activity::Active
        } else {
            Activity::Deleted
        }
    }

    /// Reads an export column value verbatim
    pub fn parse(value: &str) -> Self {
        match value {
            "ACTIVE" => Activity::Active,
            "DELETED" => Activity::Deleted,
            other => Activity::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Activity::Active => "ACTIVE",
            Activity::Deleted => "DELETED",
            Activity::Other(value) => value,
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Activity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One tracked event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    pub name: String,
    pub display_name: String,
    pub category: String,
    pub owner: String,
    pub description: String,
    pub activity: Activity,
    pub schema_status: String,
    pub volume_180_days: u64,
    pub queries_180_days: u64,
    pub first_seen: String,
    pub last_seen: String,
}

/// One property attached to an event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyRecord {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub value_type: String,
    pub required: bool,
    pub is_array: bool,
    pub schema_status: String,
    pub first_seen: String,
    pub last_seen: String,
}

/// An event category
///
/// `id` is only known when the categories come from the live API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: Option<i64>,
    pub name: String,
}

/// A property de-duplicated across every event that carries it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UniqueProperty {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub value_type: String,
    pub is_array: bool,
    pub schema_status: String,
    pub first_seen: String,
    pub last_seen: String,
    pub event_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_from_flag() {
        assert_eq!(Activity::from_flag(true), Activity::Active);
        assert_eq!(Activity::from_flag(false), Activity::Deleted);
    }

    #[test]
    fn test_activity_parse_keeps_unknown_values() {
        assert_eq!(Activity::parse("ACTIVE"), Activity::Active);
        assert_eq!(Activity::parse("DELETED"), Activity::Deleted);
        assert_eq!(
            Activity::parse("BLOCKED"),
            Activity::Other("BLOCKED".to_string())
        );
        assert_eq!(Activity::parse("BLOCKED").as_str(), "BLOCKED");
    }

    #[test]
    fn test_activity_serializes_as_string() {
        let json = serde_json::to_value(Activity::Deleted).unwrap();
        assert_eq!(json, serde_json::json!("DELETED"));
    }

    #[test]
    fn test_property_type_field_name() {
        let property = PropertyRecord {
            name: "plan".to_string(),
            description: String::new(),
            value_type: "string".to_string(),
            required: false,
            is_array: false,
            schema_status: String::new(),
            first_seen: String::new(),
            last_seen: String::new(),
        };
        let json = serde_json::to_value(&property).unwrap();
        assert_eq!(json["type"], "string");
        assert!(json.get("value_type").is_none());
    }
}
