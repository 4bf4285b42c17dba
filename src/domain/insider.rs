//! Marketing-automation (Insider) export records

use super::lenient::{lenient_list, null_as_default};
use serde::Deserialize;

/// One event definition from the Insider JSON export
///
/// The export is a top-level array of these.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InsiderEvent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_pii: bool,
    #[serde(default, deserialize_with = "lenient_list")]
    pub params: Vec<InsiderParam>,
}

impl InsiderEvent {
    /// Category label, empty when the export has none
    pub fn category(&self) -> &str {
        self.category.as_deref().unwrap_or("")
    }
}

/// One parameter attached to an [`InsiderEvent`]
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InsiderParam {
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(default, rename = "type")]
    pub value_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_pii: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub show_on_segment: bool,
}

impl InsiderParam {
    /// Declared type, empty when absent
    pub fn value_type(&self) -> &str {
        self.value_type.as_deref().unwrap_or("")
    }

    /// Declared type, `"unknown"` when absent
    pub fn type_or_unknown(&self) -> &str {
        self.value_type.as_deref().unwrap_or("unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_missing_fields() {
        let events: Vec<InsiderEvent> = serde_json::from_str(
            r#"[{"key": "purchase", "params": [{"key": "amount", "type": "number"}, {"key": "coupon"}]}]"#,
        )
        .unwrap();

        assert_eq!(events[0].key, "purchase");
        assert_eq!(events[0].category(), "");
        assert!(!events[0].is_pii);
        assert_eq!(events[0].params[0].value_type(), "number");
        assert_eq!(events[0].params[1].value_type(), "");
        assert_eq!(events[0].params[1].type_or_unknown(), "unknown");
    }

    #[test]
    fn test_deserialize_with_null_fields() {
        let events: Vec<InsiderEvent> = serde_json::from_str(
            r#"[{"key": "purchase", "display_name": null, "category": null, "is_pii": null,
                 "params": [{"key": "amount", "display_name": null, "type": null,
                             "is_pii": null, "show_on_segment": null}]}]"#,
        )
        .unwrap();

        let event = &events[0];
        assert_eq!(event.display_name, "");
        assert_eq!(event.category(), "");
        assert!(!event.is_pii);
        assert_eq!(event.params[0].display_name, "");
        assert_eq!(event.params[0].type_or_unknown(), "unknown");
        assert!(!event.params[0].show_on_segment);
    }

    #[test]
    fn test_malformed_params_are_skipped() {
        let event: InsiderEvent = serde_json::from_str(
            r#"{"key": "search", "params": [{"key": "query"}, "term", null, {"key": "page"}]}"#,
        )
        .unwrap();

        let keys: Vec<&str> = event.params.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["query", "page"]);
    }
}
