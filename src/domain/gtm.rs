//! Tag-management (GTM) workspace export records
//!
//! Field names follow the export's camelCase JSON. Only the parts of the
//! container version the dashboard reads are modelled; everything else
//! is ignored on deserialization.

use super::lenient::{lenient_list, null_as_default};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parameter keys that name the system a tag sends data to
pub const SUMMARY_DESTINATION_KEYS: [&str; 3] = ["measurementId", "trackingId", "containerId"];

/// Destination keys recognized by destination analysis
pub const ANALYSIS_DESTINATION_KEYS: [&str; 5] = [
    "measurementId",
    "trackingId",
    "containerId",
    "pixelId",
    "advertiserId",
];

/// A full workspace export
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GtmExport {
    #[serde(default, deserialize_with = "null_as_default")]
    pub export_time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub container_version: ContainerVersion,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ContainerVersion {
    #[serde(default, deserialize_with = "null_as_default")]
    pub container: Container,
    #[serde(default, deserialize_with = "lenient_list")]
    pub tag: Vec<Tag>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub trigger: Vec<Trigger>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub variable: Vec<Variable>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub public_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub account_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub container_id: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub usage_context: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub tagging_server_urls: Vec<String>,
}

impl Container {
    /// Container type derived from its usage context
    pub fn container_type(&self) -> ContainerType {
        if self.usage_context.iter().any(|c| c == "SERVER") {
            ContainerType::ServerSide
        } else if self.usage_context.iter().any(|c| c == "WEB") {
            ContainerType::ClientSide
        } else {
            ContainerType::Unknown
        }
    }
}

/// Where a container runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContainerType {
    ServerSide,
    ClientSide,
    Unknown,
}

impl ContainerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerType::ServerSide => "server-side",
            ContainerType::ClientSide => "client-side",
            ContainerType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ContainerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, rename = "type")]
    pub tag_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tag_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub paused: bool,
    #[serde(default, deserialize_with = "lenient_list")]
    pub firing_trigger_id: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub blocking_trigger_id: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub parameter: Vec<Parameter>,
}

impl Tag {
    /// Value of the first parameter whose key is one of `keys`
    pub fn destination(&self, keys: &[&str]) -> Option<String> {
        self.parameter
            .iter()
            .find(|p| keys.contains(&p.key.as_str()))
            .map(Parameter::value_text)
    }
}

/// A template parameter; list and map parameters carry no scalar `value`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Parameter {
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(default)]
    pub value: Option<Value>,
}

impl Parameter {
    /// Scalar value as text, `"unknown"` when absent
    pub fn value_text(&self) -> String {
        match &self.value {
            None | Some(Value::Null) => "unknown".to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trigger {
    #[serde(default, deserialize_with = "null_as_default")]
    pub trigger_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, rename = "type")]
    pub trigger_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Variable {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, rename = "type")]
    pub variable_type: Option<String>,
}
