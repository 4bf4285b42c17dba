//! Taxonomy API wire models
//!
//! Every field the service may omit or null out is optional here; the
//! normalization layer decides the defaults. Records that do not match
//! these shapes at all are skipped with a warning instead of failing the
//! whole response.

use crate::domain::lenient::collect_valid;
use crate::domain::ApiError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Response envelope shared by every taxonomy endpoint
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: Option<Value>,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<EnvelopeError>>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeError {
    #[serde(default)]
    message: Option<String>,
}

/// An event type as returned by `GET /taxonomy/event`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawEventType {
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl RawEventType {
    pub fn name(&self) -> &str {
        self.event_type.as_deref().unwrap_or("")
    }
}

/// How an event refers to its category
///
/// The service inlines `{id, name}` objects, but bare ids and bare labels
/// have both been observed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Inline {
        #[serde(default)]
        id: Option<i64>,
        #[serde(default)]
        name: Option<String>,
    },
    Id(i64),
    Label(String),
}

/// A property as returned by `GET /taxonomy/event-property`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawEventProperty {
    #[serde(default)]
    pub event_property: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub value_type: Option<String>,
    #[serde(default)]
    pub is_required: Option<bool>,
    #[serde(default)]
    pub is_array_type: Option<bool>,
}

/// A category as returned by `GET /taxonomy/category`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawCategory {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Unwraps an envelope, returning its `data` payload
///
/// A missing `data` field yields an empty array.
///
/// # Errors
///
/// [`ApiError::InvalidResponse`] if `body` is not an envelope;
/// [`ApiError::Upstream`] carrying `status` and the first reported error
/// message (or `"Unknown error"`) if `success` is falsy.
pub fn parse_envelope(status: u16, body: &str) -> Result<Value, ApiError> {
    let envelope: Envelope =
        serde_json::from_str(body).map_err(|e| ApiError::InvalidResponse(e.to_string()))?;

    if !envelope.success.as_ref().map(is_truthy).unwrap_or(false) {
        let message = envelope
            .errors
            .and_then(|errors| errors.into_iter().next())
            .map(|error| error.message.unwrap_or_default())
            .unwrap_or_else(|| "Unknown error".to_string());
        return Err(ApiError::Upstream { status, message });
    }

    Ok(envelope.data.unwrap_or_else(|| Value::Array(Vec::new())))
}

/// Deserializes each element of a `data` array, skipping malformed ones
///
/// # Errors
///
/// [`ApiError::InvalidResponse`] if `data` is not an array.
pub fn parse_records<T: DeserializeOwned>(data: Value, resource: &str) -> Result<Vec<T>, ApiError> {
    if !data.is_array() {
        return Err(ApiError::InvalidResponse(format!(
            "Expected a list of {resource} records"
        )));
    }

    Ok(collect_valid(data, resource))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
