//! Error responses
//!
//! Page-style routes answer with `{ "message": ... }`, the raw-data API
//! with `{ "error": ... }`.

use crate::domain::{SourceKey, TrackplanError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug)]
pub enum RouteError {
    /// A detail page whose source could not be built
    PageUnavailable(String),
    /// A raw-data endpoint whose source could not be built
    DataUnavailable(String),
    /// No such page
    PageNotFound(String),
    /// The source failed while answering the request
    Source(TrackplanError),
}

impl RouteError {
    pub fn page_unavailable(key: SourceKey) -> Self {
        RouteError::PageUnavailable(unavailable_message(key.display_name()))
    }

    pub fn data_unavailable(key: SourceKey) -> Self {
        RouteError::DataUnavailable(unavailable_message(key.display_name()))
    }
}

/// "<label> data not available"
pub fn unavailable_message(label: &str) -> String {
    TrackplanError::Unavailable(label.to_string()).to_string()
}

impl From<TrackplanError> for RouteError {
    fn from(err: TrackplanError) -> Self {
        RouteError::Source(err)
    }
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            RouteError::PageUnavailable(message) => {
                (StatusCode::SERVICE_UNAVAILABLE, json!({ "message": message }))
            }
            RouteError::DataUnavailable(error) => (StatusCode::NOT_FOUND, json!({ "error": error })),
            RouteError::PageNotFound(message) => (StatusCode::NOT_FOUND, json!({ "message": message })),
            RouteError::Source(err) => {
                tracing::error!(error = %err, "Source query failed");
                (StatusCode::BAD_GATEWAY, json!({ "error": err.to_string() }))
            }
        };

        (status, Json(body)).into_response()
    }
}
