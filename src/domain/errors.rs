//! Domain error types
//!
//! The error hierarchy for trackplan. Errors are domain-specific and don't
//! expose third-party types: HTTP, CSV and TOML failures are flattened into
//! messages at the boundary where they occur.

use thiserror::Error;

/// Main trackplan error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum TrackplanError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A source file could not be read or parsed
    #[error("Error loading {path}: {message}")]
    SourceLoad { path: String, message: String },

    /// Taxonomy API errors
    #[error("Taxonomy API error: {0}")]
    Api(#[from] ApiError),

    /// A data source is not available (construction failed or not configured)
    #[error("{0} data not available")]
    Unavailable(String),

    /// Configuration that parsed but holds invalid values
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network/connection errors outside the taxonomy client
    #[error("Connection error: {0}")]
    Connection(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl TrackplanError {
    /// Builds a [`TrackplanError::SourceLoad`] for `path`
    pub fn source_load(path: impl AsRef<std::path::Path>, message: impl ToString) -> Self {
        TrackplanError::SourceLoad {
            path: path.as_ref().display().to_string(),
            message: message.to_string(),
        }
    }

    /// Whether retrying the failed operation later could succeed
    ///
    /// Only upstream failures that look like outages qualify; bad
    /// credentials, bad configuration and unreadable files never do.
    pub fn is_transient(&self) -> bool {
        match self {
            TrackplanError::Api(api) => api.is_transient(),
            TrackplanError::Connection(_) => true,
            _ => false,
        }
    }
}

/// Taxonomy API errors
///
/// Errors that occur when talking to the remote taxonomy service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx final response, or a 2xx response whose envelope reports failure
    #[error("Amplitude API {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The request never produced a response (connect failure, timeout)
    #[error("Request failed: {0}")]
    Transport(String),

    /// The response body was not a valid taxonomy envelope
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    fn is_transient(&self) -> bool {
        match self {
            ApiError::Transport(_) => true,
            ApiError::Upstream { status, .. } => *status == 429 || *status >= 500,
            ApiError::InvalidResponse(_) => false,
        }
    }
}

impl From<std::io::Error> for TrackplanError {
    fn from(err: std::io::Error) -> Self {
        TrackplanError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TrackplanError {
    fn from(err: serde_json::Error) -> Self {
        TrackplanError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for TrackplanError {
    fn from(err: toml::de::Error) -> Self {
        TrackplanError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<csv::Error> for TrackplanError {
    fn from(err: csv::Error) -> Self {
        TrackplanError::Serialization(format!("CSV error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trackplan_error_display() {
        let err = TrackplanError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_api_error_conversion() {
        let api_err = ApiError::Upstream {
            status: 500,
            message: "boom".to_string(),
        };
        let err: TrackplanError = api_err.into();
        assert!(matches!(err, TrackplanError::Api(_)));
        assert_eq!(err.to_string(), "Taxonomy API error: Amplitude API 500: boom");
    }

    #[test]
    fn test_unavailable_display() {
        let err = TrackplanError::Unavailable("Amplitude".to_string());
        assert_eq!(err.to_string(), "Amplitude data not available");
    }

    #[test]
    fn test_source_load_carries_path() {
        let err = TrackplanError::source_load("sources/insider.json", "No such file");
        assert_eq!(
            err.to_string(),
            "Error loading sources/insider.json: No such file"
        );
    }

    #[test]
    fn test_transient_classification() {
        let rate_limited: TrackplanError = ApiError::Upstream {
            status: 429,
            message: String::new(),
        }
        .into();
        let unauthorized: TrackplanError = ApiError::Upstream {
            status: 401,
            message: "Invalid API key".to_string(),
        }
        .into();
        let transport: TrackplanError = ApiError::Transport("timed out".to_string()).into();

        assert!(rate_limited.is_transient());
        assert!(transport.is_transient());
        assert!(!unauthorized.is_transient());
        assert!(!TrackplanError::Configuration("x".to_string()).is_transient());
    }

    #[test]
    fn test_api_error_status() {
        let err = ApiError::Upstream {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert_eq!(err.status(), Some(503));
        assert_eq!(ApiError::Transport("x".to_string()).status(), None);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: TrackplanError = io_err.into();
        assert!(matches!(err, TrackplanError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: TrackplanError = json_err.into();
        assert!(matches!(err, TrackplanError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: TrackplanError = toml_err.into();
        assert!(matches!(err, TrackplanError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }
}
