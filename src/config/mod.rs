//! Configuration management for trackplan.
//!
//! trackplan uses a TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `TRACKPLAN_*` environment overrides
//! - Default values for every optional setting
//! - Validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [server]
//! bind_address = "0.0.0.0:5000"
//!
//! [amplitude]
//! source_mode = "api"
//! api_key = "${AMPLITUDE_API_KEY}"
//! secret_key = "${AMPLITUDE_SECRET_KEY}"
//! region = "eu"
//! cache_ttl_seconds = 900
//! export_path = "sources/amplitude/events.csv"
//!
//! [insider]
//! path = "sources/insider/insider.json"
//!
//! [gtm]
//! server_path = "sources/gtm/server.json"
//! client_path = "sources/gtm/client.json"
//! ```
//!
//! When `source_mode = "api"` but either key is missing, the usage source
//! is served from `export_path` instead; this is not a validation error.

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_str};
pub use schema::{
    AmplitudeConfig, ApplicationConfig, GtmConfig, InsiderConfig, LoggingConfig, RetryConfig,
    ServerConfig, SourceMode, TrackplanConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
