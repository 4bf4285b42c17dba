//! Configuration schema types
//!
//! This module defines the configuration structure for trackplan. Every
//! section has defaults so a minimal file (or none of the optional
//! sections) still yields a runnable configuration.

use crate::config::SecretString;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Base URL of the US-hosted taxonomy API
pub const US_BASE_URL: &str = "https://amplitude.com/api/2";

/// Base URL of the EU-hosted taxonomy API
pub const EU_BASE_URL: &str = "https://analytics.eu.amplitude.com/api/2";

/// Main trackplan configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackplanConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Usage-analytics (Amplitude) source
    #[serde(default)]
    pub amplitude: AmplitudeConfig,

    /// Marketing-automation (Insider) source
    #[serde(default)]
    pub insider: InsiderConfig,

    /// Tag-management (GTM) sources
    #[serde(default)]
    pub gtm: GtmConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TrackplanConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.server.validate()?;
        self.amplitude.validate()?;
        self.insider.validate()?;
        self.gtm.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the dashboard listens on
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl ServerConfig {
    fn validate(&self) -> Result<(), String> {
        self.bind_address.parse::<SocketAddr>().map_err(|e| {
            format!(
                "server.bind_address '{}' is not a valid socket address: {e}",
                self.bind_address
            )
        })?;
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

/// Where the usage-analytics taxonomy is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Live taxonomy API, cached
    Api,
    /// Static CSV export
    #[default]
    File,
}

impl std::fmt::Display for SourceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceMode::Api => f.write_str("api"),
            SourceMode::File => f.write_str("file"),
        }
    }
}

/// Retry configuration for the taxonomy API client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the initial request on 429/5xx or transport failure
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Backoff factor in milliseconds (delay = factor * 2^(retry - 1))
    #[serde(default = "default_backoff_factor_ms")]
    pub backoff_factor_ms: u64,

    /// Wait applied to a 429 without a usable `Retry-After` header
    #[serde(default = "default_retry_after_seconds")]
    pub default_retry_after_seconds: u64,

    /// Upper bound on any single `Retry-After` wait
    #[serde(default = "default_max_retry_after_seconds")]
    pub max_retry_after_seconds: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff_factor_ms: default_backoff_factor_ms(),
            default_retry_after_seconds: default_retry_after_seconds(),
            max_retry_after_seconds: default_max_retry_after_seconds(),
        }
    }
}

/// Usage-analytics source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmplitudeConfig {
    /// Requested source mode; `api` falls back to `file` when unusable
    #[serde(default)]
    pub source_mode: SourceMode,

    /// Project API key
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Project secret key
    #[serde(default)]
    pub secret_key: Option<SecretString>,

    /// Data region (`us` or `eu`); anything else resolves to `us`
    #[serde(default = "default_region")]
    pub region: String,

    /// Explicit API root, overriding the region mapping
    #[serde(default)]
    pub base_url: Option<String>,

    /// Seconds a fetched snapshot stays valid
    #[serde(default = "default_cache_ttl_seconds")]
    pub cache_ttl_seconds: u64,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Concurrent per-event property fetches during a refetch
    #[serde(default = "default_property_concurrency")]
    pub property_concurrency: usize,

    /// Connection attempts at startup before falling back to the export
    #[serde(default = "default_startup_attempts")]
    pub startup_attempts: usize,

    /// CSV export used in file mode and as the API fallback
    #[serde(default = "default_export_path")]
    pub export_path: String,

    /// Retry configuration
    #[serde(default)]
    pub retry: RetryConfig,
}

impl AmplitudeConfig {
    /// API root for the configured region (or the explicit override)
    pub fn resolved_base_url(&self) -> String {
        if let Some(ref url) = self.base_url {
            return url.trim_end_matches('/').to_string();
        }
        match self.region.to_lowercase().as_str() {
            "eu" => EU_BASE_URL.to_string(),
            _ => US_BASE_URL.to_string(),
        }
    }

    /// Both keys, when present and non-empty
    pub fn credentials(&self) -> Option<(&SecretString, &SecretString)> {
        match (&self.api_key, &self.secret_key) {
            (Some(key), Some(secret))
                if !key.expose_secret().is_empty() && !secret.expose_secret().is_empty() =>
            {
                Some((key, secret))
            }
            _ => None,
        }
    }

    fn validate(&self) -> Result<(), String> {
        if let Some(ref url) = self.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("amplitude.base_url must start with http:// or https://".to_string());
            }
        }

        if self.timeout_seconds == 0 {
            return Err("amplitude.timeout_seconds must be greater than 0".to_string());
        }

        if self.property_concurrency == 0 || self.property_concurrency > 32 {
            return Err(format!(
                "amplitude.property_concurrency must be between 1 and 32, got {}",
                self.property_concurrency
            ));
        }

        if self.startup_attempts == 0 {
            return Err("amplitude.startup_attempts must be at least 1".to_string());
        }

        if self.export_path.trim().is_empty() {
            return Err("amplitude.export_path cannot be empty".to_string());
        }

        if self.retry.max_retries > 10 {
            return Err(format!(
                "amplitude.retry.max_retries must be at most 10, got {}",
                self.retry.max_retries
            ));
        }

        if self.retry.max_retry_after_seconds == 0 {
            return Err("amplitude.retry.max_retry_after_seconds must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Default for AmplitudeConfig {
    fn default() -> Self {
        Self {
            source_mode: SourceMode::default(),
            api_key: None,
            secret_key: None,
            region: default_region(),
            base_url: None,
            cache_ttl_seconds: default_cache_ttl_seconds(),
            timeout_seconds: default_timeout_seconds(),
            property_concurrency: default_property_concurrency(),
            startup_attempts: default_startup_attempts(),
            export_path: default_export_path(),
            retry: RetryConfig::default(),
        }
    }
}

/// Marketing-automation source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsiderConfig {
    /// JSON export of event definitions
    #[serde(default = "default_insider_path")]
    pub path: String,
}

impl InsiderConfig {
    fn validate(&self) -> Result<(), String> {
        if self.path.trim().is_empty() {
            return Err("insider.path cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for InsiderConfig {
    fn default() -> Self {
        Self {
            path: default_insider_path(),
        }
    }
}

/// Tag-management source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GtmConfig {
    /// Server-side container workspace export
    #[serde(default = "default_gtm_server_path")]
    pub server_path: String,

    /// Client-side container workspace export
    #[serde(default = "default_gtm_client_path")]
    pub client_path: String,
}

impl GtmConfig {
    fn validate(&self) -> Result<(), String> {
        if self.server_path.trim().is_empty() {
            return Err("gtm.server_path cannot be empty".to_string());
        }
        if self.client_path.trim().is_empty() {
            return Err("gtm.client_path cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for GtmConfig {
    fn default() -> Self {
        Self {
            server_path: default_gtm_server_path(),
            client_path: default_gtm_client_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_region() -> String {
    "us".to_string()
}

fn default_cache_ttl_seconds() -> u64 {
    900
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_property_concurrency() -> usize {
    1
}

fn default_startup_attempts() -> usize {
    2
}

fn default_max_retries() -> usize {
    3
}

fn default_backoff_factor_ms() -> u64 {
    1000
}

fn default_retry_after_seconds() -> u64 {
    5
}

fn default_max_retry_after_seconds() -> u64 {
    60
}

fn default_export_path() -> String {
    "sources/amplitude/events.csv".to_string()
}

fn default_insider_path() -> String {
    "sources/insider/insider.json".to_string()
}

fn default_gtm_server_path() -> String {
    "sources/gtm/server.json".to_string()
}

fn default_gtm_client_path() -> String {
    "sources/gtm/client.json".to_string()
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
