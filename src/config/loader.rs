//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{SourceMode, TrackplanConfig};
use super::secret_string;
use crate::domain::errors::TrackplanError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into TrackplanConfig
/// 4. Applies environment variable overrides (TRACKPLAN_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, TOML parsing fails, a
/// referenced environment variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use trackplan::config::loader::load_config;
///
/// let config = load_config("trackplan.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<TrackplanConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(TrackplanError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        TrackplanError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_str(&contents)
}

/// Same as [`load_config`] for an in-memory TOML document
pub fn load_config_str(contents: &str) -> Result<TrackplanConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: TrackplanConfig = toml::from_str(&contents)
        .map_err(|e| TrackplanError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(TrackplanError::Validation)?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| TrackplanError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(TrackplanError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the TRACKPLAN_* prefix
///
/// Variables follow the pattern TRACKPLAN_<SECTION>_<KEY>, for example
/// TRACKPLAN_AMPLITUDE_SOURCE_MODE or TRACKPLAN_SERVER_BIND_ADDRESS.
fn apply_env_overrides(config: &mut TrackplanConfig) -> Result<()> {
    if let Ok(val) = std::env::var("TRACKPLAN_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("TRACKPLAN_SERVER_BIND_ADDRESS") {
        config.server.bind_address = val;
    }

    // Amplitude
    if let Ok(val) = std::env::var("TRACKPLAN_AMPLITUDE_SOURCE_MODE") {
        config.amplitude.source_mode = match val.to_lowercase().as_str() {
            "api" => SourceMode::Api,
            "file" | "csv" => SourceMode::File,
            other => {
                return Err(TrackplanError::Configuration(format!(
                    "Invalid TRACKPLAN_AMPLITUDE_SOURCE_MODE '{other}'. Must be one of: api, file"
                )))
            }
        };
    }
    if let Ok(val) = std::env::var("TRACKPLAN_AMPLITUDE_API_KEY") {
        config.amplitude.api_key = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("TRACKPLAN_AMPLITUDE_SECRET_KEY") {
        config.amplitude.secret_key = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("TRACKPLAN_AMPLITUDE_REGION") {
        config.amplitude.region = val;
    }
    if let Ok(val) = std::env::var("TRACKPLAN_AMPLITUDE_BASE_URL") {
        config.amplitude.base_url = Some(val);
    }
    if let Ok(val) = std::env::var("TRACKPLAN_AMPLITUDE_CACHE_TTL_SECONDS") {
        if let Ok(ttl) = val.parse() {
            config.amplitude.cache_ttl_seconds = ttl;
        }
    }
    if let Ok(val) = std::env::var("TRACKPLAN_AMPLITUDE_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.amplitude.timeout_seconds = timeout;
        }
    }
    if let Ok(val) = std::env::var("TRACKPLAN_AMPLITUDE_EXPORT_PATH") {
        config.amplitude.export_path = val;
    }

    // File-backed sources
    if let Ok(val) = std::env::var("TRACKPLAN_INSIDER_PATH") {
        config.insider.path = val;
    }
    if let Ok(val) = std::env::var("TRACKPLAN_GTM_SERVER_PATH") {
        config.gtm.server_path = val;
    }
    if let Ok(val) = std::env::var("TRACKPLAN_GTM_CLIENT_PATH") {
        config.gtm.client_path = val;
    }

    // Logging
    if let Ok(val) = std::env::var("TRACKPLAN_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("TRACKPLAN_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
