//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the trackplan configuration file.

use super::{EXIT_CONFIG, EXIT_OK};
use crate::config::{load_config, SourceMode};
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates before returning
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let amplitude = &config.amplitude;

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Bind Address: {}", config.server.bind_address);
        println!("  Amplitude Mode: {}", amplitude.source_mode);
        if amplitude.source_mode == SourceMode::Api {
            println!("  Amplitude API: {}", amplitude.resolved_base_url());
            let credentials = if amplitude.credentials().is_some() {
                "configured"
            } else {
                "missing (the CSV export will be used)"
            };
            println!("  Amplitude Credentials: {credentials}");
            println!("  Cache TTL: {}s", amplitude.cache_ttl_seconds);
        }
        println!("  Amplitude Export: {}", describe_path(&amplitude.export_path));
        println!("  Insider Export: {}", describe_path(&config.insider.path));
        println!("  GTM Server Export: {}", describe_path(&config.gtm.server_path));
        println!("  GTM Client Export: {}", describe_path(&config.gtm.client_path));

        if config.logging.local_enabled {
            println!(
                "  File Logging: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        }

        Ok(EXIT_OK)
    }
}

/// The path, flagged when nothing exists there yet
fn describe_path(path: &str) -> String {
    if Path::new(path).exists() {
        path.to_string()
    } else {
        format!("{path} (not found)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_validate_valid_config() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[amplitude]\nsource_mode = \"file\"\n").unwrap();
        file.flush().unwrap();

        let args = ValidateArgs {};
        let code = args.execute(file.path().to_str().unwrap()).await.unwrap();
        assert_eq!(code, EXIT_OK);
    }

    #[tokio::test]
    async fn test_validate_invalid_config() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[server]\nbind_address = \"nowhere\"\n").unwrap();
        file.flush().unwrap();

        let args = ValidateArgs {};
        let code = args.execute(file.path().to_str().unwrap()).await.unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }

    #[tokio::test]
    async fn test_validate_missing_file() {
        let args = ValidateArgs {};
        let code = args.execute("/nonexistent/trackplan.toml").await.unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }

    #[test]
    fn test_describe_missing_path() {
        assert_eq!(
            describe_path("/nonexistent/events.csv"),
            "/nonexistent/events.csv (not found)"
        );
    }
}
