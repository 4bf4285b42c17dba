//! Serve command implementation

use super::{EXIT_CONFIG, EXIT_CONNECTION, EXIT_FATAL, EXIT_OK};
use crate::config::load_config;
use crate::core::registry::SourceRegistry;
use crate::domain::TrackplanError;
use crate::server::{resolve_bind_address, serve};
use clap::Args;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on, overriding `server.bind_address`
    #[arg(short, long)]
    pub bind: Option<String>,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let bind_address = resolve_bind_address(&config.server, self.bind.as_deref());
        let sources = SourceRegistry::initialize(&config).await;

        println!("🚀 Serving dashboard on http://{bind_address}");

        match serve(&bind_address, sources).await {
            Ok(()) => Ok(EXIT_OK),
            Err(e @ TrackplanError::Connection(_)) => {
                println!("❌ {e}");
                Ok(EXIT_CONNECTION)
            }
            Err(e) => {
                tracing::error!(error = %e, "Server failed");
                println!("❌ {e}");
                Ok(EXIT_FATAL)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serve_missing_config() {
        let args = ServeArgs { bind: None };
        let code = args.execute("/nonexistent/trackplan.toml").await.unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }
}
