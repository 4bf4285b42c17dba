//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for trackplan using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// trackplan - tracking-plan dashboard over analytics, CRM and tag-manager taxonomies
#[derive(Parser, Debug)]
#[command(name = "trackplan")]
#[command(version, about, long_about = None)]
#[command(author = "trackplan Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "trackplan.toml", env = "TRACKPLAN_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "TRACKPLAN_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load every source and serve the dashboard
    Serve(commands::serve::ServeArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Load every source and report its availability
    Status(commands::status::StatusArgs),
}
