// trackplan - Tracking Plan Dashboard
// Copyright (c) 2025 trackplan Contributors
// Licensed under the MIT License

//! # trackplan - Tracking Plan Dashboard
//!
//! trackplan collects the event taxonomies a product tracks in three places
//! and serves them as one JSON dashboard:
//!
//! - **Amplitude** usage analytics, read live from the taxonomy API (cached,
//!   rate-limit aware) or from a CSV export
//! - **Insider** event definitions, from a JSON export
//! - **GTM** server-side and client-side container exports
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`server`] - axum routes and view models
//! - [`core`] - Acquisition modes, aggregators and the source registry
//! - [`adapters`] - Taxonomy API client and file readers
//! - [`domain`] - Source records, identifiers and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use trackplan::config::load_config;
//! use trackplan::core::registry::SourceRegistry;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("trackplan.toml")?;
//!     let sources = SourceRegistry::initialize(&config).await;
//!
//!     if let Some(usage) = sources.amplitude() {
//!         let overview = usage.platform_overview().await?;
//!         println!("{} events ({})", overview.total_events, overview.last_updated);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Source Modes
//!
//! The usage source runs in API mode when `amplitude.source_mode = "api"`
//! and both keys are set. Snapshots are refetched lazily once older than
//! `cache_ttl_seconds`. If the API cannot be reached at startup the CSV
//! export is served instead, and every view reports
//! `last_updated = "CSV snapshot"`.
//!
//! ## Error Handling
//!
//! Fallible operations return [`domain::Result`], whose error type is
//! [`domain::TrackplanError`]. A source that fails to load is absent from
//! the registry and answered with "data not available".

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod server;
