//! Core logic for trackplan.
//!
//! # Modules
//!
//! - [`acquisition`] - the usage-analytics source in API (cached) or file mode
//! - [`aggregate`] - pure summaries over each platform's records
//! - [`registry`] - startup construction of every source, with fallback
//!
//! # Data Flow
//!
//! 1. **Initialize**: [`registry::SourceRegistry::initialize`] builds each
//!    source once, falling back from API to file mode when needed
//! 2. **Read**: queries pull normalized records from a source, refetching
//!    the API snapshot when its TTL has expired
//! 3. **Aggregate**: the records are reduced into summaries and lists
//!
//! # Example
//!
//! ```rust,no_run
//! use trackplan::config::load_config;
//! use trackplan::core::registry::SourceRegistry;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("trackplan.toml")?;
//! let registry = SourceRegistry::initialize(&config).await;
//!
//! if let Some(usage) = registry.amplitude() {
//!     let overview = usage.platform_overview().await?;
//!     println!("{} events ({})", overview.total_events, overview.last_updated);
//! }
//! # Ok(())
//! # }
//! ```

pub mod acquisition;
pub mod aggregate;
pub mod registry;
