//! Domain models and types for trackplan.
//!
//! The domain layer provides:
//! - **Source identifiers** ([`SourceKey`], [`ContainerSide`])
//! - **Insider and GTM export records** ([`InsiderEvent`], [`GtmExport`])
//! - **Normalized usage-analytics records** ([`EventRecord`], [`PropertyRecord`], [`UniqueProperty`])
//! - **Error types** ([`TrackplanError`], [`ApiError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, TrackplanError>`]:
//!
//! ```rust
//! use trackplan::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = trackplan::config::load_config("trackplan.toml")?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod gtm;
pub mod ids;
pub mod insider;
pub mod lenient;
pub mod result;
pub mod taxonomy;

// Re-export commonly used types for convenience
pub use errors::{ApiError, TrackplanError};
pub use gtm::{ContainerType, GtmExport};
pub use ids::{ContainerSide, SourceKey};
pub use insider::{InsiderEvent, InsiderParam};
pub use result::Result;
pub use taxonomy::{Activity, Category, EventRecord, PropertyRecord, UniqueProperty};
