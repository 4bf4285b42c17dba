//! External system integrations for trackplan.
//!
//! - [`amplitude`] - Taxonomy API client (basic auth, bounded retry,
//!   `Retry-After` aware) behind the [`amplitude::TaxonomyApi`] trait
//! - [`readers`] - CSV and JSON export readers
//!
//! Adapters isolate I/O so the acquisition layer can be tested against
//! fake implementations of the API trait.
//!
//! ```rust,no_run
//! use trackplan::adapters::amplitude::{AmplitudeClient, TaxonomyApi};
//! use trackplan::config::{secret_string, AmplitudeConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AmplitudeConfig {
//!     api_key: Some(secret_string("api-key".to_string())),
//!     secret_key: Some(secret_string("secret-key".to_string())),
//!     region: "eu".to_string(),
//!     ..Default::default()
//! };
//!
//! let client = AmplitudeClient::new(&config)?;
//! let events = client.get_events(true).await?;
//! println!("{} event types", events.len());
//! # Ok(())
//! # }
//! ```

pub mod amplitude;
pub mod readers;
