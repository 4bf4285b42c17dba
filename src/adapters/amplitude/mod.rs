//! Amplitude taxonomy API integration
//!
//! - [`AmplitudeClient`] - authenticated HTTP client with bounded retry
//! - [`TaxonomyApi`] - the read interface the acquisition layer depends on
//! - [`models`] - wire records and envelope handling

pub mod api;
pub mod client;
pub mod models;
pub mod retry;

pub use api::TaxonomyApi;
pub use client::AmplitudeClient;
pub use models::{CategoryRef, RawCategory, RawEventProperty, RawEventType};
pub use retry::{RetryPolicy, Sleeper, TokioSleeper};
