//! Taxonomy API abstraction

use super::models::{RawCategory, RawEventProperty, RawEventType};
use crate::domain::Result;
use async_trait::async_trait;

/// Read access to a remote event taxonomy
///
/// [`AmplitudeClient`](super::AmplitudeClient) is the production
/// implementation; the acquisition layer only depends on this trait.
#[async_trait]
pub trait TaxonomyApi: Send + Sync {
    /// All event types, including deleted ones when `show_deleted` is set
    async fn get_events(&self, show_deleted: bool) -> Result<Vec<RawEventType>>;

    /// Properties attached to one event type
    async fn get_event_properties(&self, event_type: &str) -> Result<Vec<RawEventProperty>>;

    /// Event categories
    async fn get_categories(&self) -> Result<Vec<RawCategory>>;

    /// Root URL requests are sent to
    fn base_url(&self) -> &str;

    /// Whether the API answers an authenticated request
    async fn health_check(&self) -> bool {
        self.get_categories().await.is_ok()
    }
}
