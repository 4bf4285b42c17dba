//! API mode: the usage taxonomy fetched live and cached
//!
//! A [`Snapshot`] holds everything one refetch pulled from the API. It is
//! replaced wholesale, never patched, and is considered valid while
//! `now - fetched_at < ttl`. Queries refetch lazily when the snapshot is
//! stale; there is no background refresh.

use super::clock::Clock;
use crate::adapters::amplitude::{CategoryRef, RawEventProperty, RawEventType, TaxonomyApi};
use crate::config::AmplitudeConfig;
use crate::core::aggregate::usage::PropertiesByEvent;
use crate::domain::{Activity, Category, EventRecord, PropertyRecord, Result};
use futures::stream::{self, StreamExt};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};

/// Cache and fetch settings for [`LiveTaxonomy`]
#[derive(Debug, Clone, PartialEq)]
pub struct LiveOptions {
    pub cache_ttl: Duration,
    pub property_concurrency: usize,
}

impl LiveOptions {
    pub fn from_config(config: &AmplitudeConfig) -> Self {
        Self {
            cache_ttl: Duration::from_secs(config.cache_ttl_seconds),
            property_concurrency: config.property_concurrency.max(1),
        }
    }
}

impl Default for LiveOptions {
    fn default() -> Self {
        Self::from_config(&AmplitudeConfig::default())
    }
}

/// Raw API data captured by one refetch
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub events: Vec<RawEventType>,
    pub categories: BTreeMap<i64, String>,
    pub properties_by_event: BTreeMap<String, Vec<RawEventProperty>>,
    pub fetched_at: Instant,
}

impl Snapshot {
    pub fn events_list(&self) -> Vec<EventRecord> {
        self.events
            .iter()
            .map(|event| normalize_event(event, &self.categories))
            .collect()
    }

    pub fn properties_by_event(&self) -> PropertiesByEvent {
        self.properties_by_event
            .iter()
            .map(|(event, properties)| {
                (
                    event.clone(),
                    properties.iter().map(normalize_property).collect(),
                )
            })
            .collect()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.categories
            .iter()
            .map(|(id, name)| Category {
                id: Some(*id),
                name: name.clone(),
            })
            .collect()
    }
}

/// Category label for an event
///
/// An inline name wins; otherwise the id is looked up in `categories`, and
/// an id the mapping does not know is rendered as-is.
pub fn resolve_category(
    category: Option<&CategoryRef>,
    categories: &BTreeMap<i64, String>,
) -> String {
    let lookup = |id: i64| {
        categories
            .get(&id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    };
    match category {
        None => String::new(),
        Some(CategoryRef::Inline { name: Some(name), .. }) if !name.is_empty() => name.clone(),
        Some(CategoryRef::Inline { id: Some(id), .. }) => lookup(*id),
        Some(CategoryRef::Inline { .. }) => String::new(),
        Some(CategoryRef::Id(id)) => lookup(*id),
        Some(CategoryRef::Label(label)) => label.clone(),
    }
}

/// Fields the API does not provide take their defaults
pub fn normalize_event(event: &RawEventType, categories: &BTreeMap<i64, String>) -> EventRecord {
    EventRecord {
        name: event.name().to_string(),
        display_name: event.display_name.clone().unwrap_or_default(),
        category: resolve_category(event.category.as_ref(), categories),
        owner: event.owner.clone().unwrap_or_default(),
        description: event.description.clone().unwrap_or_default(),
        activity: Activity::from_flag(event.is_active.unwrap_or(false)),
        schema_status: String::new(),
        volume_180_days: 0,
        queries_180_days: 0,
        first_seen: String::new(),
        last_seen: String::new(),
    }
}

pub fn normalize_property(property: &RawEventProperty) -> PropertyRecord {
    PropertyRecord {
        name: property.event_property.clone().unwrap_or_default(),
        description: property.description.clone().unwrap_or_default(),
        value_type: property.value_type.clone().unwrap_or_default(),
        required: property.is_required.unwrap_or(false),
        is_array: property.is_array_type.unwrap_or(false),
        schema_status: String::new(),
        first_seen: String::new(),
        last_seen: String::new(),
    }
}

/// Cached view over a [`TaxonomyApi`]
pub struct LiveTaxonomy {
    api: Arc<dyn TaxonomyApi>,
    clock: Arc<dyn Clock>,
    options: LiveOptions,
    snapshot: RwLock<Option<Arc<Snapshot>>>,
    refresh: Mutex<()>,
}

impl LiveTaxonomy {
    /// Builds the adapter and performs the first refetch
    ///
    /// # Errors
    ///
    /// Fails if the event list or the categories cannot be fetched.
    /// Per-event property failures never fail construction.
    pub async fn connect(
        api: Arc<dyn TaxonomyApi>,
        options: LiveOptions,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let taxonomy = Self {
            api,
            clock,
            options,
            snapshot: RwLock::new(None),
            refresh: Mutex::new(()),
        };
        taxonomy.snapshot().await?;
        Ok(taxonomy)
    }

    pub fn api(&self) -> &Arc<dyn TaxonomyApi> {
        &self.api
    }

    pub fn options(&self) -> &LiveOptions {
        &self.options
    }

    /// A valid snapshot, refetching first if the cached one is stale
    ///
    /// Concurrent callers that find the cache stale wait on a single
    /// refetch instead of each starting their own.
    pub async fn snapshot(&self) -> Result<Arc<Snapshot>> {
        if let Some(snapshot) = self.fresh_snapshot().await {
            return Ok(snapshot);
        }

        let _guard = self.refresh.lock().await;
        if let Some(snapshot) = self.fresh_snapshot().await {
            return Ok(snapshot);
        }

        let snapshot = Arc::new(self.fetch().await?);
        *self.snapshot.write().await = Some(snapshot.clone());
        Ok(snapshot)
    }

    async fn fresh_snapshot(&self) -> Option<Arc<Snapshot>> {
        let now = self.clock.now();
        self.snapshot
            .read()
            .await
            .as_ref()
            .filter(|s| now.saturating_duration_since(s.fetched_at) < self.options.cache_ttl)
            .cloned()
    }

    async fn fetch(&self) -> Result<Snapshot> {
        let started = Instant::now();
        let events = self.api.get_events(true).await?;

        let categories: BTreeMap<i64, String> = self
            .api
            .get_categories()
            .await?
            .into_iter()
            .filter_map(|c| Some((c.id?, c.name.unwrap_or_default())))
            .collect();

        let mut seen = HashSet::new();
        let names: Vec<String> = events
            .iter()
            .map(RawEventType::name)
            .filter(|name| !name.is_empty() && seen.insert(name.to_string()))
            .map(str::to_string)
            .collect();

        let api = &self.api;
        let fetched: Vec<(String, Result<Vec<RawEventProperty>>)> = stream::iter(names)
            .map(|name| async move {
                let result = api.get_event_properties(&name).await;
                (name, result)
            })
            .buffered(self.options.property_concurrency)
            .collect()
            .await;

        let mut properties_by_event = BTreeMap::new();
        let mut failed = 0usize;
        for (name, result) in fetched {
            let properties = result.unwrap_or_else(|e| {
                failed += 1;
                tracing::warn!(event = %name, error = %e, "Failed to fetch event properties");
                Vec::new()
            });
            properties_by_event.insert(name, properties);
        }

        tracing::info!(
            events = events.len(),
            categories = categories.len(),
            property_failures = failed,
            duration_ms = started.elapsed().as_millis() as u64,
            "Usage taxonomy refreshed from API"
        );

        Ok(Snapshot {
            events,
            categories,
            properties_by_event,
            fetched_at: self.clock.now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn categories() -> BTreeMap<i64, String> {
        BTreeMap::from([(3, "Checkout".to_string())])
    }

    fn raw_event(value: serde_json::Value) -> RawEventType {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_resolve_category() {
        let map = categories();
        let resolve = |value: serde_json::Value| {
            let event = raw_event(json!({"event_type": "e", "category": value}));
            resolve_category(event.category.as_ref(), &map)
        };

        assert_eq!(resolve(json!({"id": 9, "name": "Inline"})), "Inline");
        assert_eq!(resolve(json!({"id": 3})), "Checkout");
        assert_eq!(resolve(json!({"id": 3, "name": ""})), "Checkout");
        assert_eq!(resolve(json!(3)), "Checkout");
        assert_eq!(resolve(json!(44)), "44");
        assert_eq!(resolve(json!("Label")), "Label");
        assert_eq!(resolve(json!({})), "");
        assert_eq!(resolve(json!(null)), "");
    }

    #[test]
    fn test_normalize_event_defaults() {
        let event = raw_event(json!({"event_type": "signup", "owner": null}));
        let record = normalize_event(&event, &categories());

        assert_eq!(record.name, "signup");
        assert_eq!(record.owner, "");
        assert_eq!(record.activity, Activity::Deleted);
        assert_eq!(record.volume_180_days, 0);
        assert_eq!(record.first_seen, "");
    }

    #[test]
    fn test_normalize_property() {
        let property: RawEventProperty = serde_json::from_value(json!({
            "event_property": "plan",
            "type": "string",
            "is_required": true
        }))
        .unwrap();
        let record = normalize_property(&property);

        assert_eq!(record.name, "plan");
        assert_eq!(record.value_type, "string");
        assert!(record.required);
        assert!(!record.is_array);
        assert_eq!(record.schema_status, "");
    }
}
