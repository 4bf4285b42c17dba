//! Integration tests for the cached API-mode taxonomy

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use trackplan::adapters::amplitude::{RawCategory, RawEventProperty, RawEventType, TaxonomyApi};
use trackplan::core::acquisition::{LiveOptions, LiveTaxonomy, ManualClock, UsageTaxonomy};
use trackplan::domain::{ApiError, Result, TrackplanError};

const TTL: Duration = Duration::from_secs(900);

/// Fake API counting event-list fetches; properties of `failing` error out
struct CountingApi {
    events: Vec<&'static str>,
    failing: Option<&'static str>,
    event_calls: AtomicUsize,
    property_calls: AtomicUsize,
}

impl CountingApi {
    fn new(events: Vec<&'static str>, failing: Option<&'static str>) -> Self {
        Self {
            events,
            failing,
            event_calls: AtomicUsize::new(0),
            property_calls: AtomicUsize::new(0),
        }
    }

    fn event_calls(&self) -> usize {
        self.event_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TaxonomyApi for CountingApi {
    async fn get_events(&self, _show_deleted: bool) -> Result<Vec<RawEventType>> {
        self.event_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .events
            .iter()
            .map(|name| RawEventType {
                event_type: Some(name.to_string()),
                is_active: Some(true),
                ..Default::default()
            })
            .collect())
    }

    async fn get_event_properties(&self, event_type: &str) -> Result<Vec<RawEventProperty>> {
        self.property_calls.fetch_add(1, Ordering::SeqCst);
        if Some(event_type) == self.failing {
            return Err(TrackplanError::Api(ApiError::Upstream {
                status: 500,
                message: "Internal Server Error".to_string(),
            }));
        }
        Ok(vec![RawEventProperty {
            event_property: Some(format!("{event_type}_id")),
            value_type: Some("string".to_string()),
            ..Default::default()
        }])
    }

    async fn get_categories(&self) -> Result<Vec<RawCategory>> {
        Ok(Vec::new())
    }

    fn base_url(&self) -> &str {
        "http://counting.test"
    }
}

async fn connect(api: Arc<CountingApi>, clock: Arc<ManualClock>) -> LiveTaxonomy {
    let options = LiveOptions {
        cache_ttl: TTL,
        property_concurrency: 4,
    };
    LiveTaxonomy::connect(api, options, clock).await.unwrap()
}

#[tokio::test]
async fn test_snapshot_reused_within_ttl() {
    let api = Arc::new(CountingApi::new(vec!["signup", "purchase"], None));
    let clock = Arc::new(ManualClock::new());
    let live = connect(api.clone(), clock.clone()).await;
    assert_eq!(api.event_calls(), 1);

    clock.advance(TTL - Duration::from_secs(1));
    live.snapshot().await.unwrap();
    assert_eq!(api.event_calls(), 1);

    clock.advance(Duration::from_secs(2));
    live.snapshot().await.unwrap();
    assert_eq!(api.event_calls(), 2);

    // The refetched snapshot is fresh again
    live.snapshot().await.unwrap();
    assert_eq!(api.event_calls(), 2);
}

#[tokio::test]
async fn test_concurrent_stale_readers_share_one_refetch() {
    let api = Arc::new(CountingApi::new(vec!["signup"], None));
    let clock = Arc::new(ManualClock::new());
    let live = Arc::new(connect(api.clone(), clock.clone()).await);

    clock.advance(TTL + Duration::from_secs(1));

    let readers: Vec<_> = (0..8)
        .map(|_| {
            let live = live.clone();
            tokio::spawn(async move { live.snapshot().await.map(|s| s.events.len()) })
        })
        .collect();

    for reader in futures::future::join_all(readers).await {
        assert_eq!(reader.unwrap().unwrap(), 1);
    }
    assert_eq!(api.event_calls(), 2);
}

#[tokio::test]
async fn test_one_failing_property_fetch_is_isolated() {
    let api = Arc::new(CountingApi::new(
        vec!["signup", "purchase", "logout", "search"],
        Some("logout"),
    ));
    let clock = Arc::new(ManualClock::new());
    let usage = UsageTaxonomy::Live(connect(api.clone(), clock).await);

    let events = usage.events_list().await.unwrap();
    assert_eq!(events.len(), 4);

    let properties = usage.properties_by_event().await.unwrap();
    assert_eq!(properties.len(), 4);
    assert!(properties["logout"].is_empty());
    for name in ["signup", "purchase", "search"] {
        assert_eq!(properties[name].len(), 1);
        assert_eq!(properties[name][0].name, format!("{name}_id"));
    }
    assert_eq!(api.property_calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_duplicate_event_names_fetch_properties_once() {
    let api = Arc::new(CountingApi::new(vec!["signup", "signup", ""], None));
    let clock = Arc::new(ManualClock::new());
    let live = connect(api.clone(), clock).await;

    let snapshot = live.snapshot().await.unwrap();
    assert_eq!(snapshot.events.len(), 3);
    assert_eq!(api.property_calls.load(Ordering::SeqCst), 1);
}
