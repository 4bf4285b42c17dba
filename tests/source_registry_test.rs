//! Integration tests for building sources from configuration

use std::io::Write;
use tempfile::NamedTempFile;
use trackplan::config::{secret_string, SourceMode, TrackplanConfig};
use trackplan::core::acquisition::UsageTaxonomy;
use trackplan::core::registry::SourceRegistry;
use trackplan::domain::SourceKey;

fn export_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Object Type,Object Name,Event Activity").unwrap();
    writeln!(file, "Event,signup,ACTIVE").unwrap();
    writeln!(file, "Event,purchase,ACTIVE").unwrap();
    file.flush().unwrap();
    file
}

fn api_config(export: &NamedTempFile, base_url: &str) -> TrackplanConfig {
    let mut config = TrackplanConfig::default();
    config.amplitude.source_mode = SourceMode::Api;
    config.amplitude.api_key = Some(secret_string("key".to_string()));
    config.amplitude.secret_key = Some(secret_string("secret".to_string()));
    config.amplitude.base_url = Some(base_url.to_string());
    config.amplitude.export_path = export.path().display().to_string();
    config.amplitude.retry.max_retries = 0;
    config.amplitude.retry.backoff_factor_ms = 0;
    config.insider.path = "/nonexistent/insider.json".to_string();
    config.gtm.server_path = "/nonexistent/server.json".to_string();
    config.gtm.client_path = "/nonexistent/client.json".to_string();
    config
}

#[tokio::test]
async fn test_missing_credentials_serve_csv_snapshot() {
    let export = export_file();
    let mut config = api_config(&export, "http://127.0.0.1:1");
    config.amplitude.api_key = None;
    config.amplitude.secret_key = None;

    let sources = SourceRegistry::initialize(&config).await;
    let usage = sources.amplitude().unwrap();
    assert!(matches!(usage, UsageTaxonomy::Export(_)));

    let overview = usage.platform_overview().await.unwrap();
    assert_eq!(overview.last_updated, "CSV snapshot");
    assert_eq!(overview.total_events, 2);
}

#[tokio::test]
async fn test_api_mode_connects() {
    let mut server = mockito::Server::new_async().await;
    let events = server
        .mock("GET", "/taxonomy/event")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"success": true, "data": [
                {"event_type": "signup", "category": {"id": 7}, "is_active": true}
            ]}"#,
        )
        .expect(1)
        .create_async()
        .await;
    let _categories = server
        .mock("GET", "/taxonomy/category")
        .with_status(200)
        .with_body(r#"{"success": true, "data": [{"id": 7, "name": "Onboarding"}]}"#)
        .create_async()
        .await;
    let _properties = server
        .mock("GET", "/taxonomy/event-property")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#"{"success": true, "data": [{"event_property": "plan", "type": "string"}]}"#)
        .create_async()
        .await;

    let export = export_file();
    let sources = SourceRegistry::initialize(&api_config(&export, &server.url())).await;
    let usage = sources.amplitude().unwrap();
    assert!(matches!(usage, UsageTaxonomy::Live(_)));
    assert_eq!(sources.mode_of(SourceKey::Amplitude).as_deref(), Some("api"));

    let listed = usage.events_list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].category, "Onboarding");

    let overview = usage.platform_overview().await.unwrap();
    assert_eq!(overview.last_updated, "Live");
    assert_eq!(overview.unique_properties, 1);

    // Served from the cached snapshot
    events.assert_async().await;
}

#[tokio::test]
async fn test_rejected_credentials_fall_back() {
    let mut server = mockito::Server::new_async().await;
    let _events = server
        .mock("GET", "/taxonomy/event")
        .match_query(mockito::Matcher::Any)
        .with_status(401)
        .with_body(r#"{"error": "Invalid API key"}"#)
        .expect(1)
        .create_async()
        .await;

    let export = export_file();
    let sources = SourceRegistry::initialize(&api_config(&export, &server.url())).await;
    let usage = sources.amplitude().unwrap();
    assert!(matches!(usage, UsageTaxonomy::Export(_)));
    assert_eq!(usage.platform_overview().await.unwrap().total_events, 2);
}

#[tokio::test]
async fn test_fallback_failure_leaves_source_absent() {
    let export = export_file();
    let mut config = api_config(&export, "http://127.0.0.1:1");
    config.amplitude.export_path = "/nonexistent/events.csv".to_string();

    let sources = SourceRegistry::initialize(&config).await;
    assert!(sources.amplitude().is_none());
    assert!(!sources.is_available(SourceKey::Amplitude));
    assert_eq!(sources.status().values().filter(|ready| **ready).count(), 0);
}
