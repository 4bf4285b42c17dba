//! HTTP client for the Amplitude taxonomy API

use super::api::TaxonomyApi;
use super::models::{parse_envelope, parse_records, RawCategory, RawEventProperty, RawEventType};
use super::retry::{RetryPolicy, Sleeper, TokioSleeper};
use crate::config::{secret_string, AmplitudeConfig, SecretString};
use crate::domain::{ApiError, Result, TrackplanError};
use crate::log_retry_attempt;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Client, Response};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Authenticated client for `/taxonomy/*` resources
///
/// Every call is a GET carrying HTTP Basic credentials built from the
/// project's API key and secret key.
///
/// # Example
///
/// ```no_run
/// use trackplan::adapters::amplitude::{AmplitudeClient, TaxonomyApi};
/// use trackplan::config::{secret_string, AmplitudeConfig};
///
/// # async fn example() -> trackplan::domain::Result<()> {
/// let config = AmplitudeConfig {
///     api_key: Some(secret_string("api-key".to_string())),
///     secret_key: Some(secret_string("secret-key".to_string())),
///     ..Default::default()
/// };
///
/// let client = AmplitudeClient::new(&config)?;
/// let events = client.get_events(true).await?;
/// # Ok(())
/// # }
/// ```
pub struct AmplitudeClient {
    base_url: String,
    http: Client,
    auth_header: SecretString,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl AmplitudeClient {
    /// Builds a client from the usage-source configuration
    ///
    /// # Errors
    ///
    /// Returns [`TrackplanError::Configuration`] when either key is missing
    /// or the HTTP client cannot be built.
    pub fn new(config: &AmplitudeConfig) -> Result<Self> {
        let (api_key, secret_key) = config.credentials().ok_or_else(|| {
            TrackplanError::Configuration(
                "amplitude.api_key and amplitude.secret_key are required in api mode".to_string(),
            )
        })?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                TrackplanError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        let credentials = format!(
            "{}:{}",
            api_key.expose_secret().as_ref(),
            secret_key.expose_secret().as_ref()
        );
        let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());

        Ok(Self {
            base_url: config.resolved_base_url(),
            http,
            auth_header: secret_string(format!("Basic {encoded}")),
            policy: RetryPolicy::from_config(&config.retry),
            sleeper: Arc::new(TokioSleeper),
        })
    }

    /// Replaces the pause used between attempts
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.policy
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path)).map_err(|e| {
            TrackplanError::Configuration(format!("Invalid taxonomy URL {}{path}: {e}", self.base_url))
        })?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Sends a GET with bounded retry and unwraps the response envelope
    ///
    /// The initial request is followed by at most `max_retries` retries.
    /// A 429 waits for `Retry-After`; other retryable statuses and transport
    /// failures back off exponentially. The last response is returned as-is
    /// once retries are exhausted.
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        let url = self.endpoint(path, query)?;
        let max_retries = self.policy.max_retries;
        let mut retry = 0usize;

        loop {
            tracing::debug!(url = %url, retry, "Sending taxonomy request");

            let outcome = self
                .http
                .get(url.clone())
                .header(AUTHORIZATION, self.auth_header.expose_secret().as_ref())
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .send()
                .await;

            let (delay, reason) = match outcome {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if !RetryPolicy::is_retryable_status(status) || retry >= max_retries {
                        return read_envelope(response).await;
                    }
                    let delay = if status == 429 {
                        let header = response
                            .headers()
                            .get(RETRY_AFTER)
                            .and_then(|value| value.to_str().ok());
                        self.policy.retry_after(header)
                    } else {
                        self.policy.backoff(retry + 1)
                    };
                    (delay, format!("status {status}"))
                }
                Err(e) => {
                    if retry >= max_retries {
                        return Err(ApiError::Transport(e.to_string()).into());
                    }
                    (self.policy.backoff(retry + 1), e.to_string())
                }
            };

            retry += 1;
            log_retry_attempt!(retry, max_retries, delay, reason);
            self.sleeper.sleep(delay).await;
        }
    }
}

async fn read_envelope(response: Response) -> Result<Value> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;

    if !status.is_success() {
        return Err(ApiError::Upstream {
            status: status.as_u16(),
            message: body,
        }
        .into());
    }

    Ok(parse_envelope(status.as_u16(), &body)?)
}

#[async_trait]
impl TaxonomyApi for AmplitudeClient {
    async fn get_events(&self, show_deleted: bool) -> Result<Vec<RawEventType>> {
        let query: &[(&str, &str)] = if show_deleted {
            &[("showDeleted", "true")]
        } else {
            &[]
        };
        let data = self.get("/taxonomy/event", query).await?;
        Ok(parse_records(data, "event")?)
    }

    async fn get_event_properties(&self, event_type: &str) -> Result<Vec<RawEventProperty>> {
        let data = self
            .get("/taxonomy/event-property", &[("event_type", event_type)])
            .await?;
        Ok(parse_records(data, "event property")?)
    }

    async fn get_categories(&self) -> Result<Vec<RawCategory>> {
        let data = self.get("/taxonomy/category", &[]).await?;
        Ok(parse_records(data, "category")?)
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Failures are logged, not returned
    async fn health_check(&self) -> bool {
        match self.get_categories().await {
            Ok(categories) => {
                tracing::info!(
                    base_url = %self.base_url,
                    categories = categories.len(),
                    "Taxonomy API health check passed"
                );
                true
            }
            Err(e) => {
                tracing::error!(
                    base_url = %self.base_url,
                    error = %e,
                    "Taxonomy API health check failed"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSleeper {
        sleeps: Mutex<Vec<Duration>>,
    }

    impl RecordingSleeper {
        fn recorded(&self) -> Vec<Duration> {
            self.sleeps.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.sleeps.lock().unwrap().push(duration);
        }
    }

    fn config_for(base_url: &str) -> AmplitudeConfig {
        AmplitudeConfig {
            api_key: Some(secret_string("key".to_string())),
            secret_key: Some(secret_string("secret".to_string())),
            base_url: Some(base_url.to_string()),
            ..Default::default()
        }
    }

    fn client_for(base_url: &str) -> (AmplitudeClient, Arc<RecordingSleeper>) {
        let sleeper = Arc::new(RecordingSleeper::default());
        let client = AmplitudeClient::new(&config_for(base_url))
            .unwrap()
            .with_sleeper(sleeper.clone());
        (client, sleeper)
    }

    #[test]
    fn test_new_requires_credentials() {
        let config = AmplitudeConfig {
            api_key: Some(secret_string("key".to_string())),
            ..Default::default()
        };
        let result = AmplitudeClient::new(&config);
        assert!(matches!(result, Err(TrackplanError::Configuration(_))));
    }

    #[test]
    fn test_region_selects_base_url() {
        let mut config = config_for("https://example.invalid");
        config.base_url = None;
        config.region = "eu".to_string();
        let client = AmplitudeClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "https://analytics.eu.amplitude.com/api/2");
    }

    #[tokio::test]
    async fn test_get_categories_sends_basic_auth() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/taxonomy/category")
            .match_header("authorization", "Basic a2V5OnNlY3JldA==")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success": true, "data": [{"id": 1, "name": "Checkout"}]}"#)
            .expect(1)
            .create_async()
            .await;

        let (client, sleeper) = client_for(&server.url());
        let categories = client.get_categories().await.unwrap();

        mock.assert_async().await;
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name.as_deref(), Some("Checkout"));
        assert!(sleeper.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_get_events_show_deleted_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/taxonomy/event")
            .match_query(Matcher::UrlEncoded("showDeleted".into(), "true".into()))
            .with_status(200)
            .with_body(r#"{"success": true, "data": [{"event_type": "signup", "is_active": false}]}"#)
            .expect(1)
            .create_async()
            .await;

        let (client, _) = client_for(&server.url());
        let events = client.get_events(true).await.unwrap();

        mock.assert_async().await;
        assert_eq!(events[0].name(), "signup");
        assert_eq!(events[0].is_active, Some(false));
    }

    #[tokio::test]
    async fn test_get_event_properties_encodes_event_type() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/taxonomy/event-property")
            .match_query(Matcher::UrlEncoded(
                "event_type".into(),
                "Order Completed".into(),
            ))
            .with_status(200)
            .with_body(r#"{"success": true, "data": [{"event_property": "total", "type": "number"}]}"#)
            .expect(1)
            .create_async()
            .await;

        let (client, _) = client_for(&server.url());
        let properties = client.get_event_properties("Order Completed").await.unwrap();

        mock.assert_async().await;
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0].value_type.as_deref(), Some("number"));
    }

    #[tokio::test]
    async fn test_rate_limit_retries_are_bounded() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/taxonomy/category")
            .with_status(429)
            .with_header("retry-after", "2")
            .with_body("Too many requests")
            .expect(4)
            .create_async()
            .await;

        let (client, sleeper) = client_for(&server.url());
        let err = client.get_categories().await.unwrap_err();

        mock.assert_async().await;
        assert_eq!(sleeper.recorded(), vec![Duration::from_secs(2); 3]);
        match err {
            TrackplanError::Api(ApiError::Upstream { status, message }) => {
                assert_eq!(status, 429);
                assert_eq!(message, "Too many requests");
            }
            other => panic!("Expected rate limit error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rate_limit_without_retry_after_uses_default() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/taxonomy/category")
            .with_status(429)
            .expect(4)
            .create_async()
            .await;

        let (client, sleeper) = client_for(&server.url());
        let _ = client.get_categories().await;

        assert_eq!(sleeper.recorded(), vec![Duration::from_secs(5); 3]);
    }

    #[tokio::test]
    async fn test_long_retry_after_is_capped() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/taxonomy/category")
            .with_status(429)
            .with_header("retry-after", "86400")
            .expect(4)
            .create_async()
            .await;

        let (client, sleeper) = client_for(&server.url());
        let _ = client.get_categories().await;

        assert_eq!(sleeper.recorded(), vec![Duration::from_secs(60); 3]);
    }

    #[tokio::test]
    async fn test_server_errors_back_off_exponentially() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/taxonomy/category")
            .with_status(503)
            .with_body("unavailable")
            .expect(4)
            .create_async()
            .await;

        let (client, sleeper) = client_for(&server.url());
        let err = client.get_categories().await.unwrap_err();

        mock.assert_async().await;
        assert_eq!(
            sleeper.recorded(),
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4)
            ]
        );
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/taxonomy/category")
            .with_status(401)
            .with_body("Invalid API key")
            .expect(1)
            .create_async()
            .await;

        let (client, sleeper) = client_for(&server.url());
        let err = client.get_categories().await.unwrap_err();

        mock.assert_async().await;
        assert!(sleeper.recorded().is_empty());
        assert_eq!(
            err.to_string(),
            "Taxonomy API error: Amplitude API 401: Invalid API key"
        );
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_unsuccessful_envelope() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/taxonomy/event")
            .with_status(200)
            .with_body(r#"{"success": false, "errors": [{"message": "Invalid event"}]}"#)
            .create_async()
            .await;

        let (client, _) = client_for(&server.url());
        let err = client.get_events(false).await.unwrap_err();

        match err {
            TrackplanError::Api(ApiError::Upstream { status, message }) => {
                assert_eq!(status, 200);
                assert_eq!(message, "Invalid event");
            }
            other => panic!("Expected envelope error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transport_errors_are_retried() {
        // Nothing listens on port 1
        let (client, sleeper) = client_for("http://127.0.0.1:1");
        let err = client.get_categories().await.unwrap_err();

        assert_eq!(sleeper.recorded().len(), 3);
        assert!(matches!(err, TrackplanError::Api(ApiError::Transport(_))));
    }

    #[tokio::test]
    async fn test_health_check() {
        let mut server = mockito::Server::new_async().await;
        let _ok = server
            .mock("GET", "/taxonomy/category")
            .with_status(200)
            .with_body(r#"{"success": true, "data": []}"#)
            .create_async()
            .await;

        let (client, _) = client_for(&server.url());
        assert!(client.health_check().await);

        let (unreachable, _) = client_for("http://127.0.0.1:1");
        assert!(!unreachable.health_check().await);
    }
}
