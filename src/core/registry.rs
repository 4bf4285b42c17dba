//! Source registry
//!
//! Builds every data source once at startup and holds them for the life
//! of the process. A source that cannot be built is recorded as absent
//! and reported as unavailable; it never aborts startup.

use crate::adapters::amplitude::{AmplitudeClient, RetryPolicy, TaxonomyApi};
use crate::adapters::readers::{read_json, read_json_list};
use crate::config::{AmplitudeConfig, SourceMode, TrackplanConfig};
use crate::core::acquisition::{
    ExportTaxonomy, LiveOptions, LiveTaxonomy, SystemClock, UsageTaxonomy,
};
use crate::domain::{ContainerSide, GtmExport, InsiderEvent, Result, SourceKey};
use crate::log_source_status;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Every data source, each present only if it could be built
#[derive(Default)]
pub struct SourceRegistry {
    amplitude: Option<UsageTaxonomy>,
    insider: Option<Vec<InsiderEvent>>,
    gtm_server: Option<GtmExport>,
    gtm_client: Option<GtmExport>,
}

impl SourceRegistry {
    pub fn new(
        amplitude: Option<UsageTaxonomy>,
        insider: Option<Vec<InsiderEvent>>,
        gtm_server: Option<GtmExport>,
        gtm_client: Option<GtmExport>,
    ) -> Self {
        Self {
            amplitude,
            insider,
            gtm_server,
            gtm_client,
        }
    }

    /// Builds every source from configuration
    ///
    /// The usage source is tried in API mode first when requested and
    /// falls back to the configured export. Failures are logged.
    pub async fn initialize(config: &TrackplanConfig) -> Self {
        let registry = Self {
            amplitude: init_usage_source(&config.amplitude).await,
            insider: loaded(SourceKey::Insider, read_json_list(&config.insider.path)),
            gtm_server: loaded(SourceKey::GtmServer, read_json(&config.gtm.server_path)),
            gtm_client: loaded(SourceKey::GtmClient, read_json(&config.gtm.client_path)),
        };
        registry.log_status();
        registry
    }

    pub fn amplitude(&self) -> Option<&UsageTaxonomy> {
        self.amplitude.as_ref()
    }

    pub fn insider(&self) -> Option<&[InsiderEvent]> {
        self.insider.as_deref()
    }

    pub fn gtm(&self, side: ContainerSide) -> Option<&GtmExport> {
        match side {
            ContainerSide::Server => self.gtm_server.as_ref(),
            ContainerSide::Client => self.gtm_client.as_ref(),
        }
    }

    pub fn is_available(&self, key: SourceKey) -> bool {
        match key {
            SourceKey::Amplitude => self.amplitude.is_some(),
            SourceKey::Insider => self.insider.is_some(),
            SourceKey::GtmServer => self.gtm_server.is_some(),
            SourceKey::GtmClient => self.gtm_client.is_some(),
        }
    }

    /// Availability of every source, keyed by source name
    pub fn status(&self) -> BTreeMap<&'static str, bool> {
        SourceKey::ALL
            .iter()
            .map(|key| (key.as_str(), self.is_available(*key)))
            .collect()
    }

    /// Mode label of an available source
    pub fn mode_of(&self, key: SourceKey) -> Option<String> {
        match key {
            SourceKey::Amplitude => self.amplitude.as_ref().map(|s| s.mode().to_string()),
            other if self.is_available(other) => Some(SourceMode::File.to_string()),
            _ => None,
        }
    }

    pub fn log_status(&self) {
        for key in SourceKey::ALL {
            let mode = self.mode_of(key).unwrap_or_default();
            log_source_status!(key, self.is_available(key), mode);
        }
    }
}

fn loaded<T>(key: SourceKey, result: Result<T>) -> Option<T> {
    match result {
        Ok(source) => Some(source),
        Err(e) => {
            tracing::error!(source = %key, error = %e, "Failed to load source");
            None
        }
    }
}

async fn init_usage_source(config: &AmplitudeConfig) -> Option<UsageTaxonomy> {
    if config.source_mode == SourceMode::Api {
        if config.credentials().is_none() {
            tracing::warn!("Amplitude API credentials missing, using the CSV export");
        } else {
            match connect_live(config).await {
                Ok(live) => return Some(UsageTaxonomy::Live(live)),
                Err(e) => {
                    tracing::warn!(error = %e, "Amplitude API unavailable, using the CSV export");
                }
            }
        }
    }

    match ExportTaxonomy::load(&config.export_path) {
        Ok(export) => Some(UsageTaxonomy::Export(export)),
        Err(e) => {
            tracing::error!(source = %SourceKey::Amplitude, error = %e, "Failed to load source");
            None
        }
    }
}

/// Connects in API mode, retrying transient failures
///
/// Up to `startup_attempts` attempts are made, backing off between them
/// like the client does. Non-transient errors (bad credentials, rejected
/// requests) are returned at once.
async fn connect_live(config: &AmplitudeConfig) -> Result<LiveTaxonomy> {
    let api: Arc<dyn TaxonomyApi> = Arc::new(AmplitudeClient::new(config)?);
    let policy = RetryPolicy::from_config(&config.retry);
    let options = LiveOptions::from_config(config);
    let mut attempt = 1;

    loop {
        match LiveTaxonomy::connect(api.clone(), options.clone(), Arc::new(SystemClock)).await {
            Ok(live) => {
                tracing::info!(base_url = %api.base_url(), attempt, "Connected to Amplitude API");
                return Ok(live);
            }
            Err(e) if e.is_transient() && attempt < config.startup_attempts => {
                let delay = policy.backoff(attempt);
                tracing::warn!(
                    attempt,
                    startup_attempts = config.startup_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Amplitude API connection failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
