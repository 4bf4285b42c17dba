//! Usage-analytics acquisition
//!
//! [`UsageTaxonomy`] is the one read interface over the usage-analytics
//! source. Its mode is fixed at construction:
//!
//! - [`UsageTaxonomy::Live`] wraps the taxonomy API behind a time-bounded
//!   cache ([`LiveTaxonomy`])
//! - [`UsageTaxonomy::Export`] reads a static CSV export ([`ExportTaxonomy`])
//!
//! Both normalize into the same [`EventRecord`] and [`PropertyRecord`]
//! shapes, so the summaries in [`crate::core::aggregate::usage`] never
//! need to know which mode produced their input.
//!
//! [`PropertyRecord`]: crate::domain::PropertyRecord

pub mod clock;
pub mod export;
pub mod live;

pub use clock::{Clock, ManualClock, SystemClock};
pub use export::{ExportRow, ExportTaxonomy};
pub use live::{LiveOptions, LiveTaxonomy, Snapshot};

use crate::config::SourceMode;
use crate::core::aggregate::usage::{
    self, EventsSummary, PropertiesByEvent, PropertiesSummary, UsageOverview,
};
use crate::domain::{Category, EventRecord, Result, UniqueProperty};

/// `last_updated` reported in API mode
pub const LIVE_LABEL: &str = "Live";

/// `last_updated` reported in file mode
pub const EXPORT_LABEL: &str = "CSV snapshot";

/// Events and properties from a single read of the source
#[derive(Debug, Clone, PartialEq)]
pub struct UsageRecords {
    pub events: Vec<EventRecord>,
    pub properties_by_event: PropertiesByEvent,
    pub categories: Vec<Category>,
}

impl UsageRecords {
    pub fn events_summary(&self) -> EventsSummary {
        usage::events_summary(&self.events)
    }

    pub fn properties_summary(&self) -> PropertiesSummary {
        usage::properties_summary(&self.properties_by_event)
    }

    pub fn unique_properties(&self) -> Vec<UniqueProperty> {
        usage::unique_properties(&self.properties_by_event)
    }
}

/// The usage-analytics source in whichever mode it was built
pub enum UsageTaxonomy {
    Live(LiveTaxonomy),
    Export(ExportTaxonomy),
}

impl UsageTaxonomy {
    pub fn mode(&self) -> SourceMode {
        match self {
            UsageTaxonomy::Live(_) => SourceMode::Api,
            UsageTaxonomy::Export(_) => SourceMode::File,
        }
    }

    pub fn last_updated(&self) -> &'static str {
        match self {
            UsageTaxonomy::Live(_) => LIVE_LABEL,
            UsageTaxonomy::Export(_) => EXPORT_LABEL,
        }
    }

    /// Everything the summaries need, read consistently
    ///
    /// In API mode all three collections come from the same snapshot.
    pub async fn records(&self) -> Result<UsageRecords> {
        match self {
            UsageTaxonomy::Live(live) => {
                let snapshot = live.snapshot().await?;
                Ok(UsageRecords {
                    events: snapshot.events_list(),
                    properties_by_event: snapshot.properties_by_event(),
                    categories: snapshot.categories(),
                })
            }
            UsageTaxonomy::Export(export) => Ok(UsageRecords {
                events: export.events_list(),
                properties_by_event: export.properties_by_event(),
                categories: export.categories(),
            }),
        }
    }

    pub async fn events_list(&self) -> Result<Vec<EventRecord>> {
        match self {
            UsageTaxonomy::Live(live) => Ok(live.snapshot().await?.events_list()),
            UsageTaxonomy::Export(export) => Ok(export.events_list()),
        }
    }

    pub async fn properties_by_event(&self) -> Result<PropertiesByEvent> {
        match self {
            UsageTaxonomy::Live(live) => Ok(live.snapshot().await?.properties_by_event()),
            UsageTaxonomy::Export(export) => Ok(export.properties_by_event()),
        }
    }

    pub async fn categories(&self) -> Result<Vec<Category>> {
        match self {
            UsageTaxonomy::Live(live) => Ok(live.snapshot().await?.categories()),
            UsageTaxonomy::Export(export) => Ok(export.categories()),
        }
    }

    pub async fn events_summary(&self) -> Result<EventsSummary> {
        Ok(usage::events_summary(&self.events_list().await?))
    }

    pub async fn properties_summary(&self) -> Result<PropertiesSummary> {
        Ok(usage::properties_summary(&self.properties_by_event().await?))
    }

    pub async fn unique_properties_list(&self) -> Result<Vec<UniqueProperty>> {
        Ok(usage::unique_properties(&self.properties_by_event().await?))
    }

    pub async fn platform_overview(&self) -> Result<UsageOverview> {
        let records = self.records().await?;
        Ok(self.overview_of(&records))
    }

    /// Overview of records already read from this source
    pub fn overview_of(&self, records: &UsageRecords) -> UsageOverview {
        usage::platform_overview(
            &records.events_summary(),
            &records.properties_summary(),
            self.last_updated(),
        )
    }
}
