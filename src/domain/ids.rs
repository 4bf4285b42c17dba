//! Source identifiers
//!
//! Newtype-style enums naming the data sources served by trackplan. Route
//! parameters and configuration keys are parsed into these rather than
//! passed around as bare strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One logical data source, each backed by at most one adapter
///
/// # Examples
///
/// ```
/// use trackplan::domain::ids::SourceKey;
/// use std::str::FromStr;
///
/// let key = SourceKey::from_str("gtm_server").unwrap();
/// assert_eq!(key, SourceKey::GtmServer);
/// assert_eq!(key.display_name(), "GTM server");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKey {
    Amplitude,
    Insider,
    GtmServer,
    GtmClient,
}

impl SourceKey {
    /// All sources in dashboard order
    pub const ALL: [SourceKey; 4] = [
        SourceKey::Amplitude,
        SourceKey::Insider,
        SourceKey::GtmServer,
        SourceKey::GtmClient,
    ];

    /// Returns the key as it appears in configuration and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKey::Amplitude => "amplitude",
            SourceKey::Insider => "insider",
            SourceKey::GtmServer => "gtm_server",
            SourceKey::GtmClient => "gtm_client",
        }
    }

    /// Human-readable label used in "data not available" messages
    pub fn display_name(&self) -> &'static str {
        match self {
            SourceKey::Amplitude => "Amplitude",
            SourceKey::Insider => "Insider",
            SourceKey::GtmServer => "GTM server",
            SourceKey::GtmClient => "GTM client",
        }
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "amplitude" => Ok(SourceKey::Amplitude),
            "insider" => Ok(SourceKey::Insider),
            "gtm_server" => Ok(SourceKey::GtmServer),
            "gtm_client" => Ok(SourceKey::GtmClient),
            other => Err(format!("Unknown source: {other}")),
        }
    }
}

/// GTM container selector as it appears in `/gtm/{container}` routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerSide {
    Server,
    Client,
}

impl ContainerSide {
    /// The source holding this container
    pub fn source_key(&self) -> SourceKey {
        match self {
            ContainerSide::Server => SourceKey::GtmServer,
            ContainerSide::Client => SourceKey::GtmClient,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerSide::Server => "server",
            ContainerSide::Client => "client",
        }
    }
}

impl FromStr for ContainerSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "server" => Ok(ContainerSide::Server),
            "client" => Ok(ContainerSide::Client),
            other => Err(format!("Unknown GTM container: {other}")),
        }
    }
}
