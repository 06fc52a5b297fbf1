//! Configuration types for the CIS IP data source
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};

/// Public CIS API endpoint
pub const DEFAULT_CIS_ENDPOINT: &str = "https://api.cis.cloud.ibm.com";

/// Environment variable overriding the CIS API endpoint
pub const CIS_ENDPOINT_ENV: &str = "IBMCLOUD_CIS_API_ENDPOINT";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CisipConfig {
    /// Session/client configuration
    pub cis: CisConfig,

    /// Refresh behavior
    #[serde(default)]
    pub sync: SyncConfig,

    /// Where refreshed records are kept
    #[serde(default)]
    pub store: RecordStoreConfig,
}

impl CisipConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.cis.validate()?;
        self.store.validate()?;
        Ok(())
    }
}

/// Endpoint visibility requested for the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Public endpoints
    #[default]
    Public,
    /// Private endpoints (not offered by CIS)
    Private,
    /// Public and private endpoints; CIS uses the public one
    #[serde(rename = "public-and-private")]
    PublicAndPrivate,
}

/// CIS session configuration
///
/// An empty token is accepted here. The session reports it as an
/// acquisition error when a client is requested.
#[derive(Clone, Serialize, Deserialize)]
pub struct CisConfig {
    /// IAM bearer token
    /// ⚠️ NEVER log this value
    #[serde(default, skip_serializing)]
    pub iam_token: String,

    /// API endpoint override (defaults to [`DEFAULT_CIS_ENDPOINT`])
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Endpoint visibility
    #[serde(default)]
    pub visibility: Visibility,

    /// HTTP timeout for API requests (in seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// Custom Debug implementation that hides the token
impl std::fmt::Debug for CisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CisConfig")
            .field("iam_token", &"<REDACTED>")
            .field("endpoint", &self.endpoint)
            .field("visibility", &self.visibility)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl CisConfig {
    /// Create a configuration for the public endpoint
    pub fn new(iam_token: impl Into<String>) -> Self {
        Self {
            iam_token: iam_token.into(),
            endpoint: None,
            visibility: Visibility::Public,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Set an explicit endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the endpoint visibility
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Endpoint to use: explicit setting, else the environment, else the default
    pub fn resolved_endpoint(&self) -> String {
        self.endpoint
            .clone()
            .filter(|e| !e.is_empty())
            .or_else(|| std::env::var(CIS_ENDPOINT_ENV).ok().filter(|e| !e.is_empty()))
            .unwrap_or_else(|| DEFAULT_CIS_ENDPOINT.to_string())
    }

    /// Validate the session configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if let Some(ref endpoint) = self.endpoint
            && !endpoint.starts_with("https://")
            && !endpoint.starts_with("http://")
        {
            return Err(crate::Error::config(format!(
                "CIS endpoint must use HTTP or HTTPS scheme. Got: {}",
                endpoint
            )));
        }

        if self.timeout_secs == 0 {
            return Err(crate::Error::config("CIS HTTP timeout must be > 0"));
        }

        Ok(())
    }
}

impl Default for CisConfig {
    fn default() -> Self {
        Self::new(String::new())
    }
}

/// Source of the `ipv6_cidrs` attribute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ipv6Mapping {
    /// Copy the IPv4 list into `ipv6_cidrs`
    ///
    /// This is what the existing data source does. It is a known defect,
    /// kept as the default so refreshed state stays identical.
    #[default]
    MirrorIpv4,
    /// Copy the IPv6 list into `ipv6_cidrs`
    FromIpv6,
}

/// How record identifiers are generated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// UTC wall clock, e.g. `2024-01-09 12:00:00.123456789 +0000 UTC`
    ///
    /// Not collision-proof under rapid refreshes or clock skew.
    #[default]
    Timestamp,
    /// Wall clock nanoseconds plus a process-wide counter, never repeats
    Monotonic,
}

/// Refresh behavior
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Source of the `ipv6_cidrs` attribute
    #[serde(default)]
    pub ipv6_mapping: Ipv6Mapping,

    /// Record identifier generation
    #[serde(default)]
    pub id_strategy: IdStrategy,
}

impl SyncConfig {
    /// Settings that reproduce the existing data source exactly
    pub fn compatible() -> Self {
        Self::default()
    }

    /// Settings with the IPv6 mapping fixed
    pub fn corrected() -> Self {
        Self {
            ipv6_mapping: Ipv6Mapping::FromIpv6,
            id_strategy: IdStrategy::Timestamp,
        }
    }

    /// Set the identifier strategy
    pub fn with_id_strategy(mut self, id_strategy: IdStrategy) -> Self {
        self.id_strategy = id_strategy;
        self
    }
}

/// Record store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecordStoreConfig {
    /// File-based record store
    File {
        /// Path to the record file
        path: String,
    },

    /// In-memory record store (not persistent)
    #[default]
    Memory,
}

impl RecordStoreConfig {
    /// Validate the record store configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            RecordStoreConfig::File { path } if path.is_empty() => {
                Err(crate::Error::config("Record store path cannot be empty"))
            }
            _ => Ok(()),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}
