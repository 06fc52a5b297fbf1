// # IP List Synchronizer
//
// Produces an up-to-date `IpAddressesRecord` from the CIS "list IP
// addresses" API.
//
// ## Refresh Flow
//
// ```text
// Idle ──refresh──▶ acquire client ──▶ list_ips ──▶ Populated
//                        │                 │
//                        ▼                 ▼
//                      Failed            Failed
// ```
//
// Every refresh starts from `Idle`; nothing is carried between calls.
//
// ## Constraints
//
// - One remote call per refresh, no retry, no backoff (caller reschedules)
// - The record is only written after the call succeeded
// - Exactly one log line, and only when the list call fails
// - The session is borrowed, never created or torn down here

mod id;

use async_trait::async_trait;

use crate::config::{Ipv6Mapping, SyncConfig};
use crate::error::{Error, Result};
use crate::record::{ATTR_IPV4_CIDRS, ATTR_IPV6_CIDRS, IpAddressesRecord};
use crate::schema::{Attribute, AttributeKind, Schema};
use crate::traits::{ClientSession, DataSource, IpsResult, ListIpsOptions};

/// Name the IP address data source is registered under
pub const CIS_IP_ADDRESSES: &str = "ibm_cis_ip_addresses";

/// Refreshes an `IpAddressesRecord` from the CIS IP API
///
/// # Example
///
/// ```rust,ignore
/// use cisip_core::{IpAddressesRecord, IpListSynchronizer};
///
/// let synchronizer = IpListSynchronizer::new();
/// let mut record = IpAddressesRecord::new();
/// synchronizer.refresh(&session, &mut record).await?;
/// println!("{:?}", record.ipv4_cidrs());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct IpListSynchronizer {
    config: SyncConfig,
}

impl IpListSynchronizer {
    /// Create a synchronizer that reproduces the existing data source
    ///
    /// `ipv6_cidrs` is filled from the IPv4 list. Use [`Self::corrected`]
    /// for the IPv6 list.
    pub fn new() -> Self {
        Self::with_config(SyncConfig::compatible())
    }

    /// Create a synchronizer that fills `ipv6_cidrs` from the IPv6 list
    pub fn corrected() -> Self {
        Self::with_config(SyncConfig::corrected())
    }

    /// Create a synchronizer with explicit settings
    pub fn with_config(config: SyncConfig) -> Self {
        Self { config }
    }

    /// Current settings
    pub fn config(&self) -> SyncConfig {
        self.config
    }

    /// Refresh `record` from the remote service
    ///
    /// # Errors
    ///
    /// - [`Error::ClientAcquisition`]: the session could not produce a client
    /// - [`Error::RemoteRequest`]: the list call failed; the raw response is
    ///   logged before the error is returned
    ///
    /// On error `record` is left untouched.
    pub async fn refresh<S>(&self, session: &S, record: &mut IpAddressesRecord) -> Result<()>
    where
        S: ClientSession + ?Sized,
    {
        let client = session.cis_ip_client_session().map_err(|e| match e {
            Error::ClientAcquisition(_) => e,
            other => Error::client_acquisition(other.to_string()),
        })?;

        let options = ListIpsOptions::new();
        let (result, _response) = match client.list_ips(&options).await {
            Ok(ok) => ok,
            Err(e) => {
                let e = into_remote_request(e);
                match e.response() {
                    Some(response) => {
                        tracing::debug!("Error listing IP addresses: {}", response)
                    }
                    None => tracing::debug!("Error listing IP addresses: {}", e),
                }
                return Err(e);
            }
        };

        let IpsResult {
            ipv4_cidrs,
            ipv6_cidrs,
        } = result;
        let ipv6_cidrs = match self.config.ipv6_mapping {
            Ipv6Mapping::MirrorIpv4 => ipv4_cidrs.clone(),
            Ipv6Mapping::FromIpv6 => ipv6_cidrs,
        };

        let id = id::generate(self.config.id_strategy);
        record.replace(id, ipv4_cidrs, ipv6_cidrs);
        Ok(())
    }
}

fn into_remote_request(err: Error) -> Error {
    match err {
        Error::RemoteRequest { .. } => err,
        other => Error::remote_request(other.to_string(), None),
    }
}

/// The `ibm_cis_ip_addresses` data source
#[derive(Debug, Clone, Copy, Default)]
pub struct CisIpAddressesDataSource {
    synchronizer: IpListSynchronizer,
}

impl CisIpAddressesDataSource {
    /// Create the data source with compatible refresh behavior
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the data source with explicit refresh behavior
    pub fn with_config(config: SyncConfig) -> Self {
        Self {
            synchronizer: IpListSynchronizer::with_config(config),
        }
    }
}

#[async_trait]
impl DataSource for CisIpAddressesDataSource {
    fn name(&self) -> &'static str {
        CIS_IP_ADDRESSES
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .with_attribute(Attribute::computed(
                ATTR_IPV4_CIDRS,
                AttributeKind::ListOfString,
                "IPv4 networks",
            ))
            .with_attribute(Attribute::computed(
                ATTR_IPV6_CIDRS,
                AttributeKind::ListOfString,
                "IPv6 networks",
            ))
    }

    async fn read(&self, session: &dyn ClientSession, record: &mut IpAddressesRecord) -> Result<()> {
        self.synchronizer.refresh(session, record).await
    }
}
