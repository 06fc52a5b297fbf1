// # IP List Client Trait
//
// The outbound contract to the remote "list IP addresses" API.
//
// ## API Reference
//
// - List IPs: GET `/v1/ips`
//
// ```json
// {
//   "success": true,
//   "errors": [],
//   "messages": [],
//   "result": {
//     "ipv4_cidrs": ["173.245.48.0/20"],
//     "ipv6_cidrs": ["2400:cb00::/32"]
//   }
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DetailedResponse;

/// Options for the list call
///
/// The API takes no parameters; the value exists so the call shape matches
/// the rest of the service clients.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListIpsOptions {}

impl ListIpsOptions {
    /// Create an empty option set
    pub fn new() -> Self {
        Self::default()
    }
}

/// IP ranges returned by the service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpsResult {
    /// IPv4 CIDR blocks, in service order
    #[serde(default)]
    pub ipv4_cidrs: Vec<String>,
    /// IPv6 CIDR blocks, in service order
    #[serde(default)]
    pub ipv6_cidrs: Vec<String>,
}

impl IpsResult {
    /// Create a result from the two CIDR lists
    pub fn new(ipv4_cidrs: Vec<String>, ipv6_cidrs: Vec<String>) -> Self {
        Self {
            ipv4_cidrs,
            ipv6_cidrs,
        }
    }
}

/// Trait for clients of the CIS IP API
///
/// # Trust Level: Untrusted
///
/// Clients perform exactly one API call per invocation. They must not retry,
/// back off, or cache; a failure is returned and the caller decides whether
/// to try again on a later pass. Transport timeouts are owned by the client.
#[async_trait]
pub trait IpListClient: Send + Sync {
    /// List the IP ranges used by the CIS edge network
    ///
    /// # Returns
    ///
    /// - `Ok((IpsResult, DetailedResponse))`: Decoded result plus the raw response
    /// - `Err(Error)`: Transport or API failure, ideally
    ///   [`crate::Error::RemoteRequest`] with the raw response attached
    async fn list_ips(
        &self,
        options: &ListIpsOptions,
    ) -> Result<(IpsResult, DetailedResponse), crate::Error>;
}
