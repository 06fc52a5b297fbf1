//! The record exposed by the IP address data source

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attribute name for the IPv4 ranges
pub const ATTR_IPV4_CIDRS: &str = "ipv4_cidrs";

/// Attribute name for the IPv6 ranges
pub const ATTR_IPV6_CIDRS: &str = "ipv6_cidrs";

/// Local representation of the CIS IP ranges
///
/// Every field is computed. A record starts empty and is only ever replaced
/// as a whole by a successful refresh; callers can read it but not set it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpAddressesRecord {
    id: String,
    #[serde(default)]
    ipv4_cidrs: Vec<String>,
    #[serde(default)]
    ipv6_cidrs: Vec<String>,
}

impl IpAddressesRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Opaque identifier, regenerated on every refresh
    pub fn id(&self) -> &str {
        &self.id
    }

    /// IPv4 CIDR blocks
    pub fn ipv4_cidrs(&self) -> &[String] {
        &self.ipv4_cidrs
    }

    /// IPv6 CIDR blocks
    pub fn ipv6_cidrs(&self) -> &[String] {
        &self.ipv6_cidrs
    }

    /// Whether the record has never been populated
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }

    /// Overwrite every field at once
    pub(crate) fn replace(&mut self, id: String, ipv4_cidrs: Vec<String>, ipv6_cidrs: Vec<String>) {
        *self = Self {
            id,
            ipv4_cidrs,
            ipv6_cidrs,
        };
    }

    /// Attribute view of the record, keyed by schema attribute name
    ///
    /// Empty lists stay empty arrays, never null.
    pub fn attributes(&self) -> Map<String, Value> {
        let mut attrs = Map::new();
        attrs.insert(ATTR_IPV4_CIDRS.to_string(), string_list(&self.ipv4_cidrs));
        attrs.insert(ATTR_IPV6_CIDRS.to_string(), string_list(&self.ipv6_cidrs));
        attrs
    }
}

fn string_list(items: &[String]) -> Value {
    Value::Array(items.iter().cloned().map(Value::String).collect())
}
