// # CIS IP HTTP Client
//
// This crate provides the HTTP implementation of the session and client
// capabilities used by the `ibm_cis_ip_addresses` data source.
//
// ## Constraints
//
// - One HTTP request per `list_ips` call
// - Errors are returned, never retried (the caller reschedules)
// - HTTP timeout is owned by the transport (30 seconds by default)
// - No caching, no background tasks
//
// ## Security Requirements
//
// - The IAM token NEVER appears in logs or `Debug` output
//
// ## API Reference
//
// - List IPs: GET `/v1/ips`

mod client;
mod session;

pub use client::{CisIpApiV1, ORIGINAL_USER_AGENT, ORIGINAL_USER_AGENT_HEADER};
pub use session::{CisSession, CisSessionError};
