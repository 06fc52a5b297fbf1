// # cisip-core
//
// Core library for the CIS IP address list data source.
//
// ## Architecture Overview
//
// The data source reads the ranges Cloud Internet Services uses on its edge
// network and exposes them as two computed attributes:
// - **ClientSession**: Pre-authenticated handle that yields scoped API clients
// - **IpListClient**: The "list IP addresses" API surface
// - **IpListSynchronizer**: One refresh pass (acquire client → list → map)
// - **DataSource / DataSourceRegistry**: Schema plus `read` entry point, by name
// - **RecordStore**: Framework-side persistence of refreshed records
//
// ## Design Principles
//
// 1. **Explicit Sessions**: The session is always passed in, never looked up
// 2. **Single-shot**: One remote call per refresh, no retries, no caching
// 3. **All-or-nothing**: The record is only touched once the call succeeded

pub mod traits;
pub mod sync;
pub mod schema;
pub mod registry;
pub mod record;
pub mod config;
pub mod error;
pub mod state;

// Re-export core types for convenience
pub use traits::{ClientSession, IpListClient, RecordStore, DataSource};
pub use sync::{IpListSynchronizer, CisIpAddressesDataSource, CIS_IP_ADDRESSES};
pub use schema::{Attribute, AttributeKind, Schema};
pub use registry::DataSourceRegistry;
pub use record::IpAddressesRecord;
pub use config::{CisipConfig, CisConfig, SyncConfig, RecordStoreConfig, Ipv6Mapping, IdStrategy, Visibility};
pub use error::{Error, Result, DetailedResponse};
pub use state::{MemoryRecordStore, FileRecordStore};
