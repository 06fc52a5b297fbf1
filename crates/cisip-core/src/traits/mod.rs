//! Core traits for the CIS IP data source
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`ClientSession`]: Produce scoped API clients from an authenticated session
//! - [`IpListClient`]: List the IP ranges used by the CIS edge network
//! - [`DataSource`]: Schema declaration plus the `read` entry point
//! - [`RecordStore`]: Persistence of refreshed records

pub mod session;
pub mod ip_client;
pub mod data_source;
pub mod record_store;

pub use session::ClientSession;
pub use ip_client::{IpListClient, IpsResult, ListIpsOptions};
pub use data_source::DataSource;
pub use record_store::RecordStore;
