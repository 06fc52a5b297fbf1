// # Record Store Trait
//
// Persistence for refreshed records, keyed by data source instance
// (e.g. "ibm_cis_ip_addresses.edge").
//
// The store is written after a refresh succeeds and read back by the
// framework. It is never consulted by the refresh itself; every read goes
// to the remote service. Records are only ever replaced; removing them
// is left to the surrounding framework.
//
// ## Implementations
//
// - Memory: `MemoryRecordStore`
// - File: `FileRecordStore` (JSON with atomic writes and backup)

use async_trait::async_trait;

use crate::record::IpAddressesRecord;

/// Trait for record store implementations
///
/// # Thread Safety
///
/// All methods must be safe to call concurrently from multiple tasks.
///
/// # Implementation Guidelines
///
/// - **Async I/O only**: Use async file operations, never blocking I/O
/// - **Explicit flush**: `flush()` must persist all pending changes
/// - **No background tasks**: Periodic flushing belongs to the caller
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Get a stored record
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))`: The stored record
    /// - `Ok(None)`: Nothing stored under `key`
    /// - `Err(Error)`: Storage error
    async fn get(&self, key: &str) -> Result<Option<IpAddressesRecord>, crate::Error>;

    /// Store a record, replacing any previous value
    async fn put(&self, key: &str, record: &IpAddressesRecord) -> Result<(), crate::Error>;

    /// Persist any pending changes
    async fn flush(&self) -> Result<(), crate::Error>;
}
