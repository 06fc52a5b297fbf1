// # Memory Record Store
//
// In-memory implementation of RecordStore.
//
// ## When to Use
//
// - Testing environments
// - One-shot runs where the record is printed rather than kept

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use async_trait::async_trait;

use crate::record::IpAddressesRecord;
use crate::traits::record_store::RecordStore;
use crate::Error;

/// In-memory record store implementation
///
/// This implementation stores all records in a HashMap protected by a RwLock.
/// It provides no persistence across restarts.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    inner: Arc<RwLock<HashMap<String, IpAddressesRecord>>>,
}

impl MemoryRecordStore {
    /// Create a new empty memory record store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn get(&self, key: &str) -> Result<Option<IpAddressesRecord>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.get(key).cloned())
    }

    async fn put(&self, key: &str, record: &IpAddressesRecord) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        guard.insert(key.to_string(), record.clone());
        Ok(())
    }

    async fn flush(&self) -> Result<(), Error> {
        Ok(())
    }
}
