// # Record Store Implementations
//
// This module provides implementations of the RecordStore trait for
// different persistence strategies.

pub mod file;
pub mod memory;

pub use file::FileRecordStore;
pub use memory::MemoryRecordStore;

use crate::config::RecordStoreConfig;
use crate::error::Result;
use crate::traits::RecordStore;

/// Create a record store from configuration
pub async fn from_config(config: &RecordStoreConfig) -> Result<Box<dyn RecordStore>> {
    config.validate()?;
    match config {
        RecordStoreConfig::Memory => Ok(Box::new(MemoryRecordStore::new())),
        RecordStoreConfig::File { path } => Ok(Box::new(FileRecordStore::new(path).await?)),
    }
}
