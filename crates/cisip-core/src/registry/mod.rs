//! Plugin-based data source registry
//!
//! The registry maps data source names (as they appear in configuration,
//! e.g. `ibm_cis_ip_addresses`) to implementations, so the framework can
//! dispatch reads without hard-coded if-else chains.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cisip_core::{DataSourceRegistry, IpAddressesRecord};
//!
//! let registry = DataSourceRegistry::with_builtin();
//!
//! let mut record = IpAddressesRecord::new();
//! registry.read("ibm_cis_ip_addresses", &session, &mut record).await?;
//! ```

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{Error, Result};
use crate::record::IpAddressesRecord;
use crate::schema::Schema;
use crate::sync::CisIpAddressesDataSource;
use crate::traits::{ClientSession, DataSource};

/// Registry of data sources by name
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes. The lock is never held across a remote call.
#[derive(Default)]
pub struct DataSourceRegistry {
    data_sources: RwLock<HashMap<String, Arc<dyn DataSource>>>,
}

impl DataSourceRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in data sources
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        registry.register(Arc::new(CisIpAddressesDataSource::new()));
        registry
    }

    /// Register a data source under its own name
    ///
    /// A data source registered under an existing name replaces it.
    pub fn register(&self, data_source: Arc<dyn DataSource>) {
        let mut data_sources = self
            .data_sources
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        data_sources.insert(data_source.name().to_string(), data_source);
    }

    /// Look up a data source
    pub fn get(&self, name: &str) -> Result<Arc<dyn DataSource>> {
        let data_sources = self
            .data_sources
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        data_sources
            .get(name)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("Unknown data source: {}", name)))
    }

    /// Schema of a registered data source
    pub fn schema(&self, name: &str) -> Result<Schema> {
        Ok(self.get(name)?.schema())
    }

    /// Read a data source into `record`
    pub async fn read(
        &self,
        name: &str,
        session: &dyn ClientSession,
        record: &mut IpAddressesRecord,
    ) -> Result<()> {
        let data_source = self.get(name)?;
        data_source.read(session, record).await
    }

    /// List all registered data source names
    pub fn list(&self) -> Vec<String> {
        let data_sources = self
            .data_sources
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        data_sources.keys().cloned().collect()
    }

    /// Check if a data source is registered
    pub fn contains(&self, name: &str) -> bool {
        let data_sources = self
            .data_sources
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        data_sources.contains_key(name)
    }
}
