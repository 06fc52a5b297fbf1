// # File Record Store
//
// File-based implementation of RecordStore with crash recovery.
//
// ## Crash Recovery
//
// - Atomic writes: write to `<path>.tmp`, then rename over `<path>`
// - Backup: the previous file is copied to `<path>.backup` before each rename
// - Recovery: a file that does not parse is replaced by its backup
//
// ## File Format
//
// ```json
// {
//   "version": "1.0",
//   "records": {
//     "ibm_cis_ip_addresses.edge": {
//       "id": "2024-01-09 12:00:00.000000000 +0000 UTC",
//       "ipv4_cidrs": ["173.245.48.0/20"],
//       "ipv6_cidrs": ["173.245.48.0/20"]
//     }
//   }
// }
// ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use crate::Error;
use crate::record::IpAddressesRecord;
use crate::traits::record_store::RecordStore;

/// Record file format version
const RECORD_FILE_VERSION: &str = "1.0";

/// File-based record store with crash recovery
///
/// Every mutation is written through to disk immediately.
///
/// # Example
///
/// ```rust,no_run
/// use cisip_core::state::FileRecordStore;
/// use cisip_core::traits::RecordStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileRecordStore::new("/var/lib/cisip/records.json").await?;
///     if let Some(record) = store.get("ibm_cis_ip_addresses.edge").await? {
///         println!("{:?}", record.ipv4_cidrs());
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct FileRecordStore {
    path: PathBuf,
    state: Arc<RwLock<FileState>>,
}

#[derive(Debug)]
struct FileState {
    records: HashMap<String, IpAddressesRecord>,
    dirty: bool,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct RecordFileFormat {
    version: String,
    records: HashMap<String, IpAddressesRecord>,
}

/// Why a record file could not be loaded
enum LoadFailure {
    /// The file could not be read
    Unreadable(Error),
    /// The file was read but is not a valid record file
    Corrupted(Error),
}

impl FileRecordStore {
    /// Create or load a file record store
    ///
    /// This will:
    /// 1. Create parent directories if needed
    /// 2. Load the existing record file
    /// 3. If it is corrupted, load and restore the backup
    /// 4. If both are unusable, start with an empty store
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::config(format!(
                    "Failed to create record directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let records = Self::load_with_recovery(&path).await?;

        Ok(Self {
            path,
            state: Arc::new(RwLock::new(FileState {
                records,
                dirty: false,
            })),
        })
    }

    async fn load_with_recovery(path: &Path) -> Result<HashMap<String, IpAddressesRecord>, Error> {
        let err = match Self::load(path).await {
            Ok(records) => {
                tracing::debug!("Loaded record file: {} records", records.len());
                return Ok(records);
            }
            Err(LoadFailure::Unreadable(e)) => return Err(e),
            Err(LoadFailure::Corrupted(e)) => e,
        };

        tracing::warn!("Record file appears corrupted: {}. Attempting recovery from backup.", err);

        let backup_path = Self::backup_path(path);
        if !backup_path.exists() {
            tracing::warn!("No backup file found. Starting with empty store.");
            return Ok(HashMap::new());
        }

        match Self::load(&backup_path).await {
            Ok(records) => {
                tracing::info!("Recovered records from backup: {} records", records.len());
                if let Err(e) = fs::copy(&backup_path, path).await {
                    tracing::error!("Failed to restore record file from backup: {}", e);
                }
                Ok(records)
            }
            Err(LoadFailure::Unreadable(e)) | Err(LoadFailure::Corrupted(e)) => {
                tracing::error!("Backup also unusable: {}. Starting with empty store.", e);
                Ok(HashMap::new())
            }
        }
    }

    async fn load(path: &Path) -> Result<HashMap<String, IpAddressesRecord>, LoadFailure> {
        if !path.exists() {
            tracing::debug!("Record file does not exist: {}", path.display());
            return Ok(HashMap::new());
        }

        let content = fs::read_to_string(path).await.map_err(|e| {
            LoadFailure::Unreadable(Error::record_store(format!(
                "Failed to read record file {}: {}",
                path.display(),
                e
            )))
        })?;

        let file: RecordFileFormat = serde_json::from_str(&content).map_err(|e| {
            LoadFailure::Corrupted(Error::record_store(format!(
                "Failed to parse record file {}: {}",
                path.display(),
                e
            )))
        })?;

        if file.version != RECORD_FILE_VERSION {
            tracing::warn!(
                "Record file version mismatch: expected {}, got {}. Attempting to load anyway.",
                RECORD_FILE_VERSION,
                file.version
            );
        }

        Ok(file.records)
    }

    /// Write all records to disk atomically
    async fn write(&self) -> Result<(), Error> {
        let mut state_guard = self.state.write().await;

        let file = RecordFileFormat {
            version: RECORD_FILE_VERSION.to_string(),
            records: state_guard.records.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        let temp_path = self.temp_path();
        {
            let mut temp = fs::File::create(&temp_path).await.map_err(|e| {
                Error::record_store(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
            temp.write_all(json.as_bytes()).await.map_err(|e| {
                Error::record_store(format!(
                    "Failed to write to temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
            temp.flush().await.map_err(|e| {
                Error::record_store(format!(
                    "Failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        if self.path.exists()
            && let Err(e) = fs::copy(&self.path, Self::backup_path(&self.path)).await
        {
            tracing::warn!("Failed to create backup: {}", e);
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::record_store(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        state_guard.dirty = false;
        tracing::trace!("Records written to file: {}", self.path.display());
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }

    fn backup_path(path: &Path) -> PathBuf {
        let mut backup = path.to_path_buf();
        backup.set_extension("backup");
        backup
    }
}

#[async_trait]
impl RecordStore for FileRecordStore {
    async fn get(&self, key: &str) -> Result<Option<IpAddressesRecord>, Error> {
        let state_guard = self.state.read().await;
        Ok(state_guard.records.get(key).cloned())
    }

    async fn put(&self, key: &str, record: &IpAddressesRecord) -> Result<(), Error> {
        {
            let mut state_guard = self.state.write().await;
            state_guard.records.insert(key.to_string(), record.clone());
            state_guard.dirty = true;
        }
        self.write().await
    }

    async fn flush(&self) -> Result<(), Error> {
        let dirty = self.state.read().await.dirty;
        if dirty { self.write().await } else { Ok(()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn populated(id: &str, cidr: &str) -> IpAddressesRecord {
        let mut record = IpAddressesRecord::new();
        record.replace(id.to_string(), vec![cidr.to_string()], vec![cidr.to_string()]);
        record
    }

    #[tokio::test]
    async fn test_file_store_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("records.json");

        let store = FileRecordStore::new(&path).await.unwrap();
        assert_eq!(store.get("edge").await.unwrap(), None);

        let record = populated("one", "1.2.3.0/24");
        store.put("edge", &record).await.unwrap();
        assert!(path.exists());

        let reloaded = FileRecordStore::new(&path).await.unwrap();
        assert_eq!(reloaded.get("edge").await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn test_file_store_corruption_recovery() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("records.json");

        let store = FileRecordStore::new(&path).await.unwrap();
        store.put("edge", &populated("one", "1.2.3.0/24")).await.unwrap();
        store.put("edge", &populated("two", "5.6.7.0/24")).await.unwrap();

        let backup_path = FileRecordStore::backup_path(&path);
        assert!(backup_path.exists(), "Backup file should exist after second write");

        fs::write(&path, b"corrupted json data").await.unwrap();

        let recovered = FileRecordStore::new(&path).await.unwrap();
        let record = recovered.get("edge").await.unwrap().unwrap();
        assert_eq!(record.id(), "one", "Backup should contain previous state");
    }

    #[tokio::test]
    async fn test_file_store_corrupted_without_backup_starts_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("records.json");
        fs::write(&path, b"{ not json").await.unwrap();

        let store = FileRecordStore::new(&path).await.unwrap();
        assert!(store.state.read().await.records.is_empty());
    }

    #[tokio::test]
    async fn test_file_store_nested_path_and_flush() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("records.json");

        let store = FileRecordStore::new(&path).await.unwrap();
        store.flush().await.unwrap();
        assert!(!path.exists(), "clean store writes nothing");

        store.put("edge", &populated("one", "1.2.3.0/24")).await.unwrap();
        store.put("edge", &populated("two", "5.6.7.0/24")).await.unwrap();
        store.flush().await.unwrap();

        let reloaded = FileRecordStore::new(&path).await.unwrap();
        assert_eq!(reloaded.get("edge").await.unwrap().unwrap().id(), "two");
    }
}
