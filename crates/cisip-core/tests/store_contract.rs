//! Contract Test: Record Persistence
//!
//! Constraints verified:
//! - A refreshed record round-trips through every record store
//! - Stores are never consulted by refresh (a failed refresh keeps the
//!   stored record and the store is not touched)

mod common;

use common::*;
use cisip_core::config::RecordStoreConfig;
use cisip_core::traits::RecordStore;
use cisip_core::{IpAddressesRecord, IpListSynchronizer, state};

const KEY: &str = "ibm_cis_ip_addresses.edge";

async fn refresh_and_store(store: &dyn RecordStore) -> IpAddressesRecord {
    let session = MockSession::returning(&[IPV4], &[IPV6]);
    let mut record = IpAddressesRecord::new();
    IpListSynchronizer::corrected()
        .refresh(&session, &mut record)
        .await
        .unwrap();
    store.put(KEY, &record).await.unwrap();
    record
}

#[tokio::test]
async fn memory_store_keeps_refreshed_record() {
    let store = state::from_config(&RecordStoreConfig::Memory).await.unwrap();
    let record = refresh_and_store(store.as_ref()).await;

    assert_eq!(store.get(KEY).await.unwrap(), Some(record));
}

#[tokio::test]
async fn file_store_keeps_refreshed_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.json");
    let config = RecordStoreConfig::File {
        path: path.to_string_lossy().into_owned(),
    };

    let store = state::from_config(&config).await.unwrap();
    let record = refresh_and_store(store.as_ref()).await;
    store.flush().await.unwrap();

    let reopened = state::from_config(&config).await.unwrap();
    let stored = reopened.get(KEY).await.unwrap().expect("record persisted");
    assert_eq!(stored, record);
    assert_eq!(stored.ipv6_cidrs(), [IPV6.to_string()]);
}

#[tokio::test]
async fn failed_refresh_keeps_stored_record() {
    let store = state::from_config(&RecordStoreConfig::Memory).await.unwrap();
    let stored = refresh_and_store(store.as_ref()).await;

    let mut record = store.get(KEY).await.unwrap().unwrap();
    let session = MockSession::failing(502, "bad gateway");
    assert!(IpListSynchronizer::new().refresh(&session, &mut record).await.is_err());

    assert_eq!(record, stored);
    assert_eq!(store.get(KEY).await.unwrap(), Some(stored));
}

#[tokio::test]
async fn empty_file_path_is_rejected() {
    let config = RecordStoreConfig::File { path: String::new() };
    assert!(state::from_config(&config).await.is_err());
}
