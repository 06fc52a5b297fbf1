//! Record identifier generation

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

use crate::config::IdStrategy;

static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generate a fresh record identifier
pub(crate) fn generate(strategy: IdStrategy) -> String {
    let now = Utc::now();
    match strategy {
        IdStrategy::Timestamp => timestamp_id(now),
        IdStrategy::Monotonic => {
            let sequence = NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
            format!("{}-{}", now.timestamp_nanos_opt().unwrap_or_default(), sequence)
        }
    }
}

fn timestamp_id(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d %H:%M:%S%.9f +0000 UTC").to_string()
}
