//! Shared helpers for the risk engine integration tests
#![allow(dead_code)]

use chrono::{DateTime, Utc};
use tracing_subscriber::EnvFilter;
use types::attributes::AssetAttributes;

/// Route engine logs to the test harness; honours `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn timestamp() -> DateTime<Utc> {
    DateTime::from_timestamp(1_708_123_456, 0).unwrap_or_default()
}

/// Highly critical, highly sensitive asset
pub fn critical_asset() -> AssetAttributes {
    AssetAttributes::new(0.9, 0.95, 0.85, 0.8, 0.9, 0.95, 0.9)
}
