//! Integration tests for Heritage Mall.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p heritage-mall-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `persistence` - File-backed snapshots across restarts
//! - `store_properties` - Behavior of the mutation and view APIs
//!
//! Each test gets its own temporary state directory through [`TestContext`],
//! so tests can run in parallel.

use std::path::Path;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use tempfile::TempDir;

use heritage_mall_core::{AddressInput, HistoryEntry, ItemId, Product};
use heritage_mall_store::{FileStore, Store, StoreConfig};

/// A throwaway state directory plus the config pointing at it.
pub struct TestContext {
    dir: TempDir,
    pub config: StoreConfig,
}

impl TestContext {
    /// Create a context with default settings in a fresh directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config = StoreConfig::default().with_state_dir(dir.path());
        Self { dir, config }
    }

    /// Directory holding the snapshot files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Backend over the context directory.
    #[must_use]
    pub fn storage(&self) -> FileStore {
        FileStore::new(self.dir.path())
    }

    /// Open a store, as a fresh process would.
    #[must_use]
    pub fn open(&self) -> Store<FileStore> {
        Store::open(self.storage(), &self.config)
    }

    /// Path of the snapshot file.
    #[must_use]
    pub fn snapshot_path(&self) -> std::path::PathBuf {
        self.storage().path_for(&self.config.storage_key)
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A product at a whole-yuan price.
#[must_use]
pub fn product(id: i64, price: i64) -> Product {
    Product::new(ItemId::new(id), format!("Product {id}"), Decimal::from(price))
}

/// A complete address form.
#[must_use]
pub fn address(name: &str, is_default: bool) -> AddressInput {
    AddressInput {
        name: name.to_string(),
        phone: "13800000000".to_string(),
        region: "Jiangsu Suzhou".to_string(),
        detail: "8 Pingjiang Rd".to_string(),
        is_default,
    }
}

/// A history entry with only an id.
#[must_use]
pub fn viewed(id: i64) -> HistoryEntry {
    HistoryEntry {
        id: ItemId::new(id),
        name: format!("Item {id}"),
        ..HistoryEntry::default()
    }
}

/// A fixed instant plus `seconds`, for deterministic history times.
///
/// # Panics
///
/// Never in practice; the base date is valid.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn at(seconds: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(seconds)
}
