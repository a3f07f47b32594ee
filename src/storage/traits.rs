//! Storage traits and error types

use crate::crawler::PageItem;
use crate::state::CrawlState;
use crate::storage::RunRecord;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Corrupt snapshot: {0}")]
    Corrupt(String),

    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for crawl-state store implementations
///
/// The store is called once at startup (`load`) and after every leaf
/// transition, propagation step, and page advance (`save`). Only the
/// logical fields of `CrawlState` must round-trip losslessly; the backing
/// format is the implementation's business.
pub trait StateStore {
    // ===== Crawl state snapshot =====

    /// Loads the persisted crawl state, if any
    ///
    /// `Ok(None)` means no snapshot has ever been saved and the crawl
    /// must start with discovery.
    fn load(&self) -> StorageResult<Option<CrawlState>>;

    /// Saves the full crawl state, replacing any previous snapshot
    fn save(&mut self, state: &CrawlState) -> StorageResult<()>;

    /// Drops the snapshot and recorded items (fresh crawl)
    fn clear(&mut self) -> StorageResult<()>;

    // ===== Run Management =====

    /// Creates a new crawl run, returning its id
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Marks a run as completed with a finish timestamp
    fn complete_run(&mut self, run_id: i64) -> StorageResult<()>;

    // ===== Items =====

    /// Records items scraped from one content page of a leaf
    fn record_items(
        &mut self,
        run_id: i64,
        leaf_path: &str,
        items: &[PageItem],
    ) -> StorageResult<()>;

    /// Total number of recorded items
    fn count_items(&self) -> StorageResult<u64>;
}
