//! Storage module for persisting crawl state
//!
//! This module is the resumability boundary: it round-trips the crawl
//! state snapshot (category tree plus leaf/page cursors) through SQLite,
//! tracks crawl runs, and records scraped items.

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStateStore;
pub use traits::{StateStore, StorageError, StorageResult};

/// Represents a crawl run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
}

/// Status of a crawl run
///
/// A latest run still marked `Running` alongside a saved snapshot means
/// the previous process was interrupted and the crawl should resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}
