//! Canopy: a resumable crawler for hierarchically-categorized sites
//!
//! This crate crawls sites organized as a category tree: it first discovers
//! the tree by recursively fetching category-listing pages (one configured
//! extractor per level), then traverses the tree leaf by leaf, paginating
//! through each leaf's content pages. Progress is persisted after every
//! transition, so an interrupted crawl resumes where it stopped without
//! re-discovering or re-visiting completed work.

pub mod config;
pub mod crawler;
pub mod state;
pub mod storage;
pub mod structure;

use thiserror::Error;

/// Main error type for canopy operations
#[derive(Debug, Error)]
pub enum CanopyError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error for {url}: {source}")]
    Fetch {
        url: String,
        source: crawler::FetchError,
    },

    #[error("No node at path: {0}")]
    PathNotFound(String),

    #[error("Corrupt persisted state: {0}")]
    CorruptState(String),

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for canopy operations
pub type Result<T> = std::result::Result<T, CanopyError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use state::{CrawlState, VisitState};
pub use structure::{NodeId, SiteStructure};
