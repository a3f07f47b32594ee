//! Configuration module
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. A configuration without a start URL or without at least one
//! category level is rejected at load time; the crawl never starts.
//!
//! # Example
//!
//! ```no_run
//! use canopy_crawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Crawling {} category levels", config.levels.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, LevelConfig, OutputConfig, PageConfig, SiteConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
