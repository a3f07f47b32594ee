//! Crawler module
//!
//! This module contains the two phases of a crawl and their collaborators:
//!
//! - discovery: recursively fetching category-listing pages to build the
//!   site structure (`SiteDiscoverer`)
//! - traversal: walking the discovered tree leaf by leaf, paginating
//!   through each leaf's content pages (`Coordinator` + `SitePager`)
//!
//! Fetching goes through the `Fetch` trait so tests can substitute an
//! in-memory fetcher; `HttpFetcher` is the reqwest-backed implementation.

mod coordinator;
mod discoverer;
mod extractor;
mod fetcher;
mod pager;

pub use coordinator::{run_crawl, Coordinator};
pub use discoverer::{DiscoveryCallback, FetchTask, SiteDiscoverer};
pub use extractor::{CategoryExtractor, CategoryLink, SelectorExtractor};
pub use fetcher::{build_http_client, Fetch, FetchError, HttpFetcher};
pub use pager::{PageItem, PageOutcome, SitePager};
