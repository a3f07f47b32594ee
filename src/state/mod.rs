//! State module for tracking and resuming crawl progress
//!
//! # Components
//!
//! - `VisitState`: per-category lifecycle tag driving the traversal
//! - `CrawlState`: the persisted snapshot (site structure plus the
//!   current-leaf and current-page cursors) that makes a crawl resumable

mod crawl_state;
mod visit_state;

pub use crawl_state::CrawlState;
pub use visit_state::VisitState;
