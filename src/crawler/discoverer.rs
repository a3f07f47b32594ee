//! Site structure discovery
//!
//! Discovery builds the category tree by recursively fetching
//! category-listing pages, one configured extractor per level. The
//! branching factor of each level is only known once that level's page has
//! been fetched, so completion cannot be detected against a fixed expected
//! count. Instead a pending-work counter acts as a fan-out/fan-in barrier:
//! it is incremented for every task strictly before the task is dispatched
//! and decremented as each fetch resolves, and discovery is complete
//! exactly when it returns to zero.
//!
//! Fetches run concurrently on a `JoinSet`; all tree mutations and counter
//! updates happen sequentially in the single loop that drains it, so the
//! ordering rules above hold without any locking.

use crate::crawler::{CategoryExtractor, Fetch, FetchError};
use crate::structure::SiteStructure;
use crate::{CanopyError, Result};
use std::sync::Arc;
use tokio::task::JoinSet;
use url::Url;

/// One dispatched category-page fetch
#[derive(Debug, Clone)]
pub struct FetchTask {
    /// URL of the category-listing page to fetch
    pub url: String,

    /// Index into the per-level extractor list
    pub level: usize,

    /// Structure path of the category this page belongs to; `None` for
    /// the start page, whose links become top-level categories
    pub parent_path: Option<String>,
}

/// Observer hook fired exactly once when discovery completes
///
/// Passing `None` where a callback is accepted makes completion a silent
/// no-op, which is the standalone-discovery case.
pub type DiscoveryCallback = Box<dyn FnMut(&SiteStructure) + Send>;

/// Discovers the category structure of a site
pub struct SiteDiscoverer {
    site_name: String,
    start_url: String,
    extractors: Vec<Box<dyn CategoryExtractor>>,
    fetcher: Arc<dyn Fetch>,
    structure: SiteStructure,
    remaining_work: usize,
    on_discovery_complete: Option<DiscoveryCallback>,
}

impl SiteDiscoverer {
    /// Creates a discoverer for one run
    ///
    /// `extractors` holds one extractor per category level, outermost
    /// first; recursion depth is bounded by its length. The discoverer is
    /// consumed by [`discover`](Self::discover) and not reused.
    pub fn new(
        site_name: &str,
        start_url: &str,
        extractors: Vec<Box<dyn CategoryExtractor>>,
        fetcher: Arc<dyn Fetch>,
        on_discovery_complete: Option<DiscoveryCallback>,
    ) -> Self {
        Self {
            site_name: site_name.to_string(),
            start_url: start_url.to_string(),
            extractors,
            fetcher,
            structure: SiteStructure::new(site_name),
            remaining_work: 0,
            on_discovery_complete,
        }
    }

    /// Runs discovery to completion and returns the finished tree
    ///
    /// A start page that lists zero categories completes immediately with
    /// a tree containing only the root. A failed fetch aborts discovery
    /// with an error; retry policy belongs to the fetch collaborator.
    pub async fn discover(mut self) -> Result<SiteStructure> {
        let mut in_flight = JoinSet::new();

        let start_task = self.create_start_task();
        self.dispatch(&mut in_flight, start_task);

        while let Some(joined) = in_flight.join_next().await {
            let (task, fetched) = joined?;
            // The decrement must land before the zero-check below
            self.remaining_work -= 1;

            let body = fetched.map_err(|source| CanopyError::Fetch {
                url: task.url.clone(),
                source,
            })?;
            self.process_category_response(&mut in_flight, &task, &body)?;

            if self.remaining_work == 0 {
                tracing::info!(
                    "[{}] Discovery complete:\n{}",
                    self.site_name,
                    self.structure
                );
                if let Some(callback) = self.on_discovery_complete.as_mut() {
                    callback(&self.structure);
                }
                break;
            }
        }

        Ok(self.structure)
    }

    /// Registers and returns the level-0 task for the start URL
    fn create_start_task(&mut self) -> FetchTask {
        self.remaining_work += 1;
        FetchTask {
            url: self.start_url.clone(),
            level: 0,
            parent_path: None,
        }
    }

    /// Handles one resolved category page
    ///
    /// Applies the task's level extractor, inserts a node per extracted
    /// link, and dispatches one task per link for the next level (if any),
    /// incrementing the pending-work counter for each before dispatch.
    fn process_category_response(
        &mut self,
        in_flight: &mut JoinSet<(FetchTask, std::result::Result<String, FetchError>)>,
        task: &FetchTask,
        body: &str,
    ) -> Result<()> {
        let page_url = Url::parse(&task.url)?;
        let links = self.extractors[task.level].extract(body, &page_url);

        for link in links {
            let structure_path = match &task.parent_path {
                None => link.name.clone(),
                Some(parent) => format!("{}/{}", parent, link.name),
            };
            self.structure.insert_with_path(&structure_path, &link.url);

            if task.level + 1 < self.extractors.len() {
                let child_task = FetchTask {
                    url: link.url,
                    level: task.level + 1,
                    parent_path: Some(structure_path),
                };
                self.remaining_work += 1;
                self.dispatch(in_flight, child_task);
            }
        }

        tracing::debug!(
            "[{}] Remaining discovery work: {}",
            self.site_name,
            self.remaining_work
        );
        Ok(())
    }

    fn dispatch(
        &self,
        in_flight: &mut JoinSet<(FetchTask, std::result::Result<String, FetchError>)>,
        task: FetchTask,
    ) {
        let fetcher = Arc::clone(&self.fetcher);
        in_flight.spawn(async move {
            let body = fetcher.fetch(&task.url).await;
            (task, body)
        });
    }
}
