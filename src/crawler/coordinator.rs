//! Traversal coordinator - main crawl orchestration logic
//!
//! The coordinator owns the whole crawl lifecycle:
//!
//! - load the persisted crawl state, or run discovery when there is none
//! - walk the category tree leaf by leaf in pre-order, paginating each
//!   leaf's content pages through the `SitePager`
//! - maintain visit states: a leaf becomes `Visited` when its pagination
//!   is exhausted, and `Visited` propagates upward to any ancestor whose
//!   children are all visited
//! - persist state after every leaf transition, propagation step, and
//!   page advance, so an interrupted run resumes mid-leaf

use crate::config::Config;
use crate::crawler::{Fetch, HttpFetcher, SelectorExtractor, SiteDiscoverer, SitePager};
use crate::state::{CrawlState, VisitState};
use crate::storage::{RunStatus, SqliteStateStore, StateStore};
use crate::structure::{NodeId, SiteStructure};
use crate::{CanopyError, Result};
use std::path::Path;
use std::sync::Arc;

/// Drives a crawl from discovery (or a persisted snapshot) to completion
pub struct Coordinator {
    config: Config,
    store: SqliteStateStore,
    fetcher: Arc<dyn Fetch>,
    pager: SitePager,
    state: Option<CrawlState>,
    run_id: i64,
}

impl Coordinator {
    /// Creates a coordinator backed by the configured database and a
    /// reqwest fetcher
    ///
    /// With `fresh` any existing snapshot is dropped first; otherwise a
    /// saved snapshot (plus a latest run still marked running) means the
    /// previous process was interrupted and the crawl resumes.
    pub fn new(config: Config, config_hash: &str, fresh: bool) -> Result<Self> {
        let mut store = SqliteStateStore::new(Path::new(&config.output.database_path))?;
        if fresh {
            store.clear()?;
        }
        let fetcher: Arc<dyn Fetch> = Arc::new(HttpFetcher::new(&config.user_agent)?);
        Self::with_store_and_fetcher(config, config_hash, store, fetcher)
    }

    /// Creates a coordinator over an explicit store and fetcher
    ///
    /// This is the seam used by tests to substitute an in-memory fetcher.
    pub fn with_store_and_fetcher(
        config: Config,
        config_hash: &str,
        mut store: SqliteStateStore,
        fetcher: Arc<dyn Fetch>,
    ) -> Result<Self> {
        let state = store.load()?;

        let run_id = match (&state, store.get_latest_run()?) {
            (Some(_), Some(run)) if run.status == RunStatus::Running => {
                tracing::info!("Resuming interrupted run {}", run.id);
                if run.config_hash != config_hash {
                    tracing::warn!(
                        "Configuration changed since run {} started; resuming with the saved structure",
                        run.id
                    );
                }
                run.id
            }
            _ => {
                tracing::info!("Starting new run");
                store.create_run(config_hash)?
            }
        };

        let pager = SitePager::new(Arc::clone(&fetcher), &config.page)?;

        Ok(Self {
            config,
            store,
            fetcher,
            pager,
            state,
            run_id,
        })
    }

    /// The discovered (or reloaded) category tree, if any
    pub fn site_structure(&self) -> Option<&SiteStructure> {
        self.state.as_ref().map(|state| &state.site_structure)
    }

    /// Runs the crawl to completion
    pub async fn run(&mut self) -> Result<()> {
        let mut state = match self.state.take() {
            Some(state) => state,
            None => self.discover().await?,
        };

        // An interrupted leaf is finished first. The persisted cursor is
        // authoritative: pagination restarts at the saved page URL with no
        // leaf re-selection.
        if let (Some(leaf_path), Some(page_url)) = (
            state.current_leaf_path.clone(),
            state.current_page_url.clone(),
        ) {
            let leaf = state
                .site_structure
                .node_at_path(&leaf_path)
                .map_err(|_| {
                    CanopyError::CorruptState(format!(
                        "saved leaf path '{}' is not in the reloaded structure",
                        leaf_path
                    ))
                })?;
            tracing::info!("Resuming leaf '{}' at {}", leaf_path, page_url);
            self.work_leaf(&mut state, leaf, &page_url).await?;
        }

        while let Some(leaf) = state
            .site_structure
            .find_leaf_with_visit_state(VisitState::New)
        {
            let leaf_path = state.site_structure.path_of(leaf);
            let Some(start_url) = state.site_structure.node(leaf).url.clone() else {
                // Only the root of a category-less site lacks a URL;
                // there is nothing to paginate.
                tracing::warn!("Leaf '{}' has no URL, marking it visited", leaf_path);
                self.finish_leaf(&mut state, leaf)?;
                continue;
            };

            tracing::info!("Starting leaf '{}'", leaf_path);
            state
                .site_structure
                .set_visit_state(leaf, VisitState::InProgress, true);
            state.enter_leaf(&leaf_path, &start_url);
            self.store.save(&state)?;
            state.log_summary();

            self.work_leaf(&mut state, leaf, &start_url).await?;
        }

        tracing::info!("No new leaves remain, crawl complete");
        self.store.complete_run(self.run_id)?;
        self.state = Some(state);
        Ok(())
    }

    /// Runs discovery and persists the freshly built structure
    async fn discover(&mut self) -> Result<CrawlState> {
        let extractors = SelectorExtractor::from_levels(&self.config.levels)?;
        let discoverer = SiteDiscoverer::new(
            &self.config.site.name,
            &self.config.site.start_url,
            extractors,
            Arc::clone(&self.fetcher),
            None,
        );
        let structure = discoverer.discover().await?;
        let state = CrawlState::new(structure);
        self.store.save(&state)?;
        Ok(state)
    }

    /// Paginates one leaf from the given page URL until exhausted
    ///
    /// Every page advance persists the page cursor only; the leaf cursor
    /// and visit states are untouched until the pager reports no next
    /// page.
    async fn work_leaf(
        &mut self,
        state: &mut CrawlState,
        leaf: NodeId,
        start_url: &str,
    ) -> Result<()> {
        let leaf_path = state.site_structure.path_of(leaf);
        let mut page_url = start_url.to_string();

        loop {
            let outcome = self.pager.fetch_page(&page_url).await?;
            self.store
                .record_items(self.run_id, &leaf_path, &outcome.items)?;
            tracing::debug!(
                "Recorded {} items from {} ({})",
                outcome.items.len(),
                page_url,
                leaf_path
            );

            match outcome.next_page_url {
                Some(next) => {
                    state.advance_page(&next);
                    self.store.save(state)?;
                    page_url = next;
                }
                None => break,
            }
        }

        self.finish_leaf(state, leaf)
    }

    /// Marks a finished leaf visited, propagates upward, and persists
    ///
    /// The leaf itself is set non-propagating; ancestors become visited
    /// only when every one of their children already is, checked up the
    /// parent chain.
    fn finish_leaf(&mut self, state: &mut CrawlState, leaf: NodeId) -> Result<()> {
        state
            .site_structure
            .set_visit_state(leaf, VisitState::Visited, false);
        Self::propagate_visited(&mut state.site_structure, leaf);
        state.leave_leaf();
        self.store.save(state)?;
        state.log_summary();
        Ok(())
    }

    fn propagate_visited(structure: &mut SiteStructure, from: NodeId) {
        let mut current = from;
        while let Some(parent) = structure.node(current).parent {
            if !structure.children_all_visited(parent) {
                break;
            }
            structure.set_visit_state(parent, VisitState::Visited, false);
            current = parent;
        }
    }
}

/// Runs a complete crawl operation
///
/// This is the main entry point used by the binary: discover (or reload)
/// the category structure, then traverse it to completion.
pub async fn run_crawl(config: Config, config_hash: &str, fresh: bool) -> Result<()> {
    let mut coordinator = Coordinator::new(config, config_hash, fresh)?;
    coordinator.run().await
}
