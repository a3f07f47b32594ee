use crate::state::VisitState;
use crate::structure::SiteStructure;

/// The persisted snapshot of a crawl
///
/// This is the resumability boundary: the discovered site structure plus
/// the "current leaf" and "current page" cursors. It is created on first
/// successful discovery, mutated on every leaf and page transition, and
/// saved through the state store after each mutation. On startup a loaded
/// snapshot is authoritative and traversal resumes directly at the
/// cursors, skipping discovery entirely.
#[derive(Debug, Clone)]
pub struct CrawlState {
    /// The discovered category tree with per-node visit states
    pub site_structure: SiteStructure,

    /// Path of the leaf currently being paginated, if any
    pub current_leaf_path: Option<String>,

    /// URL of the content page to fetch next within the current leaf
    pub current_page_url: Option<String>,
}

impl CrawlState {
    /// Wraps a freshly discovered structure with empty cursors
    pub fn new(site_structure: SiteStructure) -> Self {
        Self {
            site_structure,
            current_leaf_path: None,
            current_page_url: None,
        }
    }

    /// Points both cursors at the start of a leaf
    ///
    /// Used on every leaf transition; page advances within the leaf go
    /// through [`advance_page`](Self::advance_page) instead.
    pub fn enter_leaf(&mut self, leaf_path: &str, start_url: &str) {
        self.current_leaf_path = Some(leaf_path.to_string());
        self.current_page_url = Some(start_url.to_string());
    }

    /// Moves the page cursor within the current leaf
    ///
    /// The leaf cursor is deliberately untouched: a page advance is not a
    /// category transition.
    pub fn advance_page(&mut self, next_page_url: &str) {
        self.current_page_url = Some(next_page_url.to_string());
    }

    /// Clears both cursors once the current leaf is exhausted
    pub fn leave_leaf(&mut self) {
        self.current_leaf_path = None;
        self.current_page_url = None;
    }

    /// Logs a one-line progress summary
    pub fn log_summary(&self) {
        let visited = self
            .site_structure
            .count_leaves_with_visit_state(VisitState::Visited);
        let in_progress = self
            .site_structure
            .count_leaves_with_visit_state(VisitState::InProgress);
        let new = self
            .site_structure
            .count_leaves_with_visit_state(VisitState::New);
        tracing::info!(
            "Progress: {} leaves visited, {} in progress, {} new; current leaf: {}",
            visited,
            in_progress,
            new,
            self.current_leaf_path.as_deref().unwrap_or("-")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> CrawlState {
        let mut structure = SiteStructure::new("books");
        structure.insert_with_path("fiction", "https://example.com/fiction");
        CrawlState::new(structure)
    }

    #[test]
    fn test_new_state_has_no_cursors() {
        let state = sample_state();
        assert!(state.current_leaf_path.is_none());
        assert!(state.current_page_url.is_none());
    }

    #[test]
    fn test_enter_leaf_sets_both_cursors() {
        let mut state = sample_state();
        state.enter_leaf("fiction", "https://example.com/fiction");
        assert_eq!(state.current_leaf_path.as_deref(), Some("fiction"));
        assert_eq!(
            state.current_page_url.as_deref(),
            Some("https://example.com/fiction")
        );
    }

    #[test]
    fn test_advance_page_keeps_leaf_cursor() {
        let mut state = sample_state();
        state.enter_leaf("fiction", "https://example.com/fiction");
        state.advance_page("https://example.com/fiction?page=2");

        assert_eq!(state.current_leaf_path.as_deref(), Some("fiction"));
        assert_eq!(
            state.current_page_url.as_deref(),
            Some("https://example.com/fiction?page=2")
        );
    }

    #[test]
    fn test_leave_leaf_clears_cursors() {
        let mut state = sample_state();
        state.enter_leaf("fiction", "https://example.com/fiction");
        state.leave_leaf();
        assert!(state.current_leaf_path.is_none());
        assert!(state.current_page_url.is_none());
    }
}
