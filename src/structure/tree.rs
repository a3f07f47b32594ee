use crate::state::VisitState;
use crate::structure::{Node, NodeId};
use crate::{CanopyError, Result};
use std::fmt;

/// The discovered category hierarchy of a site
///
/// All nodes live in a flat arena; the root is always index 0 and carries
/// the site name. Child order is insertion order, which for a discovered
/// tree is discovery order, so pre-order walks are reproducible across
/// runs.
#[derive(Debug, Clone)]
pub struct SiteStructure {
    nodes: Vec<Node>,
}

impl SiteStructure {
    /// Creates a structure containing only the root node
    ///
    /// The root exists even when discovery finds zero categories.
    pub fn new(site_name: &str) -> Self {
        Self {
            nodes: vec![Node::new(site_name, None)],
        }
    }

    /// The root node's id (always 0)
    pub fn root(&self) -> NodeId {
        0
    }

    /// Total number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        false // the root always exists
    }

    /// Borrows a node by id
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Inserts a node at the given slash-joined path, creating any missing
    /// intermediate nodes, and sets the URL on the terminal node.
    ///
    /// Re-inserting an existing path does not duplicate children: each
    /// segment is looked up among the current node's children by name
    /// before a new node is created. Returns the terminal node's id.
    pub fn insert_with_path(&mut self, path: &str, url: &str) -> NodeId {
        let id = self.ensure_path(path);
        self.nodes[id].url = Some(url.to_string());
        id
    }

    /// Walks the path, creating missing nodes, without touching any URL
    ///
    /// New nodes default to `VisitState::New` and no URL. Also used when
    /// rebuilding a tree from a persisted snapshot, where intermediate
    /// rows carry no URL of their own.
    pub fn ensure_path(&mut self, path: &str) -> NodeId {
        let mut current = self.root();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = match self.child_by_name(current, segment) {
                Some(child) => child,
                None => {
                    let id = self.nodes.len();
                    self.nodes.push(Node::new(segment, Some(current)));
                    self.nodes[current].children.push(id);
                    id
                }
            };
        }
        current
    }

    /// Sets a node's URL directly (snapshot rebuild)
    pub fn set_url(&mut self, id: NodeId, url: &str) {
        self.nodes[id].url = Some(url.to_string());
    }

    /// Looks up the node at the given path
    ///
    /// Fails with `CanopyError::PathNotFound` if any segment is missing.
    /// Only paths produced by discovery are ever looked up, so a miss here
    /// indicates a corrupted persisted snapshot.
    pub fn node_at_path(&self, path: &str) -> Result<NodeId> {
        let mut current = self.root();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = self
                .child_by_name(current, segment)
                .ok_or_else(|| CanopyError::PathNotFound(path.to_string()))?;
        }
        Ok(current)
    }

    /// The slash-joined path of a node, relative to (and excluding) the root
    pub fn path_of(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = id;
        while let Some(parent) = self.nodes[current].parent {
            segments.push(self.nodes[current].name.as_str());
            current = parent;
        }
        segments.reverse();
        segments.join("/")
    }

    /// Finds the first leaf in pre-order whose visit state matches
    ///
    /// Returns `None` when no such leaf exists; for `VisitState::New` that
    /// signals traversal completion. With no intervening mutation, repeated
    /// calls return the same node, which fixes the crawl order across runs.
    pub fn find_leaf_with_visit_state(&self, state: VisitState) -> Option<NodeId> {
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if node.is_leaf() {
                if node.visit_state == state {
                    return Some(id);
                }
            } else {
                // Reversed so the stack pops children in discovery order
                stack.extend(node.children.iter().rev());
            }
        }
        None
    }

    /// Sets a node's visit state
    ///
    /// With `propagate` the same state is forced onto every descendant,
    /// used when starting work on a whole subtree. Upward propagation of
    /// `Visited` is not done here; the traversal coordinator infers it
    /// bottom-up from sibling states.
    pub fn set_visit_state(&mut self, id: NodeId, state: VisitState, propagate: bool) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            self.nodes[current].visit_state = state;
            if propagate {
                stack.extend(self.nodes[current].children.iter());
            }
        }
    }

    /// Returns true if every child of the node is `Visited`
    ///
    /// Vacuously true for leaves.
    pub fn children_all_visited(&self, id: NodeId) -> bool {
        self.nodes[id]
            .children
            .iter()
            .all(|&c| self.nodes[c].visit_state == VisitState::Visited)
    }

    /// Pre-order walk over all node ids, root first
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id].children.iter().rev());
        }
        order
    }

    /// Counts leaves currently in the given visit state
    pub fn count_leaves_with_visit_state(&self, state: VisitState) -> usize {
        self.preorder()
            .into_iter()
            .filter(|&id| self.nodes[id].is_leaf() && self.nodes[id].visit_state == state)
            .count()
    }

    fn child_by_name(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.nodes[id]
            .children
            .iter()
            .copied()
            .find(|&c| self.nodes[c].name == name)
    }

    fn fmt_subtree(&self, f: &mut fmt::Formatter<'_>, id: NodeId, depth: usize) -> fmt::Result {
        let node = &self.nodes[id];
        writeln!(
            f,
            "{}{} [{}]",
            "  ".repeat(depth),
            node.name,
            node.visit_state
        )?;
        for &child in &node.children {
            self.fmt_subtree(f, child, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for SiteStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_subtree(f, self.root(), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> SiteStructure {
        let mut structure = SiteStructure::new("books");
        structure.insert_with_path("fiction", "https://example.com/fiction");
        structure.insert_with_path("fiction/fantasy", "https://example.com/fiction/fantasy");
        structure.insert_with_path("fiction/horror", "https://example.com/fiction/horror");
        structure.insert_with_path("travel", "https://example.com/travel");
        structure
    }

    #[test]
    fn test_new_structure_has_only_root() {
        let structure = SiteStructure::new("books");
        assert_eq!(structure.len(), 1);
        assert_eq!(structure.node(structure.root()).name, "books");
        assert!(structure.node(structure.root()).is_leaf());
        assert!(structure.node(structure.root()).url.is_none());
    }

    #[test]
    fn test_insert_creates_intermediate_nodes() {
        let mut structure = SiteStructure::new("books");
        let id = structure.insert_with_path("a/b/c", "https://example.com/c");

        assert_eq!(structure.len(), 4);
        assert_eq!(structure.path_of(id), "a/b/c");

        // Intermediates exist but carry no URL
        let b = structure.node_at_path("a/b").unwrap();
        assert!(structure.node(b).url.is_none());
        assert_eq!(structure.node(id).url.as_deref(), Some("https://example.com/c"));
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut once = SiteStructure::new("books");
        once.insert_with_path("fiction/fantasy", "https://example.com/f");

        let mut twice = SiteStructure::new("books");
        twice.insert_with_path("fiction/fantasy", "https://example.com/f");
        twice.insert_with_path("fiction/fantasy", "https://example.com/f");

        assert_eq!(once.len(), twice.len());
        let fiction = twice.node_at_path("fiction").unwrap();
        assert_eq!(twice.node(fiction).children.len(), 1);
    }

    #[test]
    fn test_insert_sets_url_on_existing_intermediate() {
        let mut structure = SiteStructure::new("books");
        structure.insert_with_path("fiction/fantasy", "https://example.com/f");
        structure.insert_with_path("fiction", "https://example.com/fiction");

        let fiction = structure.node_at_path("fiction").unwrap();
        assert_eq!(
            structure.node(fiction).url.as_deref(),
            Some("https://example.com/fiction")
        );
        assert_eq!(structure.len(), 3);
    }

    #[test]
    fn test_node_at_path_missing_segment() {
        let structure = sample_tree();
        let result = structure.node_at_path("fiction/scifi");
        assert!(matches!(result, Err(CanopyError::PathNotFound(_))));
    }

    #[test]
    fn test_path_of_root_is_empty() {
        let structure = sample_tree();
        assert_eq!(structure.path_of(structure.root()), "");
    }

    #[test]
    fn test_find_leaf_prefers_preorder_first() {
        let structure = sample_tree();
        let leaf = structure.find_leaf_with_visit_state(VisitState::New).unwrap();
        assert_eq!(structure.path_of(leaf), "fiction/fantasy");

        // Deterministic: repeated calls with no mutation agree
        let again = structure.find_leaf_with_visit_state(VisitState::New).unwrap();
        assert_eq!(leaf, again);
    }

    #[test]
    fn test_find_leaf_skips_non_matching_states() {
        let mut structure = sample_tree();
        let fantasy = structure.node_at_path("fiction/fantasy").unwrap();
        structure.set_visit_state(fantasy, VisitState::Visited, false);

        let leaf = structure.find_leaf_with_visit_state(VisitState::New).unwrap();
        assert_eq!(structure.path_of(leaf), "fiction/horror");
    }

    #[test]
    fn test_find_leaf_none_when_all_visited() {
        let mut structure = sample_tree();
        structure.set_visit_state(structure.root(), VisitState::Visited, true);
        assert!(structure
            .find_leaf_with_visit_state(VisitState::New)
            .is_none());
    }

    #[test]
    fn test_root_is_leaf_in_degenerate_tree() {
        let structure = SiteStructure::new("books");
        let leaf = structure.find_leaf_with_visit_state(VisitState::New).unwrap();
        assert_eq!(leaf, structure.root());
    }

    #[test]
    fn test_set_visit_state_propagates_to_descendants() {
        let mut structure = sample_tree();
        let fiction = structure.node_at_path("fiction").unwrap();
        structure.set_visit_state(fiction, VisitState::InProgress, true);

        for path in ["fiction", "fiction/fantasy", "fiction/horror"] {
            let id = structure.node_at_path(path).unwrap();
            assert_eq!(structure.node(id).visit_state, VisitState::InProgress);
        }
        // Siblings outside the subtree are untouched
        let travel = structure.node_at_path("travel").unwrap();
        assert_eq!(structure.node(travel).visit_state, VisitState::New);
    }

    #[test]
    fn test_set_visit_state_without_propagation() {
        let mut structure = sample_tree();
        let fiction = structure.node_at_path("fiction").unwrap();
        structure.set_visit_state(fiction, VisitState::Visited, false);

        let fantasy = structure.node_at_path("fiction/fantasy").unwrap();
        assert_eq!(structure.node(fantasy).visit_state, VisitState::New);
    }

    #[test]
    fn test_children_all_visited() {
        let mut structure = sample_tree();
        let fiction = structure.node_at_path("fiction").unwrap();
        assert!(!structure.children_all_visited(fiction));

        let fantasy = structure.node_at_path("fiction/fantasy").unwrap();
        let horror = structure.node_at_path("fiction/horror").unwrap();
        structure.set_visit_state(fantasy, VisitState::Visited, false);
        assert!(!structure.children_all_visited(fiction));
        structure.set_visit_state(horror, VisitState::Visited, false);
        assert!(structure.children_all_visited(fiction));
    }

    #[test]
    fn test_preorder_order() {
        let structure = sample_tree();
        let paths: Vec<String> = structure
            .preorder()
            .into_iter()
            .map(|id| structure.path_of(id))
            .collect();
        assert_eq!(
            paths,
            vec!["", "fiction", "fiction/fantasy", "fiction/horror", "travel"]
        );
    }

    #[test]
    fn test_display_renders_indented_tree() {
        let structure = sample_tree();
        let rendered = structure.to_string();
        assert!(rendered.contains("books [new]"));
        assert!(rendered.contains("  fiction [new]"));
        assert!(rendered.contains("    fantasy [new]"));
    }
}
