use crate::state::VisitState;

/// Index of a node inside its owning `SiteStructure` arena.
///
/// Parent back-references are stored as indices rather than owning
/// pointers, so the tree's lifetime is owned solely top-down by the arena.
pub type NodeId = usize;

/// A single category in the site structure
#[derive(Debug, Clone)]
pub struct Node {
    /// Category name; unique among its siblings
    pub name: String,

    /// The category's address, set once from discovery.
    /// `None` for intermediate nodes that were created as path segments
    /// and for the root.
    pub url: Option<String>,

    /// Where this category is in the traversal lifecycle
    pub visit_state: VisitState,

    /// Parent index; `None` at the root
    pub parent: Option<NodeId>,

    /// Child indices in discovery order
    pub children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(name: &str, parent: Option<NodeId>) -> Self {
        Self {
            name: name.to_string(),
            url: None,
            visit_state: VisitState::New,
            parent,
            children: Vec::new(),
        }
    }

    /// Returns true if this node has no sub-categories
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
