//! Category tree module
//!
//! This module holds the data model for a site's category hierarchy:
//!
//! - `Node`: a single named, URL-addressed category with a visit state
//! - `SiteStructure`: the arena-backed tree owning all nodes
//!
//! Nodes are addressed by slash-joined paths of category names relative to
//! the root (the root itself is the site name and is not part of any path).

mod node;
mod tree;

pub use node::{Node, NodeId};
pub use tree::SiteStructure;
