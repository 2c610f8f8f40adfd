//! Render output: an arena tree of form nodes, independent of any UI toolkit.

pub mod node;
pub mod outline;
pub mod query;
pub mod tree;

pub use node::{NodeId, NodeKind, RenderNode};
pub use outline::{render_to_string, subtree_to_string};
pub use tree::RenderTree;
