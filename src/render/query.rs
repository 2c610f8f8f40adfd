//! Render tree queries: by name, kind, predicate.

use super::node::{NodeId, NodeKind, RenderNode};
use super::tree::RenderTree;
use crate::path::NamePath;

impl RenderTree {
    /// The wrapper registered under `name`, searching from the root.
    pub fn find_form_item(&self, name: &NamePath) -> Option<NodeId> {
        self.walk_root()
            .into_iter()
            .find(|&id| self.get(id).and_then(RenderNode::form_item_name) == Some(name))
    }

    /// Every node reachable from the root matching `predicate`, in tree order.
    pub fn query_all(&self, predicate: impl Fn(&RenderNode) -> bool) -> Vec<NodeId> {
        self.walk_root()
            .into_iter()
            .filter(|&id| self.get(id).is_some_and(&predicate))
            .collect()
    }

    /// Wrapper nodes in tree order.
    pub fn form_items(&self) -> Vec<NodeId> {
        self.query_all(|node| matches!(node.kind, NodeKind::FormItem { .. }))
    }

    /// Elements produced by widgets of `widget_type`.
    pub fn elements_of(&self, widget_type: &str) -> Vec<NodeId> {
        self.query_all(|node| {
            matches!(&node.kind, NodeKind::Element { widget_type: t, .. } if t == widget_type)
        })
    }

    /// Messages of every placeholder in the tree.
    pub fn placeholders(&self) -> Vec<String> {
        self.walk_root()
            .into_iter()
            .filter_map(|id| match self.kind(id)? {
                NodeKind::Placeholder(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    /// Keys of the children of `id`, `None` for unkeyed ones.
    pub fn child_keys(&self, id: NodeId) -> Vec<Option<&str>> {
        self.children(id)
            .iter()
            .map(|&child| self.get(child).and_then(|node| node.key.as_deref()))
            .collect()
    }
}
