//! Tree operations: insert, attach, remove, walk.

use std::collections::VecDeque;

use slotmap::{SecondaryMap, SlotMap};

use super::node::{NodeId, NodeKind, RenderNode};
use crate::path::NamePath;

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[NodeId] = &[];

/// The output of a render pass, backed by a slotmap arena.
///
/// Nodes are created detached with [`insert`](Self::insert) and attached with
/// [`append_child`](Self::append_child), so widgets can build subtrees
/// bottom-up and hand back only the subtree root.
#[derive(Debug, Clone)]
pub struct RenderTree {
    nodes: SlotMap<NodeId, RenderNode>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    root: Option<NodeId>,
}

impl RenderTree {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            root: None,
        }
    }

    /// Insert a detached node.
    pub fn insert(&mut self, node: impl Into<RenderNode>) -> NodeId {
        let id = self.nodes.insert(node.into());
        self.children.insert(id, Vec::new());
        id
    }

    /// Insert a node as the last child of `parent`.
    pub fn insert_child(&mut self, parent: NodeId, node: impl Into<RenderNode>) -> NodeId {
        let id = self.insert(node);
        self.append_child(parent, id);
        id
    }

    /// Attach `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    ///
    /// # Panics
    ///
    /// Panics (debug) if either node does not exist.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(self.nodes.contains_key(parent), "parent does not exist");
        debug_assert!(self.nodes.contains_key(child), "child does not exist");

        self.detach(child);
        self.parent.insert(child, parent);
        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.push(child);
        }
    }

    /// Attach every node of `children` to `parent`, in order.
    pub fn append_children(&mut self, parent: NodeId, children: impl IntoIterator<Item = NodeId>) {
        for child in children {
            self.append_child(parent, child);
        }
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(old_parent) = self.parent.remove(id) {
            if let Some(siblings) = self.children.get_mut(old_parent) {
                siblings.retain(|&child| child != id);
            }
        }
    }

    /// Remove a node and all its descendants.
    ///
    /// Returns the removed node, or `None` if it didn't exist.
    pub fn remove(&mut self, id: NodeId) -> Option<RenderNode> {
        if !self.nodes.contains_key(id) {
            return None;
        }

        self.detach(id);
        if self.root == Some(id) {
            self.root = None;
        }

        let mut to_remove = VecDeque::new();
        to_remove.push_back(id);
        let mut removed = None;

        while let Some(current) = to_remove.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                to_remove.extend(kids);
            }
            self.parent.remove(current);
            let node = self.nodes.remove(current);
            if current == id {
                removed = node;
            }
        }

        removed
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// Children of a node; empty if it has none or does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    pub fn get(&self, id: NodeId) -> Option<&RenderNode> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut RenderNode> {
        self.nodes.get_mut(id)
    }

    /// Shorthand for the kind of an existing node.
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(id).map(|node| &node.kind)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    /// Number of nodes in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// Pre-order traversal from the root; empty without one.
    pub fn walk_root(&self) -> Vec<NodeId> {
        self.root.map(|root| self.walk(root)).unwrap_or_default()
    }

    /// Names of every named wrapper reachable from the root, in tree order.
    pub fn registrations(&self) -> Vec<NamePath> {
        self.walk_root()
            .into_iter()
            .filter_map(|id| self.nodes.get(id)?.form_item_name())
            .filter(|name| !name.is_empty())
            .cloned()
            .collect()
    }
}

impl Default for RenderTree {
    fn default() -> Self {
        Self::new()
    }
}
