//! Text outline of a render tree, for snapshots and debugging.
//!
//! One node per line, indented two spaces per depth:
//!
//! ```text
//! Form layout=horizontal
//!   Row gutter=16
//!     Col span=24 [item-0]
//!       FormItem name=email label="Email"
//!         Element text name=email
//! ```

use std::fmt::Write as _;

use super::node::NodeId;
use super::tree::RenderTree;

/// Outline of the tree from its root; empty without one.
///
/// Lines are separated by `'\n'`. The final line has no trailing newline.
pub fn render_to_string(tree: &RenderTree) -> String {
    match tree.root() {
        Some(root) => subtree_to_string(tree, root),
        None => String::new(),
    }
}

/// Outline of the subtree rooted at `id`.
pub fn subtree_to_string(tree: &RenderTree, id: NodeId) -> String {
    let mut lines = Vec::new();
    write_node(tree, id, 0, &mut lines);
    lines.join("\n")
}

fn write_node(tree: &RenderTree, id: NodeId, depth: usize, lines: &mut Vec<String>) {
    let Some(node) = tree.get(id) else {
        return;
    };

    let mut line = "  ".repeat(depth);
    let _ = write!(line, "{}", node.kind);
    if let Some(key) = &node.key {
        let _ = write!(line, " [{key}]");
    }
    lines.push(line);

    for &child in tree.children(id) {
        write_node(tree, child, depth + 1, lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ColProps, Layout, RowProps};
    use crate::render::node::{NodeKind, RenderNode};

    #[test]
    fn empty_tree_is_empty_string() {
        assert_eq!(render_to_string(&RenderTree::new()), "");
    }

    #[test]
    fn nested_outline() {
        let mut tree = RenderTree::new();
        let form = tree.insert(NodeKind::Form {
            layout: Layout::Horizontal,
        });
        tree.set_root(form);
        let row = tree.insert_child(form, NodeKind::Row(RowProps::standard()));
        let col = tree.insert_child(
            row,
            RenderNode::new(NodeKind::Col(ColProps::full())).with_key("item-0"),
        );
        tree.insert_child(col, NodeKind::Text("hi".into()));

        insta::assert_snapshot!(render_to_string(&tree), @r###"
        Form layout=horizontal
          Row gutter=16
            Col span=24 [item-0]
              Text "hi"
        "###);
    }

    #[test]
    fn subtree_starts_at_zero_indent() {
        let mut tree = RenderTree::new();
        let root = tree.insert(NodeKind::Fragment);
        let child = tree.insert_child(root, NodeKind::Text("x".into()));
        assert_eq!(subtree_to_string(&tree, child), "Text \"x\"");
    }
}
