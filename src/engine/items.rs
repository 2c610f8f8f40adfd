//! Field list renderer: a sequence of descriptors to one container.

use super::RenderCx;
use crate::descriptor::{FieldDescriptor, Layout, RowProps};
use crate::path::ScopeContext;
use crate::render::{NodeId, NodeKind};

impl RenderCx<'_> {
    /// Render `items` in order into a single container and return it.
    ///
    /// Inline layout groups the slots in a fragment. Otherwise they share one
    /// grid row, configured by `row_props` or the standard 16-unit gutter.
    pub fn render_items(
        &mut self,
        items: &[FieldDescriptor],
        scope: &ScopeContext,
        row_props: Option<&RowProps>,
    ) -> NodeId {
        let container = match self.layout {
            Layout::Inline => NodeKind::Fragment,
            Layout::Horizontal | Layout::Vertical => {
                NodeKind::Row(row_props.cloned().unwrap_or_else(RowProps::standard))
            }
        };
        let container = self.tree.insert(container);

        for (index, field) in items.iter().enumerate() {
            if let Some(slot) = self.render_item(field, scope, index) {
                self.tree.append_child(container, slot);
            }
        }
        container
    }
}

#[cfg(test)]
mod tests {
    use crate::descriptor::{FieldDescriptor, Gutter, ItemProps, Layout, Props, RowProps};
    use crate::engine::{RenderCx, ResolutionCache};
    use crate::host::FormStore;
    use crate::path::ScopeContext;
    use crate::prop::Prop;
    use crate::registry::ComponentRegistry;
    use crate::render::{subtree_to_string, RenderTree};
    use serde_json::json;

    fn render(items: &[FieldDescriptor], layout: Layout, row_props: Option<&RowProps>) -> String {
        let store = FormStore::with_values(json!({ "showB": false }));
        let registry = ComponentRegistry::with_defaults();
        let mut cache = ResolutionCache::new();
        let mut tree = RenderTree::new();
        let mut cx = RenderCx::new(&mut tree, &store, &registry, &mut cache, layout);
        let node = cx.render_items(items, &ScopeContext::new(), row_props);
        subtree_to_string(&tree, node)
    }

    fn text(name: &str) -> FieldDescriptor {
        FieldDescriptor::widget("text", Props::new()).with_item(ItemProps::named(name))
    }

    #[test]
    fn horizontal_wraps_in_standard_row() {
        let out = render(&[text("a"), text("b")], Layout::Horizontal, None);
        insta::assert_snapshot!(out, @r###"
        Row gutter=16
          Col span=24 [item-0]
            FormItem name=a
              Element text name=a
          Col span=24 [item-1]
            FormItem name=b
              Element text name=b
        "###);
    }

    #[test]
    fn inline_is_a_fragment() {
        let out = render(&[text("a"), text("b")], Layout::Inline, None);
        insta::assert_snapshot!(out, @r###"
        Fragment
          FormItem name=a [item-0]
            Element text name=a
          FormItem name=b [item-1]
            Element text name=b
        "###);
    }

    #[test]
    fn caller_row_props_win() {
        let row = RowProps::new().with_gutter(Gutter::Pair(24, 8)).with_justify("end");
        let out = render(&[text("a")], Layout::Vertical, Some(&row));
        assert!(out.starts_with("Row gutter=24,8 justify=end\n"));
    }

    #[test]
    fn one_slot_per_visible_descriptor_in_order() {
        let items = vec![
            text("a"),
            text("b").with_hidden(Prop::computed(|_, values| values["showB"] != json!(true))),
            FieldDescriptor::widget("password", Props::new()).with_item(ItemProps::named("c")),
            FieldDescriptor::custom(None, Props::new()),
        ];
        let out = render(&items, Layout::Horizontal, None);
        let top_level: Vec<_> = out
            .lines()
            .filter(|line| line.starts_with("  Col"))
            .collect();
        assert_eq!(
            top_level,
            vec!["  Col span=24 [item-0]", "  Col span=24 [item-2]", "  Col span=24 [item-3]"]
        );
    }
}
