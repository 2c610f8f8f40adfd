//! Repeatable list renderer.

use std::collections::HashSet;

use super::RenderCx;
use crate::render::{NodeId, NodeKind, RenderNode};
use crate::widget::{Widget, WidgetInput};

/// The widget behind the `list` tag.
///
/// Binds the list named by the field (its wrapper name, else the list
/// props' `name`, relative to the field's scope), then renders the item
/// descriptors once per entry with that entry pushed onto the scope.
///
/// ```text
/// List name=contacts
///   Fragment [<entry key>]
///     Row gutter=16
///       Col span=24 [<entry key>-0]
///         FormItem name=contacts.<index>.email list-field
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ListWidget;

impl Widget for ListWidget {
    fn widget_type(&self) -> &str {
        "list"
    }

    fn render(&self, cx: &mut RenderCx<'_>, input: WidgetInput<'_>) -> Option<NodeId> {
        let Some(list) = input.props.as_list() else {
            return Some(cx.placeholder("List field has no list configuration"));
        };

        let relative = input
            .name
            .and_then(|name| name.strip_prefix(&input.scope.path()))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| list.name.clone());
        let path = input.scope.compose(&relative);

        let entries = cx.host.list_entries(&path);
        let operations = cx.host.list_operations(&path);

        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.key) {
                tracing::warn!(list = %path, key = entry.key, "duplicate list entry key");
            }
        }

        let mut rendered = Vec::with_capacity(entries.len());
        for entry in &entries {
            let scope = input.scope.push_entry(relative.clone(), *entry);
            let mut content = cx.render_items(&list.items, &scope, list.row_props.as_ref());
            if let Some(item_render) = &list.item_render {
                content = item_render(cx.tree, content, entry, &operations);
            }

            let fragment = cx
                .tree
                .insert(RenderNode::new(NodeKind::Fragment).with_key(entry.key.to_string()));
            cx.tree.append_child(fragment, content);
            rendered.push(fragment);
        }

        let body = match &list.list_render {
            Some(list_render) => vec![list_render(cx.tree, rendered, &entries, &operations)],
            None => rendered,
        };

        let node = cx.tree.insert(NodeKind::List { name: path });
        cx.tree.append_children(node, body);
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{FieldDescriptor, ItemProps, Layout, ListProps, Props};
    use crate::engine::ResolutionCache;
    use crate::host::{FormHost, FormStore, ListEntry, ListHandle, Subscription};
    use crate::path::{NamePath, ScopeContext};
    use crate::registry::ComponentRegistry;
    use crate::render::{subtree_to_string, RenderTree};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::io;
    use std::sync::{Arc, Mutex};

    fn contacts() -> FieldDescriptor {
        FieldDescriptor::list(ListProps::new(
            "contacts",
            vec![FieldDescriptor::widget("text", Props::new()).with_item(ItemProps::named("email"))],
        ))
    }

    fn render(store: &FormStore, field: &FieldDescriptor, scope: &ScopeContext) -> String {
        let registry = ComponentRegistry::with_defaults();
        let mut cache = ResolutionCache::new();
        let mut tree = RenderTree::new();
        let mut cx = RenderCx::new(&mut tree, store, &registry, &mut cache, Layout::Inline);
        match cx.render_item(field, scope, 0) {
            Some(node) => subtree_to_string(&tree, node),
            None => String::new(),
        }
    }

    #[test]
    fn one_fragment_per_entry() {
        let store = FormStore::with_values(json!({ "contacts": [{}, {}] }));
        let out = render(&store, &contacts(), &ScopeContext::new());
        insta::assert_snapshot!(out, @r###"
        List name=contacts [item-0]
          Fragment [0]
            Fragment
              FormItem name=contacts.0.email list-field [0-0]
                Element text name=contacts.0.email
          Fragment [1]
            Fragment
              FormItem name=contacts.1.email list-field [1-0]
                Element text name=contacts.1.email
        "###);
    }

    #[test]
    fn wrapper_name_binds_the_list() {
        let store = FormStore::with_values(json!({ "people": [{}] }));
        let field = contacts().with_item(ItemProps::named("people").with_label("People"));
        let out = render(&store, &field, &ScopeContext::new());
        assert!(out.starts_with("FormItem name=people label=\"People\" [item-0]\n  List name=people"));
        assert!(out.contains("FormItem name=people.0.email list-field"));
    }

    #[test]
    fn nested_list_composes_full_path() {
        let store = FormStore::with_values(json!({
            "groups": [{ "contacts": [{}, {}, {}] }]
        }));
        let field = FieldDescriptor::list(ListProps::new("groups", vec![contacts()]));
        let out = render(&store, &field, &ScopeContext::new());
        assert!(out.contains("List name=groups.0.contacts"));
        assert!(out.contains("FormItem name=groups.0.contacts.2.email list-field"));
    }

    #[test]
    fn root_prefix_applies() {
        let store = FormStore::with_values(json!({ "profile": { "contacts": [{}] } }));
        let out = render(&store, &contacts(), &ScopeContext::with_root(NamePath::key("profile")));
        assert!(out.contains("FormItem name=profile.contacts.0.email"));
        assert!(out.contains("root=profile"));
    }

    #[test]
    fn empty_list_renders_list_node_only() {
        let store = FormStore::new();
        let out = render(&store, &contacts(), &ScopeContext::new());
        assert_eq!(out, "List name=contacts [item-0]");
    }

    #[test]
    fn item_and_list_render_transforms() {
        let store = FormStore::with_values(json!({ "contacts": [{}, {}] }));
        let props = ListProps::new(
            "contacts",
            vec![FieldDescriptor::widget("text", Props::new()).with_item(ItemProps::named("email"))],
        )
        .with_item_render(|tree, content, entry, _ops| {
            let card = tree.insert(NodeKind::Text(format!("entry {}", entry.index)));
            tree.append_child(card, content);
            card
        })
        .with_list_render(|tree, entries, raw, _ops| {
            let wrapper = tree.insert(NodeKind::Text(format!("{} entries", raw.len())));
            tree.append_children(wrapper, entries);
            wrapper
        });
        let out = render(&store, &FieldDescriptor::list(props), &ScopeContext::new());
        let lines: Vec<_> = out.lines().take(4).collect();
        assert_eq!(
            lines,
            vec![
                "List name=contacts [item-0]",
                "  Text \"2 entries\"",
                "    Fragment [0]",
                "      Text \"entry 0\"",
            ]
        );
    }

    #[test]
    fn operations_reach_the_store() {
        let store = FormStore::with_values(json!({ "contacts": [{}] }));
        let props = ListProps::new("contacts", vec![]).with_list_render(|tree, entries, _raw, ops| {
            ops.add(Some(json!({ "email": "new" })), None).unwrap();
            let fragment = tree.insert(NodeKind::Fragment);
            tree.append_children(fragment, entries);
            fragment
        });
        render(&store, &FieldDescriptor::list(props), &ScopeContext::new());
        assert_eq!(store.value_at(&NamePath::key("contacts")), Some(json!([{}, { "email": "new" }])));
    }

    /// A host that hands out the same key for every entry.
    struct DuplicateKeys(FormStore);

    impl FormHost for DuplicateKeys {
        fn values(&self) -> Value {
            self.0.values()
        }

        fn register_field(&self, name: &NamePath, props: &ItemProps) {
            self.0.register_field(name, props);
        }

        fn unregister_field(&self, name: &NamePath) {
            self.0.unregister_field(name);
        }

        fn subscribe(&self, callback: Box<dyn FnMut()>) -> Subscription {
            self.0.subscribe(callback)
        }

        fn list_entries(&self, name: &NamePath) -> Vec<ListEntry> {
            self.0
                .list_entries(name)
                .into_iter()
                .map(|entry| ListEntry { key: 7, ..entry })
                .collect()
        }

        fn list_operations(&self, name: &NamePath) -> ListHandle {
            self.0.list_operations(name)
        }
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn duplicate_keys_warn_and_render_every_entry() {
        let host = DuplicateKeys(FormStore::with_values(json!({ "contacts": [{}, {}] })));
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .finish();

        let out = tracing::subscriber::with_default(subscriber, || {
            let registry = ComponentRegistry::with_defaults();
            let mut cache = ResolutionCache::new();
            let mut tree = RenderTree::new();
            let mut cx = RenderCx::new(&mut tree, &host, &registry, &mut cache, Layout::Inline);
            let node = cx.render_item(&contacts(), &ScopeContext::new(), 0).unwrap();
            subtree_to_string(&tree, node)
        });

        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert_eq!(logs.matches("duplicate list entry key").count(), 1);
        assert!(logs.contains("key=7"));
        assert_eq!(out.matches("Fragment [7]").count(), 2);
        assert!(out.contains("FormItem name=contacts.0.email list-field [7-0]"));
        assert!(out.contains("FormItem name=contacts.1.email list-field [7-0]"));
    }

    #[test]
    fn non_list_props_degrade() {
        let store = FormStore::new();
        let field = FieldDescriptor::widget("list", Props::new());
        let out = render(&store, &field, &ScopeContext::new());
        assert_eq!(out, "Placeholder \"List field has no list configuration\" [item-0]");
    }
}
