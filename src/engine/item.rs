//! Field renderer: one descriptor to one layout slot.

use std::sync::Arc;

use super::{RenderCx, CUSTOM_UNIMPLEMENTED};
use crate::descriptor::{ColSpan, FieldDescriptor, FieldType, InputProps, Layout};
use crate::host::ListEntry;
use crate::path::{NamePath, ScopeContext};
use crate::registry::LIST_TAG;
use crate::render::{NodeId, NodeKind};
use crate::widget::WidgetInput;

/// Key of the slot at `index`: the entry key inside a list, `item` outside.
///
/// An entry key of `0` is a real key and is used as is (`0-1`), so the first
/// entry's slots never collide with the slots of fields outside any list.
pub(crate) fn item_key(entry: Option<ListEntry>, index: usize) -> String {
    match entry {
        Some(entry) => format!("{}-{index}", entry.key),
        None => format!("item-{index}"),
    }
}

impl RenderCx<'_> {
    /// Render the field at position `index` of its list.
    ///
    /// Returns the slot node (a column, or the bare content in inline
    /// layout), or `None` when the field renders nothing.
    pub fn render_item(
        &mut self,
        field: &FieldDescriptor,
        scope: &ScopeContext,
        index: usize,
    ) -> Option<NodeId> {
        let slot = format!("{}/{index}:{}", scope.slot_prefix(), field.type_name());
        let resolved = self.resolve_field(field, scope, &slot);
        if resolved.hidden {
            self.stats.hidden += 1;
            return None;
        }

        let content = if resolved.item_props.is_empty() {
            self.render_widget(field.field_type(), &resolved.input_props, None, scope)?
        } else {
            let relative = resolved.item_props.name.clone().unwrap_or_default();
            let name = scope.compose(&relative);
            let wrapper = self.tree.insert(NodeKind::FormItem {
                name: name.clone(),
                props: resolved.item_props,
                list_field: scope.entry().is_some(),
            });
            if let Some(widget) =
                self.render_widget(field.field_type(), &resolved.input_props, Some(&name), scope)
            {
                self.tree.append_child(wrapper, widget);
            }
            wrapper
        };

        let node = match self.layout {
            Layout::Inline => content,
            Layout::Horizontal | Layout::Vertical => {
                let col = self
                    .tree
                    .insert(NodeKind::Col(ColSpan::resolve(resolved.col.as_ref())));
                self.tree.append_child(col, content);
                col
            }
        };
        if let Some(slot_node) = self.tree.get_mut(node) {
            slot_node.key = Some(item_key(scope.entry(), index));
        }
        Some(node)
    }

    /// Look up and run the widget for `field_type`.
    ///
    /// Never fails: an unregistered tag or a component-less `custom` field
    /// renders a placeholder instead.
    fn render_widget(
        &mut self,
        field_type: &FieldType,
        props: &InputProps,
        name: Option<&NamePath>,
        scope: &ScopeContext,
    ) -> Option<NodeId> {
        let tag = match field_type {
            FieldType::Hidden { .. } => return None,
            FieldType::Custom {
                component: Some(component),
                ..
            } => {
                let component = Arc::clone(component);
                return component.render(self, WidgetInput { props, name, scope });
            }
            FieldType::Custom {
                component: None, ..
            } => return Some(self.placeholder(CUSTOM_UNIMPLEMENTED)),
            FieldType::Widget { tag, .. } => tag.as_str(),
            FieldType::List { .. } => LIST_TAG,
        };

        let Some(component) = self.registry.get(tag) else {
            tracing::debug!(%tag, "input not registered");
            return Some(self.placeholder(format!("Input {tag} is not registered")));
        };
        component.render(self, WidgetInput { props, name, scope })
    }
}
