//! The rendering engine.
//!
//! One render pass walks the descriptors top-down:
//!
//! ```text
//! render_items (field list)
//!   -> render_item (one field)
//!        -> resolve_field (literal or computed properties, scoped values)
//!        -> ScopeContext::compose (full identifier)
//!        -> registry lookup -> Widget::render
//!             -> ListWidget -> render_items per entry, scope pushed
//! ```
//!
//! Everything is threaded through a [`RenderCx`], which owns nothing but
//! borrows the output tree, the host, the registry and the cache of static
//! resolutions.

use std::collections::{HashMap, HashSet};

use crate::descriptor::{DescriptorId, Layout, Props, ResolvedField};
use crate::host::FormHost;
use crate::registry::ComponentRegistry;
use crate::render::{NodeId, NodeKind, RenderTree};
use crate::widget::WidgetInput;

mod item;
mod items;
mod list;
mod resolve;

pub use list::ListWidget;

/// Placeholder text for a `custom` field without a component.
pub const CUSTOM_UNIMPLEMENTED: &str = "Custom field is not implemented.";

/// What happened during one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Fields whose properties were evaluated.
    pub resolved: usize,
    /// Static fields served from the cache.
    pub reused: usize,
    /// Fields that resolved hidden.
    pub hidden: usize,
}

/// Resolutions of static fields, kept across passes by slot identity.
///
/// An entry only answers for the descriptor that produced it: a computed
/// parent that hands a different descriptor to the same slot resolves it
/// afresh. A slot not visited during a pass is dropped when it finishes, so
/// a field that disappears and comes back resolves afresh too.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    slots: HashMap<String, (DescriptorId, ResolvedField)>,
    touched: HashSet<String>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.touched.clear();
    }

    pub(crate) fn begin_pass(&mut self) {
        self.touched.clear();
    }

    pub(crate) fn finish_pass(&mut self) {
        let touched = &self.touched;
        self.slots.retain(|slot, _| touched.contains(slot));
    }

    fn get(&mut self, slot: &str, id: DescriptorId) -> Option<&ResolvedField> {
        match self.slots.get(slot) {
            Some((cached_id, found)) if *cached_id == id => {
                self.touched.insert(slot.to_owned());
                Some(found)
            }
            _ => None,
        }
    }

    fn insert(&mut self, slot: String, id: DescriptorId, field: ResolvedField) {
        self.touched.insert(slot.clone());
        self.slots.insert(slot, (id, field));
    }
}

/// Render context handed to every widget.
pub struct RenderCx<'a> {
    /// The tree being built.
    pub tree: &'a mut RenderTree,
    /// Form-state host the pass reads from.
    pub host: &'a dyn FormHost,
    registry: &'a ComponentRegistry,
    cache: &'a mut ResolutionCache,
    layout: Layout,
    stats: PassStats,
}

impl<'a> RenderCx<'a> {
    pub fn new(
        tree: &'a mut RenderTree,
        host: &'a dyn FormHost,
        registry: &'a ComponentRegistry,
        cache: &'a mut ResolutionCache,
        layout: Layout,
    ) -> Self {
        Self {
            tree,
            host,
            registry,
            cache,
            layout,
            stats: PassStats::default(),
        }
    }

    /// The layout mode of the form being rendered.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn registry(&self) -> &ComponentRegistry {
        self.registry
    }

    /// Counters so far.
    pub fn stats(&self) -> PassStats {
        self.stats
    }

    /// A detached element node for a widget's output.
    pub fn element(&mut self, widget_type: &str, attrs: Props, input: &WidgetInput<'_>) -> NodeId {
        self.tree.insert(NodeKind::Element {
            widget_type: widget_type.to_owned(),
            attrs,
            name: input.name.cloned(),
            root: input.scope.root().clone(),
        })
    }

    /// A detached placeholder node.
    pub fn placeholder(&mut self, message: impl Into<String>) -> NodeId {
        self.tree.insert(NodeKind::Placeholder(message.into()))
    }
}
