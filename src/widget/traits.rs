//! Widget trait: turn resolved input props into render nodes.
//!
//! A widget is the concrete implementation behind a registry tag. It receives
//! the field's resolved input configuration plus its place in the form and
//! builds a (detached) subtree, returning its root.

use std::fmt;
use std::sync::Arc;

use crate::descriptor::InputProps;
use crate::engine::RenderCx;
use crate::path::{NamePath, ScopeContext};
use crate::render::NodeId;

// ---------------------------------------------------------------------------
// Widget trait
// ---------------------------------------------------------------------------

/// Core trait implemented by everything the registry can hold.
///
/// Object-safe; registries store widgets as [`Component`]s shared across
/// threads, so implementations must be `Send + Sync`.
pub trait Widget: Send + Sync {
    /// The type name this widget renders as (e.g. `"text"`).
    fn widget_type(&self) -> &str;

    /// Build this widget's output for one field.
    ///
    /// Returns `None` to render nothing.
    fn render(&self, cx: &mut RenderCx<'_>, input: WidgetInput<'_>) -> Option<NodeId>;
}

/// A shared widget, as stored in a registry or on a `custom` field.
pub type Component = Arc<dyn Widget>;

/// Everything a widget learns about the field it renders.
#[derive(Debug, Clone, Copy)]
pub struct WidgetInput<'a> {
    /// Resolved widget configuration.
    pub props: &'a InputProps,
    /// The field's full identifier when it has a named wrapper.
    pub name: Option<&'a NamePath>,
    /// The scope the field sits in. Its root is the form's name prefix.
    pub scope: &'a ScopeContext,
}

// ---------------------------------------------------------------------------
// FnWidget
// ---------------------------------------------------------------------------

type RenderFn = dyn Fn(&mut RenderCx<'_>, WidgetInput<'_>) -> Option<NodeId> + Send + Sync;

/// A widget defined by a closure.
pub struct FnWidget {
    widget_type: String,
    render: Box<RenderFn>,
}

impl FnWidget {
    pub fn new(
        widget_type: impl Into<String>,
        render: impl Fn(&mut RenderCx<'_>, WidgetInput<'_>) -> Option<NodeId> + Send + Sync + 'static,
    ) -> Self {
        Self {
            widget_type: widget_type.into(),
            render: Box::new(render),
        }
    }

    /// Wrap into a shareable [`Component`].
    pub fn into_component(self) -> Component {
        Arc::new(self)
    }
}

impl Widget for FnWidget {
    fn widget_type(&self) -> &str {
        &self.widget_type
    }

    fn render(&self, cx: &mut RenderCx<'_>, input: WidgetInput<'_>) -> Option<NodeId> {
        (self.render)(cx, input)
    }
}

impl fmt::Debug for FnWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnWidget")
            .field("widget_type", &self.widget_type)
            .finish()
    }
}

/// Shorthand for `FnWidget::new(..).into_component()`.
pub fn widget_fn(
    widget_type: impl Into<String>,
    render: impl Fn(&mut RenderCx<'_>, WidgetInput<'_>) -> Option<NodeId> + Send + Sync + 'static,
) -> Component {
    FnWidget::new(widget_type, render).into_component()
}
