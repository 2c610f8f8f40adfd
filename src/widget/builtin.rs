//! Default input widgets.

use super::traits::{Widget, WidgetInput};
use crate::engine::RenderCx;
use crate::render::NodeId;

/// A generic input: one element carrying the resolved props, the field's
/// identifier and the form's root prefix.
///
/// Stands in for a concrete control until the rendering layer maps the
/// element onto one.
#[derive(Debug, Clone)]
pub struct InputWidget {
    widget_type: String,
}

impl InputWidget {
    pub fn new(widget_type: impl Into<String>) -> Self {
        Self {
            widget_type: widget_type.into(),
        }
    }
}

impl Widget for InputWidget {
    fn widget_type(&self) -> &str {
        &self.widget_type
    }

    fn render(&self, cx: &mut RenderCx<'_>, input: WidgetInput<'_>) -> Option<NodeId> {
        let attrs = input.props.attrs().cloned().unwrap_or_default();
        Some(cx.element(&self.widget_type, attrs, &input))
    }
}
