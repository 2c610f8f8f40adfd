//! Node types: NodeId, RenderNode, NodeKind.

use std::fmt;

use slotmap::new_key_type;

use crate::descriptor::{ColProps, Gutter, ItemProps, Layout, Props, RowProps};
use crate::path::NamePath;

new_key_type! {
    /// Identifier of a node in a [`RenderTree`](super::RenderTree).
    pub struct NodeId;
}

/// What a node stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// The outer form container.
    Form { layout: Layout },
    /// Groups children without adding structure.
    Fragment,
    /// A grid row.
    Row(RowProps),
    /// A grid column.
    Col(ColProps),
    /// The host's field wrapper (label, validation, binding).
    FormItem {
        /// Full identifier. Empty when the wrapper has no name.
        name: NamePath,
        props: ItemProps,
        /// Whether the field sits inside a list entry.
        list_field: bool,
    },
    /// A widget's output element.
    Element {
        widget_type: String,
        attrs: Props,
        /// Full identifier when rendered inside a wrapper.
        name: Option<NamePath>,
        /// Root prefix of the form the element belongs to.
        root: NamePath,
    },
    /// A repeatable list.
    List { name: NamePath },
    /// Stands in for something that could not be rendered.
    Placeholder(String),
    Text(String),
}

/// A node of the render tree.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderNode {
    pub kind: NodeKind,
    /// Stable identity among siblings, where one is needed.
    pub key: Option<String>,
}

impl RenderNode {
    pub fn new(kind: NodeKind) -> Self {
        Self { kind, key: None }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// The full identifier of a wrapper node.
    pub fn form_item_name(&self) -> Option<&NamePath> {
        match &self.kind {
            NodeKind::FormItem { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.kind, NodeKind::Placeholder(_))
    }
}

impl From<NodeKind> for RenderNode {
    fn from(kind: NodeKind) -> Self {
        Self::new(kind)
    }
}

// One-line description used by the text outline.
impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Form { layout } => write!(f, "Form layout={}", layout.as_str()),
            NodeKind::Fragment => f.write_str("Fragment"),
            NodeKind::Row(row) => {
                f.write_str("Row")?;
                match row.gutter {
                    Some(Gutter::Uniform(gutter)) => write!(f, " gutter={gutter}")?,
                    Some(Gutter::Pair(h, v)) => write!(f, " gutter={h},{v}")?,
                    None => {}
                }
                if let Some(align) = &row.align {
                    write!(f, " align={align}")?;
                }
                if let Some(justify) = &row.justify {
                    write!(f, " justify={justify}")?;
                }
                Ok(())
            }
            NodeKind::Col(col) => {
                f.write_str("Col")?;
                if let Some(span) = col.span {
                    write!(f, " span={span}")?;
                }
                if let Some(offset) = col.offset {
                    write!(f, " offset={offset}")?;
                }
                Ok(())
            }
            NodeKind::FormItem {
                name,
                props,
                list_field,
            } => {
                write!(f, "FormItem name={name}")?;
                if let Some(label) = &props.label {
                    write!(f, " label={label:?}")?;
                }
                if props.is_required() {
                    f.write_str(" required")?;
                }
                if *list_field {
                    f.write_str(" list-field")?;
                }
                Ok(())
            }
            NodeKind::Element {
                widget_type,
                attrs,
                name,
                root,
            } => {
                write!(f, "Element {widget_type}")?;
                if let Some(name) = name {
                    write!(f, " name={name}")?;
                }
                if !root.is_empty() {
                    write!(f, " root={root}")?;
                }
                for (key, value) in attrs {
                    write!(f, " {key}={value}")?;
                }
                Ok(())
            }
            NodeKind::List { name } => write!(f, "List name={name}"),
            NodeKind::Placeholder(message) => write!(f, "Placeholder {message:?}"),
            NodeKind::Text(text) => write!(f, "Text {text:?}"),
        }
    }
}
