//! Wrapper, column and row configuration carried by descriptors.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::path::NamePath;

/// Free-form widget configuration (`inputProps` on the wire).
pub type Props = Map<String, Value>;

/// Number of units in one grid row.
pub const GRID_COLUMNS: u32 = 24;

/// Row gutter used when the caller supplies no row configuration.
pub const DEFAULT_GUTTER: u32 = 16;

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// How fields are arranged.
///
/// `Inline` emits wrappers back to back. The other modes place every field in
/// a grid column inside a single row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Horizontal,
    Vertical,
    Inline,
}

impl Layout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Horizontal => "horizontal",
            Layout::Vertical => "vertical",
            Layout::Inline => "inline",
        }
    }
}

// ---------------------------------------------------------------------------
// Field wrapper
// ---------------------------------------------------------------------------

/// A validation rule forwarded to the host with the field registration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl Rule {
    /// A `required` rule with the given message.
    pub fn required(message: impl Into<String>) -> Self {
        Self {
            required: true,
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// A regex `pattern` rule with the given message.
    pub fn pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            pattern: Some(pattern.into()),
            message: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Field wrapper configuration (`itemProps` on the wire).
///
/// An empty wrapper means "render the bare widget": nothing is registered
/// and no label or validation is attached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemProps {
    /// Name relative to the enclosing scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<NamePath>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<Rule>,
    /// Re-resolve this field on every form change even if nothing is computed.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub should_update: bool,
    /// Anything else the host's wrapper understands (`tooltip`, `extra`, ...).
    #[serde(flatten)]
    pub extra: Props,
}

impl ItemProps {
    pub fn new() -> Self {
        Self::default()
    }

    /// A wrapper registering the field under `name`.
    pub fn named(name: impl Into<NamePath>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<NamePath>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_should_update(mut self, should_update: bool) -> Self {
        self.should_update = should_update;
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Whether this wrapper configures nothing at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.label.is_none()
            && self.rules.is_empty()
            && !self.should_update
            && self.extra.is_empty()
    }

    /// Whether any rule marks the field required.
    pub fn is_required(&self) -> bool {
        self.rules.iter().any(|rule| rule.required)
    }
}

// ---------------------------------------------------------------------------
// Grid column
// ---------------------------------------------------------------------------

/// Full grid column configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flex: Option<String>,
}

impl ColProps {
    /// A column spanning `span` grid units.
    pub fn span(span: u32) -> Self {
        Self {
            span: Some(span),
            ..Self::default()
        }
    }

    /// A full-width column.
    pub fn full() -> Self {
        Self::span(GRID_COLUMNS)
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// A field's column configuration (`col` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColSpan {
    /// A span in grid units.
    Span(u32),
    /// A span written as text, e.g. `"12"`.
    Text(String),
    /// Passed through unchanged.
    Props(ColProps),
}

impl ColSpan {
    /// Turn an optional column config into concrete column props.
    ///
    /// Objects pass through. Spans become a column of that span, except that
    /// `0`, blank text and an absent config mean full width. Text that is not a
    /// number also falls back to full width.
    pub fn resolve(col: Option<&ColSpan>) -> ColProps {
        match col {
            Some(ColSpan::Props(props)) => props.clone(),
            Some(ColSpan::Span(span)) if *span > 0 => ColProps::span(*span),
            Some(ColSpan::Text(text)) if !text.trim().is_empty() => match text.trim().parse() {
                Ok(span) => ColProps::span(span),
                Err(_) => {
                    tracing::debug!(col = %text, "non-numeric column span, using full width");
                    ColProps::full()
                }
            },
            _ => ColProps::full(),
        }
    }
}

impl From<u32> for ColSpan {
    fn from(span: u32) -> Self {
        ColSpan::Span(span)
    }
}

impl From<ColProps> for ColSpan {
    fn from(props: ColProps) -> Self {
        ColSpan::Props(props)
    }
}

// ---------------------------------------------------------------------------
// Grid row
// ---------------------------------------------------------------------------

/// Spacing between columns: one value, or `(horizontal, vertical)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Gutter {
    Uniform(u32),
    Pair(u32, u32),
}

/// Grid row configuration wrapping a field list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gutter: Option<Gutter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justify: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrap: Option<bool>,
}

impl RowProps {
    pub fn new() -> Self {
        Self::default()
    }

    /// The row used when none is configured: a 16-unit gutter.
    pub fn standard() -> Self {
        Self::new().with_gutter(Gutter::Uniform(DEFAULT_GUTTER))
    }

    pub fn with_gutter(mut self, gutter: Gutter) -> Self {
        self.gutter = Some(gutter);
        self
    }

    pub fn with_align(mut self, align: impl Into<String>) -> Self {
        self.align = Some(align.into());
        self
    }

    pub fn with_justify(mut self, justify: impl Into<String>) -> Self {
        self.justify = Some(justify.into());
        self
    }
}
