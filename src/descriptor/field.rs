//! Field descriptors: what a single form field is, before resolution.

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;

use super::props::{ColSpan, ItemProps, Props, RowProps};
use crate::host::{FormHost, ListEntry, ListHandle};
use crate::path::NamePath;
use crate::prop::Prop;
use crate::render::{NodeId, RenderTree};
use crate::widget::Component;

// ---------------------------------------------------------------------------
// WidgetTag
// ---------------------------------------------------------------------------

/// Registry tag of a widget. The built-ins are enumerated; anything else a
/// caller registers travels as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WidgetTag {
    AutoComplete,
    Cascader,
    Checkbox,
    CheckboxGroup,
    DatePicker,
    RangePicker,
    Text,
    Search,
    Password,
    TextArea,
    Number,
    Mentions,
    Radio,
    RadioGroup,
    Rate,
    Select,
    Slider,
    Switch,
    TimePicker,
    Transfer,
    TreeSelect,
    Other(String),
}

/// Registry keys of the built-in tags, in declaration order.
pub const BUILTIN_TAG_NAMES: &[&str] = &[
    "autocomplete",
    "cascader",
    "checkbox",
    "checkbox-group",
    "date-picker",
    "range-picker",
    "text",
    "search",
    "password",
    "textarea",
    "number",
    "mentions",
    "radio",
    "radio-group",
    "rate",
    "select",
    "slider",
    "switch",
    "time-picker",
    "transfer",
    "tree-select",
];

impl WidgetTag {
    /// The registry key for this tag.
    pub fn as_str(&self) -> &str {
        match self {
            WidgetTag::AutoComplete => "autocomplete",
            WidgetTag::Cascader => "cascader",
            WidgetTag::Checkbox => "checkbox",
            WidgetTag::CheckboxGroup => "checkbox-group",
            WidgetTag::DatePicker => "date-picker",
            WidgetTag::RangePicker => "range-picker",
            WidgetTag::Text => "text",
            WidgetTag::Search => "search",
            WidgetTag::Password => "password",
            WidgetTag::TextArea => "textarea",
            WidgetTag::Number => "number",
            WidgetTag::Mentions => "mentions",
            WidgetTag::Radio => "radio",
            WidgetTag::RadioGroup => "radio-group",
            WidgetTag::Rate => "rate",
            WidgetTag::Select => "select",
            WidgetTag::Slider => "slider",
            WidgetTag::Switch => "switch",
            WidgetTag::TimePicker => "time-picker",
            WidgetTag::Transfer => "transfer",
            WidgetTag::TreeSelect => "tree-select",
            WidgetTag::Other(tag) => tag,
        }
    }

    /// Whether this is one of the enumerated built-in tags.
    pub fn is_builtin(&self) -> bool {
        !matches!(self, WidgetTag::Other(_))
    }
}

impl From<&str> for WidgetTag {
    fn from(name: &str) -> Self {
        match name {
            "autocomplete" => WidgetTag::AutoComplete,
            "cascader" => WidgetTag::Cascader,
            "checkbox" => WidgetTag::Checkbox,
            "checkbox-group" => WidgetTag::CheckboxGroup,
            "date-picker" => WidgetTag::DatePicker,
            "range-picker" => WidgetTag::RangePicker,
            "text" => WidgetTag::Text,
            "search" => WidgetTag::Search,
            "password" => WidgetTag::Password,
            "textarea" => WidgetTag::TextArea,
            "number" => WidgetTag::Number,
            "mentions" => WidgetTag::Mentions,
            "radio" => WidgetTag::Radio,
            "radio-group" => WidgetTag::RadioGroup,
            "rate" => WidgetTag::Rate,
            "select" => WidgetTag::Select,
            "slider" => WidgetTag::Slider,
            "switch" => WidgetTag::Switch,
            "time-picker" => WidgetTag::TimePicker,
            "transfer" => WidgetTag::Transfer,
            "tree-select" => WidgetTag::TreeSelect,
            other => WidgetTag::Other(other.to_owned()),
        }
    }
}

impl From<String> for WidgetTag {
    fn from(name: String) -> Self {
        WidgetTag::from(name.as_str())
    }
}

impl fmt::Display for WidgetTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// List configuration
// ---------------------------------------------------------------------------

/// Per-entry content transform: `(tree, content, entry, operations) -> node`.
pub type ItemRender = Rc<dyn Fn(&mut RenderTree, NodeId, &ListEntry, &ListHandle) -> NodeId>;

/// Whole-list transform: `(tree, entry nodes, entries, operations) -> node`.
pub type ListRender =
    Rc<dyn Fn(&mut RenderTree, Vec<NodeId>, &[ListEntry], &ListHandle) -> NodeId>;

/// Widget configuration of a repeatable list field.
#[derive(Clone, Default)]
pub struct ListProps {
    /// List name relative to the enclosing scope. A wrapper name, when
    /// present, takes precedence.
    pub name: NamePath,
    /// Fields rendered once per entry.
    pub items: Vec<FieldDescriptor>,
    pub row_props: Option<RowProps>,
    pub item_render: Option<ItemRender>,
    pub list_render: Option<ListRender>,
}

impl ListProps {
    pub fn new(name: impl Into<NamePath>, items: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            items,
            ..Self::default()
        }
    }

    pub fn with_row_props(mut self, row_props: RowProps) -> Self {
        self.row_props = Some(row_props);
        self
    }

    pub fn with_item_render(
        mut self,
        f: impl Fn(&mut RenderTree, NodeId, &ListEntry, &ListHandle) -> NodeId + 'static,
    ) -> Self {
        self.item_render = Some(Rc::new(f));
        self
    }

    pub fn with_list_render(
        mut self,
        f: impl Fn(&mut RenderTree, Vec<NodeId>, &[ListEntry], &ListHandle) -> NodeId + 'static,
    ) -> Self {
        self.list_render = Some(Rc::new(f));
        self
    }
}

impl fmt::Debug for ListProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListProps")
            .field("name", &self.name)
            .field("items", &self.items.len())
            .field("row_props", &self.row_props)
            .field("item_render", &self.item_render.is_some())
            .field("list_render", &self.list_render.is_some())
            .finish()
    }
}

/// Resolved widget configuration handed to a widget.
#[derive(Debug, Clone)]
pub enum InputProps {
    Attrs(Props),
    List(ListProps),
}

impl InputProps {
    /// Attribute map, if this is not a list configuration.
    pub fn attrs(&self) -> Option<&Props> {
        match self {
            InputProps::Attrs(props) => Some(props),
            InputProps::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListProps> {
        match self {
            InputProps::List(list) => Some(list),
            InputProps::Attrs(_) => None,
        }
    }
}

impl Default for InputProps {
    fn default() -> Self {
        InputProps::Attrs(Props::new())
    }
}

// ---------------------------------------------------------------------------
// FieldType
// ---------------------------------------------------------------------------

/// The kind of field, carrying widget configuration of the matching shape.
#[derive(Clone)]
pub enum FieldType {
    /// Looked up in the component registry by tag.
    Widget { tag: WidgetTag, input: Prop<Props> },
    /// Rendered with an explicit component, or a placeholder without one.
    Custom {
        component: Option<Component>,
        input: Prop<Props>,
    },
    /// Renders no widget.
    Hidden { input: Prop<Props> },
    /// A repeatable list, rendered by the registry's `list` widget.
    List { input: Prop<ListProps> },
}

impl FieldType {
    /// The `type` tag this field has on the wire.
    pub fn type_name(&self) -> &str {
        match self {
            FieldType::Widget { tag, .. } => tag.as_str(),
            FieldType::Custom { .. } => "custom",
            FieldType::Hidden { .. } => "hidden",
            FieldType::List { .. } => "list",
        }
    }

    fn input_is_computed(&self) -> bool {
        match self {
            FieldType::Widget { input, .. }
            | FieldType::Custom { input, .. }
            | FieldType::Hidden { input } => input.is_computed(),
            FieldType::List { input } => input.is_computed(),
        }
    }

    fn resolve_input(&self, host: &dyn FormHost, values: &Value) -> InputProps {
        match self {
            FieldType::Widget { input, .. }
            | FieldType::Custom { input, .. }
            | FieldType::Hidden { input } => InputProps::Attrs(input.resolve(host, values)),
            FieldType::List { input } => InputProps::List(input.resolve(host, values)),
        }
    }
}

impl fmt::Debug for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Widget { tag, input } => f
                .debug_struct("Widget")
                .field("tag", tag)
                .field("input", input)
                .finish(),
            FieldType::Custom { component, input } => f
                .debug_struct("Custom")
                .field("component", &component.as_ref().map(|c| c.widget_type().to_owned()))
                .field("input", input)
                .finish(),
            FieldType::Hidden { input } => f.debug_struct("Hidden").field("input", input).finish(),
            FieldType::List { input } => f.debug_struct("List").field("input", input).finish(),
        }
    }
}

// ---------------------------------------------------------------------------
// FieldDescriptor
// ---------------------------------------------------------------------------

/// Static configuration of one form field.
///
/// Every property except the field type may be a literal or a function of
/// the form state (see [`Prop`]). Descriptors are immutable once built:
/// properties are set through the `with_*` builders and read through the
/// accessors.
///
/// ```ignore
/// let email = FieldDescriptor::widget("text", Props::new())
///     .with_item(ItemProps::named("email").with_label("Email"))
///     .with_hidden(Prop::computed(|_, row| row["kind"] == "company"));
/// ```
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    id: DescriptorId,
    field_type: FieldType,
    hidden: Prop<bool>,
    col: Prop<Option<ColSpan>>,
    item_props: Prop<ItemProps>,
}

/// Identity of one built descriptor.
///
/// Every constructor and builder call stamps a fresh id; clones share it.
/// Two descriptors with the same id therefore resolve the same way when
/// none of their properties is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DescriptorId(u64);

impl DescriptorId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl FieldDescriptor {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            id: DescriptorId::next(),
            field_type,
            hidden: Prop::Literal(false),
            col: Prop::Literal(None),
            item_props: Prop::Literal(ItemProps::default()),
        }
    }

    /// A registry-backed widget field.
    pub fn widget(tag: impl Into<WidgetTag>, input: impl Into<Prop<Props>>) -> Self {
        Self::new(FieldType::Widget {
            tag: tag.into(),
            input: input.into(),
        })
    }

    /// A field rendered with `component`; a placeholder when `None`.
    pub fn custom(component: Option<Component>, input: impl Into<Prop<Props>>) -> Self {
        Self::new(FieldType::Custom {
            component,
            input: input.into(),
        })
    }

    /// A field with no widget.
    pub fn hidden_input(input: impl Into<Prop<Props>>) -> Self {
        Self::new(FieldType::Hidden {
            input: input.into(),
        })
    }

    /// A repeatable list field.
    pub fn list(input: impl Into<Prop<ListProps>>) -> Self {
        Self::new(FieldType::List {
            input: input.into(),
        })
    }

    pub fn with_hidden(mut self, hidden: impl Into<Prop<bool>>) -> Self {
        self.hidden = hidden.into();
        self.id = DescriptorId::next();
        self
    }

    pub fn with_col(mut self, col: impl Into<Prop<Option<ColSpan>>>) -> Self {
        self.col = col.into();
        self.id = DescriptorId::next();
        self
    }

    pub fn with_item(mut self, item_props: impl Into<Prop<ItemProps>>) -> Self {
        self.item_props = item_props.into();
        self.id = DescriptorId::next();
        self
    }

    pub fn id(&self) -> DescriptorId {
        self.id
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn hidden(&self) -> &Prop<bool> {
        &self.hidden
    }

    pub fn col(&self) -> &Prop<Option<ColSpan>> {
        &self.col
    }

    pub fn item_props(&self) -> &Prop<ItemProps> {
        &self.item_props
    }

    pub fn type_name(&self) -> &str {
        self.field_type.type_name()
    }

    /// Whether this field must re-resolve on every form change.
    ///
    /// True when any property is computed, or the literal wrapper asks for
    /// it with `should_update`.
    pub fn is_reactive(&self) -> bool {
        self.hidden.is_computed()
            || self.col.is_computed()
            || self.item_props.is_computed()
            || self.field_type.input_is_computed()
            || self
                .item_props
                .literal()
                .is_some_and(|item| item.should_update)
    }

    /// Evaluate every property against `values` (already scoped).
    pub fn resolve(&self, host: &dyn FormHost, values: &Value) -> ResolvedField {
        ResolvedField {
            hidden: self.hidden.resolve(host, values),
            item_props: self.item_props.resolve(host, values),
            input_props: self.field_type.resolve_input(host, values),
            col: self.col.resolve(host, values),
        }
    }
}

impl From<ColSpan> for Prop<Option<ColSpan>> {
    fn from(col: ColSpan) -> Self {
        Prop::Literal(Some(col))
    }
}

/// The concrete properties of a field for one render pass.
#[derive(Debug, Clone, Default)]
pub struct ResolvedField {
    pub hidden: bool,
    pub item_props: ItemProps,
    pub input_props: InputProps,
    pub col: Option<ColSpan>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::FormStore;
    use serde_json::json;

    #[test]
    fn tag_round_trip() {
        for name in BUILTIN_TAG_NAMES {
            let tag = WidgetTag::from(*name);
            assert!(tag.is_builtin(), "{name} should be built in");
            assert_eq!(tag.as_str(), *name);
        }
        assert_eq!(WidgetTag::from("color"), WidgetTag::Other("color".into()));
        assert_eq!(WidgetTag::Other("color".into()).to_string(), "color");
    }

    #[test]
    fn literal_descriptor_is_static() {
        let field = FieldDescriptor::widget("text", Props::new()).with_item(ItemProps::named("name"));
        assert!(!field.is_reactive());
        assert_eq!(field.type_name(), "text");
    }

    #[test]
    fn any_computed_property_makes_reactive() {
        let base = || FieldDescriptor::widget("text", Props::new());
        assert!(base().with_hidden(Prop::computed(|_, _| false)).is_reactive());
        assert!(base().with_col(Prop::computed(|_, _| None)).is_reactive());
        assert!(base().with_item(Prop::computed(|_, _| ItemProps::new())).is_reactive());
        assert!(FieldDescriptor::widget("text", Prop::computed(|_, _| Props::new())).is_reactive());
        assert!(FieldDescriptor::list(Prop::computed(|_, _| ListProps::default())).is_reactive());
    }

    #[test]
    fn should_update_makes_reactive() {
        let field = FieldDescriptor::widget("text", Props::new())
            .with_item(ItemProps::named("a").with_should_update(true));
        assert!(field.is_reactive());
    }

    #[test]
    fn resolve_evaluates_each_property() {
        let store = FormStore::new();
        let field = FieldDescriptor::widget(
            "text",
            Prop::computed(|_, values| {
                let mut props = Props::new();
                props.insert("placeholder".into(), values["hint"].clone());
                props
            }),
        )
        .with_hidden(Prop::computed(|_, values| values["off"] == json!(true)))
        .with_col(ColSpan::Span(12))
        .with_item(ItemProps::named("q"));

        let resolved = field.resolve(&store, &json!({ "hint": "Search", "off": false }));
        assert!(!resolved.hidden);
        assert_eq!(resolved.col, Some(ColSpan::Span(12)));
        assert_eq!(resolved.item_props, ItemProps::named("q"));
        assert_eq!(
            resolved.input_props.attrs().and_then(|p| p.get("placeholder")),
            Some(&json!("Search"))
        );
    }

    #[test]
    fn list_input_resolves_to_list_props() {
        let store = FormStore::new();
        let field = FieldDescriptor::list(ListProps::new("rows", vec![]));
        let resolved = field.resolve(&store, &Value::Null);
        assert_eq!(resolved.input_props.as_list().map(|l| l.name.clone()), Some(NamePath::key("rows")));
        assert!(resolved.input_props.attrs().is_none());
    }

    #[test]
    fn type_names() {
        assert_eq!(FieldDescriptor::custom(None, Props::new()).type_name(), "custom");
        assert_eq!(FieldDescriptor::hidden_input(Props::new()).type_name(), "hidden");
        assert_eq!(FieldDescriptor::list(ListProps::default()).type_name(), "list");
    }
}
