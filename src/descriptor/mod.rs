//! Field descriptors and the configuration they carry.
//!
//! A [`FieldDescriptor`] is the static description of one field. It is
//! built in code, or parsed from JSON with [`descriptors_from_json`].

pub mod field;
pub mod props;
pub mod wire;

pub use field::{
    DescriptorId, FieldDescriptor, FieldType, InputProps, ItemRender, ListProps, ListRender, ResolvedField,
    WidgetTag, BUILTIN_TAG_NAMES,
};
pub use props::{
    ColProps, ColSpan, Gutter, ItemProps, Layout, Props, RowProps, Rule, DEFAULT_GUTTER,
    GRID_COLUMNS,
};
pub use wire::{descriptors_from_json, descriptors_from_value};
