//! # form-composer
//!
//! A declarative form rendering engine: an array of field descriptors plus the
//! live form state go in, a nested, toolkit-independent render tree comes out.
//!
//! Descriptor properties are either literals or functions of the form state
//! ([`Prop`]). Fields inside repeatable lists get identifiers composed from
//! the list names and entry indices above them ([`path::ScopeContext`]), and
//! see only their own entry's values when computing properties.
//!
//! ## Core Systems
//!
//! - **[`path`]**: name paths, scope contexts, value lookup
//! - **[`prop`]**: literal-or-computed descriptor properties
//! - **[`descriptor`]**: field descriptors, wrapper/column/row config, JSON wire format
//! - **[`engine`]**: property resolution, field, field-list and repeatable-list renderers
//! - **[`registry`]**: tag to widget lookup, global or injected
//! - **[`widget`]**: the widget trait and default inputs
//! - **[`render`]**: the render tree, queries, text outline
//! - **[`host`]**: the form-state host contract and an in-memory store
//! - **[`reactive`]**: signals and effects backing the store
//! - **[`composer`]**: the outer form container and mounted forms
//!
//! ```ignore
//! use form_composer::prelude::*;
//!
//! let store = FormStore::new();
//! let form = FormComposer::new(descriptors_from_json(r#"[
//!     { "type": "text", "itemProps": { "name": "name", "label": "Name" } }
//! ]"#)?);
//! let mounted = form.mount(Rc::new(store.clone()));
//! println!("{}", mounted.to_outline());
//! ```

// Foundation
pub mod error;
pub mod path;
pub mod prop;

// Configuration
pub mod descriptor;

// Host and state
pub mod host;
pub mod reactive;

// Widgets and output
pub mod registry;
pub mod render;
pub mod widget;

// Rendering
pub mod composer;
pub mod engine;

pub use composer::{ComposerConfig, FormComposer, MountedForm};
pub use descriptor::{FieldDescriptor, FieldType, ItemProps, Layout, ListProps};
pub use error::ComposeError;
pub use host::{FormHost, FormStore, ListEntry};
pub use path::{NamePath, PathSegment, ScopeContext};
pub use prop::Prop;
pub use registry::ComponentRegistry;
pub use render::RenderTree;

/// Everything an application usually needs.
pub mod prelude {
    pub use crate::composer::{ComposerConfig, FormComposer, MountedForm};
    pub use crate::descriptor::{
        descriptors_from_json, ColProps, ColSpan, FieldDescriptor, Gutter, ItemProps, Layout,
        ListProps, Props, RowProps, Rule,
    };
    pub use crate::error::ComposeError;
    pub use crate::host::{FormHost, FormStore, ListEntry, ListHandle, ListOperations};
    pub use crate::name_path;
    pub use crate::path::{NamePath, PathSegment, ScopeContext};
    pub use crate::prop::Prop;
    pub use crate::registry::ComponentRegistry;
    pub use crate::render::{render_to_string, NodeId, NodeKind, RenderTree};
    pub use crate::widget::{widget_fn, Component, Widget, WidgetInput};
}
