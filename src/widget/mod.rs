//! Widget system: the trait behind registry tags and the default inputs.

pub mod builtin;
pub mod traits;

pub use builtin::InputWidget;
pub use traits::{widget_fn, Component, FnWidget, Widget, WidgetInput};
