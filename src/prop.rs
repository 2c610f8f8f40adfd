//! Dynamic properties: a literal value or a function of live form state.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::host::FormHost;

/// The signature of a computed property.
///
/// Receives the host form-state accessor and the values in scope (the current
/// list entry's sub-object inside a list, every value at the root). Must be
/// pure and synchronous.
pub type ComputeFn<T> = dyn Fn(&dyn FormHost, &Value) -> T;

/// A descriptor property: either fixed, or recomputed from form state.
pub enum Prop<T> {
    Literal(T),
    Computed(Rc<ComputeFn<T>>),
}

impl<T> Prop<T> {
    /// Wrap a function of `(form, scoped_values)`.
    pub fn computed(f: impl Fn(&dyn FormHost, &Value) -> T + 'static) -> Self {
        Prop::Computed(Rc::new(f))
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, Prop::Computed(_))
    }

    /// The literal value, if this property is not computed.
    pub fn literal(&self) -> Option<&T> {
        match self {
            Prop::Literal(value) => Some(value),
            Prop::Computed(_) => None,
        }
    }
}

impl<T: Clone> Prop<T> {
    /// Evaluate: call the function, or clone the literal.
    pub fn resolve(&self, host: &dyn FormHost, values: &Value) -> T {
        match self {
            Prop::Literal(value) => value.clone(),
            Prop::Computed(f) => f(host, values),
        }
    }
}

impl<T: Default> Default for Prop<T> {
    fn default() -> Self {
        Prop::Literal(T::default())
    }
}

impl<T> From<T> for Prop<T> {
    fn from(value: T) -> Self {
        Prop::Literal(value)
    }
}

// Manual impl: cloning a computed property shares the function.
impl<T: Clone> Clone for Prop<T> {
    fn clone(&self) -> Self {
        match self {
            Prop::Literal(value) => Prop::Literal(value.clone()),
            Prop::Computed(f) => Prop::Computed(Rc::clone(f)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Prop<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prop::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Prop::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}
