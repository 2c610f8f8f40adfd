//! Dynamic property resolution with scoped values.

use super::RenderCx;
use crate::descriptor::{FieldDescriptor, ResolvedField};
use crate::path::ScopeContext;

impl RenderCx<'_> {
    /// Resolve every property of `field` in `scope`.
    ///
    /// Computed properties see the scoped values: the innermost list entry's
    /// sub-object, or everything at the root. Reactive fields are evaluated
    /// on every call. Static fields are evaluated once per `slot` and
    /// descriptor, then served from the cache while the same descriptor
    /// keeps occupying that slot.
    pub fn resolve_field(
        &mut self,
        field: &FieldDescriptor,
        scope: &ScopeContext,
        slot: &str,
    ) -> ResolvedField {
        let reactive = field.is_reactive();
        if !reactive {
            if let Some(cached) = self.cache.get(slot, field.id()) {
                self.stats.reused += 1;
                return cached.clone();
            }
        }

        let values = self.host.values();
        let scoped = scope.scoped_values(&values);
        let resolved = field.resolve(self.host, &scoped);
        self.stats.resolved += 1;
        tracing::trace!(slot, reactive, hidden = resolved.hidden, "resolved field");

        if !reactive {
            self.cache.insert(slot.to_owned(), field.id(), resolved.clone());
        }
        resolved
    }
}
