//! Component registry: tag -> widget lookup.
//!
//! Populate during startup, then treat as read-only. [`ComponentRegistry::freeze`]
//! turns that convention into a contract: later registrations fail instead of
//! racing a render that already looked the tag up.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::engine::ListWidget;
use crate::error::ComposeError;
use crate::widget::{Component, InputWidget};

/// Tag the list field type is looked up under.
pub const LIST_TAG: &str = "list";

/// Mapping from widget tag to implementation.
pub struct ComponentRegistry {
    components: RwLock<HashMap<String, Component>>,
    frozen: AtomicBool,
}

impl ComponentRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            components: RwLock::new(HashMap::new()),
            frozen: AtomicBool::new(false),
        }
    }

    /// A registry holding the default inputs (`text`, `password`, `textarea`)
    /// and the `list` renderer.
    pub fn with_defaults() -> Self {
        let defaults: [(&str, Component); 4] = [
            ("text", Arc::new(InputWidget::new("text"))),
            ("password", Arc::new(InputWidget::new("password"))),
            ("textarea", Arc::new(InputWidget::new("textarea"))),
            (LIST_TAG, Arc::new(ListWidget)),
        ];
        let components = defaults
            .into_iter()
            .map(|(tag, component)| (tag.to_owned(), component))
            .collect();
        Self {
            components: RwLock::new(components),
            frozen: AtomicBool::new(false),
        }
    }

    /// The process-wide registry, created with defaults on first use.
    pub fn global() -> Arc<ComponentRegistry> {
        static GLOBAL: OnceLock<Arc<ComponentRegistry>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(ComponentRegistry::with_defaults())))
    }

    /// Register `component` under `tag`.
    ///
    /// An existing entry is overwritten with a warning. Returns whether one
    /// was replaced.
    pub fn register(&self, tag: impl Into<String>, component: Component) -> Result<bool, ComposeError> {
        let tag = tag.into();
        if self.is_frozen() {
            return Err(ComposeError::RegistryFrozen(tag));
        }

        let mut components = self
            .components
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let replaced = components.insert(tag.clone(), component).is_some();
        if replaced {
            tracing::warn!("Input [{tag}] already exists and will be overwritten.");
        } else {
            tracing::debug!(%tag, "registered input");
        }
        Ok(replaced)
    }

    /// Register every `(tag, component)` pair, in order.
    ///
    /// Returns how many entries were overwritten.
    pub fn register_many<T: Into<String>>(
        &self,
        components: impl IntoIterator<Item = (T, Component)>,
    ) -> Result<usize, ComposeError> {
        let mut replaced = 0;
        for (tag, component) in components {
            if self.register(tag, component)? {
                replaced += 1;
            }
        }
        Ok(replaced)
    }

    pub fn get(&self, tag: &str) -> Option<Component> {
        self.components
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(tag)
            .cloned()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.components
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(tag)
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .components
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        tags.sort();
        tags
    }

    /// Reject all further registrations.
    pub fn freeze(&self) {
        self.frozen.store(true, Ordering::Release);
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("tags", &self.tags())
            .field("frozen", &self.is_frozen())
            .finish()
    }
}
