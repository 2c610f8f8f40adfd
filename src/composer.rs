//! The outer form container.
//!
//! [`FormComposer`] holds the descriptors and the form-level configuration.
//! [`FormComposer::render`] runs one stateless pass; [`FormComposer::mount`]
//! keeps the rendered tree in sync with the host and reconciles field
//! registrations after every pass.

use std::cell::{Ref, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use serde::Deserialize;

use crate::descriptor::{FieldDescriptor, ItemProps, Layout, RowProps};
use crate::engine::{PassStats, RenderCx, ResolutionCache};
use crate::error::ComposeError;
use crate::host::{FormHost, Subscription};
use crate::path::{NamePath, ScopeContext};
use crate::registry::ComponentRegistry;
use crate::render::{render_to_string, NodeId, NodeKind, RenderTree};

// ---------------------------------------------------------------------------
// ComposerConfig
// ---------------------------------------------------------------------------

/// Form-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComposerConfig {
    /// How fields are arranged. Applies to nested lists too.
    pub layout: Layout,
    /// Row configuration for the top-level grid row.
    pub row_props: Option<RowProps>,
    /// Prefix of every field identifier.
    pub root: NamePath,
}

impl ComposerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON config object; missing keys keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, ComposeError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Set the layout mode (builder).
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the top-level row configuration (builder).
    pub fn with_row_props(mut self, row_props: RowProps) -> Self {
        self.row_props = Some(row_props);
        self
    }

    /// Set the identifier prefix (builder).
    pub fn with_root(mut self, root: impl Into<NamePath>) -> Self {
        self.root = root.into();
        self
    }
}

// ---------------------------------------------------------------------------
// FormComposer
// ---------------------------------------------------------------------------

/// Renders trailing content after the fields, e.g. a submit button.
pub type ChildrenRender = Rc<dyn Fn(&mut RenderTree) -> Vec<NodeId>>;

/// Descriptors plus everything needed to render them.
#[derive(Clone)]
pub struct FormComposer {
    items: Rc<[FieldDescriptor]>,
    config: ComposerConfig,
    registry: Arc<ComponentRegistry>,
    children: Option<ChildrenRender>,
}

impl FormComposer {
    /// A form over `items`, using the global registry.
    pub fn new(items: impl Into<Rc<[FieldDescriptor]>>) -> Self {
        Self {
            items: items.into(),
            config: ComposerConfig::default(),
            registry: ComponentRegistry::global(),
            children: None,
        }
    }

    pub fn with_config(mut self, config: ComposerConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `registry` instead of the global one.
    pub fn with_registry(mut self, registry: Arc<ComponentRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_children(mut self, children: impl Fn(&mut RenderTree) -> Vec<NodeId> + 'static) -> Self {
        self.children = Some(Rc::new(children));
        self
    }

    pub fn items(&self) -> &[FieldDescriptor] {
        &self.items
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ComponentRegistry> {
        &self.registry
    }

    /// Run one pass against the current values. Nothing is registered.
    pub fn render(&self, host: &dyn FormHost) -> RenderTree {
        let mut cache = ResolutionCache::new();
        self.render_pass(host, &mut cache).0
    }

    fn render_pass(&self, host: &dyn FormHost, cache: &mut ResolutionCache) -> (RenderTree, PassStats) {
        cache.begin_pass();

        let layout = self.config.layout;
        let mut tree = RenderTree::new();
        let form = tree.insert(NodeKind::Form { layout });
        tree.set_root(form);

        let scope = ScopeContext::with_root(self.config.root.clone());
        let stats = {
            let mut cx = RenderCx::new(&mut tree, host, &self.registry, cache, layout);
            let body = cx.render_items(&self.items, &scope, self.config.row_props.as_ref());
            cx.tree.append_child(form, body);
            cx.stats()
        };

        if let Some(children) = &self.children {
            let nodes = children(&mut tree);
            tree.append_children(form, nodes);
        }

        cache.finish_pass();
        tracing::debug!(
            resolved = stats.resolved,
            reused = stats.reused,
            hidden = stats.hidden,
            "render pass"
        );
        (tree, stats)
    }

    /// Render now, then re-render on every change the host reports.
    pub fn mount(&self, host: Rc<dyn FormHost>) -> MountedForm {
        let state = Rc::new(RefCell::new(FormState {
            composer: self.clone(),
            host: Rc::clone(&host),
            cache: ResolutionCache::new(),
            tree: RenderTree::new(),
            registered: BTreeMap::new(),
            passes: 0,
            last_pass: PassStats::default(),
        }));
        state.borrow_mut().run_pass();

        let weak = Rc::downgrade(&state);
        let subscription = host.subscribe(Box::new(move || {
            let Some(state) = weak.upgrade() else {
                return;
            };
            match state.try_borrow_mut() {
                Ok(mut state) => state.run_pass(),
                Err(_) => tracing::warn!("form changed during its own render pass; update skipped"),
            };
        }));

        MountedForm {
            state,
            subscription: Some(subscription),
        }
    }
}

impl fmt::Debug for FormComposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormComposer")
            .field("items", &self.items.len())
            .field("config", &self.config)
            .field("children", &self.children.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// MountedForm
// ---------------------------------------------------------------------------

struct FormState {
    composer: FormComposer,
    host: Rc<dyn FormHost>,
    cache: ResolutionCache,
    tree: RenderTree,
    /// What this form has registered with the host.
    registered: BTreeMap<NamePath, ItemProps>,
    passes: usize,
    last_pass: PassStats,
}

impl FormState {
    fn run_pass(&mut self) {
        let (tree, stats) = self.composer.render_pass(&*self.host, &mut self.cache);
        self.tree = tree;
        self.passes += 1;
        self.last_pass = stats;
        self.reconcile();
    }

    /// Bring host registrations in line with the wrappers in the tree.
    fn reconcile(&mut self) {
        let mut current = BTreeMap::new();
        for id in self.tree.walk_root() {
            if let Some(NodeKind::FormItem { name, props, .. }) = self.tree.kind(id) {
                if !name.is_empty() {
                    current.insert(name.clone(), props.clone());
                }
            }
        }

        let mut removed = 0;
        for name in self.registered.keys() {
            if !current.contains_key(name) {
                self.host.unregister_field(name);
                removed += 1;
            }
        }
        let mut added = 0;
        for (name, props) in &current {
            if self.registered.get(name) != Some(props) {
                self.host.register_field(name, props);
                added += 1;
            }
        }

        if added > 0 || removed > 0 {
            tracing::debug!(added, removed, total = current.len(), "reconciled registrations");
        }
        self.registered = current;
    }

    fn unregister_all(&mut self) {
        for name in std::mem::take(&mut self.registered).keys() {
            self.host.unregister_field(name);
        }
    }
}

/// A form kept in sync with its host.
///
/// Dropping it stops updates but leaves registrations in place; call
/// [`unmount`](Self::unmount) to remove them too.
pub struct MountedForm {
    state: Rc<RefCell<FormState>>,
    subscription: Option<Subscription>,
}

impl MountedForm {
    /// The tree from the latest pass.
    pub fn tree(&self) -> Ref<'_, RenderTree> {
        Ref::map(self.state.borrow(), |state| &state.tree)
    }

    /// Text outline of the latest tree.
    pub fn to_outline(&self) -> String {
        render_to_string(&self.state.borrow().tree)
    }

    /// Number of passes run so far, the initial one included.
    pub fn passes(&self) -> usize {
        self.state.borrow().passes
    }

    pub fn last_pass(&self) -> PassStats {
        self.state.borrow().last_pass
    }

    /// Names currently registered with the host by this form.
    pub fn registered(&self) -> Vec<NamePath> {
        self.state.borrow().registered.keys().cloned().collect()
    }

    /// Run a pass now, without waiting for a change.
    pub fn refresh(&self) {
        self.state.borrow_mut().run_pass();
    }

    /// Stop listening and unregister every field.
    pub fn unmount(mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }
        self.state.borrow_mut().unregister_all();
    }
}

impl fmt::Debug for MountedForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("MountedForm")
            .field("passes", &state.passes)
            .field("registered", &state.registered.len())
            .field("subscription", &self.subscription)
            .finish()
    }
}
