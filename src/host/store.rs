//! In-memory form-state host built on the reactive runtime.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use super::{FormHost, ListEntry, ListHandle, ListOperations, Subscription};
use crate::descriptor::ItemProps;
use crate::error::ComposeError;
use crate::path::{get_in, pick, set_in, NamePath, PathSegment};
use crate::reactive::{self, create_signal, dispose_signal, ReadSignal, WriteSignal};

struct StoreInner {
    read: ReadSignal<Value>,
    write: WriteSignal<Value>,
    fields: RefCell<BTreeMap<NamePath, ItemProps>>,
    /// Entry keys per list, parallel to the list's array.
    list_keys: RefCell<HashMap<NamePath, Vec<u64>>>,
    next_key: Cell<u64>,
}

impl Drop for StoreInner {
    fn drop(&mut self) {
        dispose_signal(self.read.id());
    }
}

/// Reference [`FormHost`]: values in a signal, fields in a map, stable keys
/// for list entries.
///
/// Cloning shares the store.
#[derive(Clone)]
pub struct FormStore {
    inner: Rc<StoreInner>,
}

impl FormStore {
    /// An empty store (`{}`).
    pub fn new() -> Self {
        Self::with_values(Value::Object(Default::default()))
    }

    pub fn with_values(values: Value) -> Self {
        let (read, write) = create_signal(values);
        Self {
            inner: Rc::new(StoreInner {
                read,
                write,
                fields: RefCell::new(BTreeMap::new()),
                list_keys: RefCell::new(HashMap::new()),
                next_key: Cell::new(0),
            }),
        }
    }

    // -- values ------------------------------------------------------------

    /// Write one value and notify subscribers.
    pub fn set_value(&self, name: &NamePath, value: Value) {
        self.inner.write.update(|values| set_in(values, name, value));
    }

    /// Replace every value and notify subscribers.
    pub fn set_values(&self, values: Value) {
        self.inner.write.set(values);
    }

    /// The value at `name`, without subscribing anything.
    pub fn value_at(&self, name: &NamePath) -> Option<Value> {
        self.inner
            .read
            .with_untracked(|values| get_in(values, name).cloned())
    }

    /// Run `f`, delivering at most one notification for all its writes.
    pub fn batch(&self, f: impl FnOnce()) {
        reactive::batch(f);
    }

    // -- fields ------------------------------------------------------------

    /// Registered names, sorted.
    pub fn registered_fields(&self) -> Vec<NamePath> {
        self.inner.fields.borrow().keys().cloned().collect()
    }

    pub fn is_registered(&self, name: &NamePath) -> bool {
        self.inner.fields.borrow().contains_key(name)
    }

    pub fn field_props(&self, name: &NamePath) -> Option<ItemProps> {
        self.inner.fields.borrow().get(name).cloned()
    }

    /// Current values projected onto the registered names.
    pub fn submit(&self) -> Value {
        let fields = self.inner.fields.borrow();
        self.inner
            .read
            .with_untracked(|values| pick(values, fields.keys()))
    }

    // -- lists -------------------------------------------------------------

    /// Insert `value` (or `null`) at `index`; append when `index` is `None`
    /// or past the end.
    pub fn add_entry(
        &self,
        name: &NamePath,
        value: Option<Value>,
        index: Option<usize>,
    ) -> Result<(), ComposeError> {
        let mut items = self.list_items(name)?;
        let at = index.map_or(items.len(), |index| index.min(items.len()));

        let key = self.fresh_key();
        self.with_keys(name, items.len(), |keys| keys.insert(at, key));
        self.forget_nested(name, at);

        items.insert(at, value.unwrap_or(Value::Null));
        self.write_list(name, items);
        Ok(())
    }

    /// Remove the entry at `index`. Out of range does nothing.
    pub fn remove_entry(&self, name: &NamePath, index: usize) -> Result<(), ComposeError> {
        let mut items = self.list_items(name)?;
        if index >= items.len() {
            return Ok(());
        }

        self.with_keys(name, items.len(), |keys| {
            keys.remove(index);
        });
        self.forget_nested(name, index);

        items.remove(index);
        self.write_list(name, items);
        Ok(())
    }

    /// Move the entry at `from` to `to`. Out of range does nothing.
    pub fn move_entry(&self, name: &NamePath, from: usize, to: usize) -> Result<(), ComposeError> {
        let mut items = self.list_items(name)?;
        if from >= items.len() || to >= items.len() || from == to {
            return Ok(());
        }

        self.with_keys(name, items.len(), |keys| {
            let key = keys.remove(from);
            keys.insert(to, key);
        });
        self.forget_nested(name, from.min(to));

        let item = items.remove(from);
        items.insert(to, item);
        self.write_list(name, items);
        Ok(())
    }

    fn list_items(&self, name: &NamePath) -> Result<Vec<Value>, ComposeError> {
        match self.value_at(name) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(ComposeError::UnknownListPath(name.clone())),
        }
    }

    fn write_list(&self, name: &NamePath, items: Vec<Value>) {
        self.set_value(name, Value::Array(items));
    }

    fn fresh_key(&self) -> u64 {
        let key = self.inner.next_key.get();
        self.inner.next_key.set(key + 1);
        key
    }

    /// Run `f` on the key table of `name`, first aligned to `len` entries.
    fn with_keys<R>(&self, name: &NamePath, len: usize, f: impl FnOnce(&mut Vec<u64>) -> R) -> R {
        let mut tables = self.inner.list_keys.borrow_mut();
        let keys = tables.entry(name.clone()).or_default();
        keys.truncate(len);
        while keys.len() < len {
            keys.push(self.fresh_key());
        }
        f(keys)
    }

    /// Drop key tables of lists nested in entries `from..` of `name`; their
    /// positions are about to shift.
    fn forget_nested(&self, name: &NamePath, from: usize) {
        self.inner.list_keys.borrow_mut().retain(|path, _| {
            let Some(rest) = path.strip_prefix(name) else {
                return true;
            };
            match rest.segments().first() {
                Some(PathSegment::Index(index)) => *index < from,
                _ => true,
            }
        });
    }
}

impl Default for FormStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FormStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormStore")
            .field("values", &self.inner.read.get_untracked())
            .field("fields", &self.inner.fields.borrow().len())
            .finish()
    }
}

impl FormHost for FormStore {
    fn values(&self) -> Value {
        self.inner.read.get()
    }

    fn register_field(&self, name: &NamePath, props: &ItemProps) {
        tracing::trace!(%name, "register field");
        self.inner
            .fields
            .borrow_mut()
            .insert(name.clone(), props.clone());
    }

    fn unregister_field(&self, name: &NamePath) {
        tracing::trace!(%name, "unregister field");
        self.inner.fields.borrow_mut().remove(name);
    }

    fn subscribe(&self, mut callback: Box<dyn FnMut()>) -> Subscription {
        let effect = reactive::watch(self.inner.read, move || callback());
        Subscription::new(move || reactive::dispose_effect(effect))
    }

    fn list_entries(&self, name: &NamePath) -> Vec<ListEntry> {
        let len = self.inner.read.with(|values| {
            get_in(values, name)
                .and_then(Value::as_array)
                .map_or(0, Vec::len)
        });
        self.with_keys(name, len, |keys| {
            keys.iter()
                .enumerate()
                .map(|(index, key)| ListEntry { key: *key, index })
                .collect()
        })
    }

    fn list_operations(&self, name: &NamePath) -> ListHandle {
        Rc::new(StoreListOps {
            store: self.clone(),
            name: name.clone(),
        })
    }
}

/// [`ListOperations`] bound to one list of a [`FormStore`].
struct StoreListOps {
    store: FormStore,
    name: NamePath,
}

impl ListOperations for StoreListOps {
    fn add(&self, value: Option<Value>, index: Option<usize>) -> Result<(), ComposeError> {
        self.store.add_entry(&self.name, value, index)
    }

    fn remove(&self, index: usize) -> Result<(), ComposeError> {
        self.store.remove_entry(&self.name, index)
    }

    fn move_entry(&self, from: usize, to: usize) -> Result<(), ComposeError> {
        self.store.move_entry(&self.name, from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name_path;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn keys(store: &FormStore, name: &NamePath) -> Vec<u64> {
        store.list_entries(name).iter().map(|e| e.key).collect()
    }

    fn counter(store: &FormStore) -> (Rc<Cell<usize>>, Subscription) {
        let count = Rc::new(Cell::new(0));
        let count_c = count.clone();
        let sub = store.subscribe(Box::new(move || count_c.set(count_c.get() + 1)));
        (count, sub)
    }

    #[test]
    fn set_and_read_values() {
        let store = FormStore::new();
        store.set_value(&name_path!["contacts", 0usize, "email"], json!("a@b.c"));
        assert_eq!(store.values(), json!({ "contacts": [{ "email": "a@b.c" }] }));
        assert_eq!(
            store.value_at(&name_path!["contacts", 0usize, "email"]),
            Some(json!("a@b.c"))
        );
    }

    #[test]
    fn subscribe_fires_on_change_only() {
        let store = FormStore::new();
        let (count, _sub) = counter(&store);
        assert_eq!(count.get(), 0);
        store.set_value(&NamePath::key("a"), json!(1));
        store.set_value(&NamePath::key("b"), json!(2));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn cancelled_subscription_is_silent() {
        let store = FormStore::new();
        let (count, sub) = counter(&store);
        sub.cancel();
        store.set_value(&NamePath::key("a"), json!(1));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn batch_notifies_once() {
        let store = FormStore::new();
        let (count, _sub) = counter(&store);
        store.batch(|| {
            store.set_value(&NamePath::key("a"), json!(1));
            store.set_value(&NamePath::key("b"), json!(2));
        });
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn registration_and_submit() {
        let store = FormStore::with_values(json!({ "name": "Ada", "scratch": "x" }));
        store.register_field(&NamePath::key("name"), &ItemProps::named("name"));
        assert!(store.is_registered(&NamePath::key("name")));
        assert_eq!(store.submit(), json!({ "name": "Ada" }));

        store.unregister_field(&NamePath::key("name"));
        assert!(store.registered_fields().is_empty());
        assert_eq!(store.submit(), json!({}));
    }

    #[test]
    fn entries_get_stable_keys() {
        let store = FormStore::with_values(json!({ "rows": [{}, {}, {}] }));
        let rows = NamePath::key("rows");
        let before = keys(&store, &rows);
        assert_eq!(before.len(), 3);
        assert_eq!(keys(&store, &rows), before);

        store.remove_entry(&rows, 1).unwrap();
        assert_eq!(keys(&store, &rows), vec![before[0], before[2]]);
        assert_eq!(
            store.list_entries(&rows).iter().map(|e| e.index).collect::<Vec<_>>(),
            vec![0, 1]
        );
    }

    #[test]
    fn add_inserts_fresh_key_at_index() {
        let store = FormStore::with_values(json!({ "rows": ["a", "b"] }));
        let rows = NamePath::key("rows");
        let before = keys(&store, &rows);

        store.add_entry(&rows, Some(json!("x")), Some(1)).unwrap();
        let after = keys(&store, &rows);
        assert_eq!(after.len(), 3);
        assert_eq!((after[0], after[2]), (before[0], before[1]));
        assert!(!before.contains(&after[1]));
        assert_eq!(store.value_at(&rows), Some(json!(["a", "x", "b"])));

        store.add_entry(&rows, None, None).unwrap();
        assert_eq!(store.value_at(&rows), Some(json!(["a", "x", "b", null])));
    }

    #[test]
    fn add_to_missing_list_creates_it() {
        let store = FormStore::new();
        let tags = NamePath::key("tags");
        store.add_entry(&tags, Some(json!("t")), None).unwrap();
        assert_eq!(store.value_at(&tags), Some(json!(["t"])));
        assert_eq!(store.list_entries(&tags).len(), 1);
    }

    #[test]
    fn move_carries_key() {
        let store = FormStore::with_values(json!({ "rows": [1, 2, 3] }));
        let rows = NamePath::key("rows");
        let before = keys(&store, &rows);

        store.move_entry(&rows, 0, 2).unwrap();
        assert_eq!(keys(&store, &rows), vec![before[1], before[2], before[0]]);
        assert_eq!(store.value_at(&rows), Some(json!([2, 3, 1])));
    }

    #[test]
    fn out_of_range_is_a_silent_no_op() {
        let store = FormStore::with_values(json!({ "rows": [1] }));
        let rows = NamePath::key("rows");
        let (count, _sub) = counter(&store);

        store.remove_entry(&rows, 5).unwrap();
        store.move_entry(&rows, 0, 3).unwrap();
        assert_eq!(count.get(), 0);
        assert_eq!(store.value_at(&rows), Some(json!([1])));
    }

    #[test]
    fn non_array_is_an_error() {
        let store = FormStore::with_values(json!({ "name": "Ada" }));
        let err = store.add_entry(&NamePath::key("name"), None, None).unwrap_err();
        assert!(matches!(err, ComposeError::UnknownListPath(_)));
    }

    #[test]
    fn nested_keys_behind_mutation_are_regenerated() {
        let store = FormStore::with_values(json!({
            "rows": [{ "tags": ["a"] }, { "tags": ["b"] }]
        }));
        let rows = NamePath::key("rows");
        let first = name_path!["rows", 0usize, "tags"];
        let second = name_path!["rows", 1usize, "tags"];
        store.list_entries(&rows);
        let first_keys = keys(&store, &first);
        let second_keys = keys(&store, &second);

        store.add_entry(&rows, None, Some(1)).unwrap();
        assert_eq!(keys(&store, &first), first_keys);
        assert_ne!(keys(&store, &name_path!["rows", 2usize, "tags"]), second_keys);
    }

    #[test]
    fn operations_handle_mutates_list() {
        let store = FormStore::with_values(json!({ "rows": [] }));
        let ops = store.list_operations(&NamePath::key("rows"));
        ops.add(Some(json!(1)), None).unwrap();
        ops.add(Some(json!(2)), Some(0)).unwrap();
        ops.move_entry(0, 1).unwrap();
        ops.remove(0).unwrap();
        assert_eq!(store.value_at(&NamePath::key("rows")), Some(json!([2])));
    }
}
