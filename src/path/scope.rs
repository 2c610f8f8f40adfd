//! Scope context: where a field sits inside nested repeatable lists.
//!
//! A [`ScopeContext`] is an immutable value threaded down each recursive
//! render call. Descending into a list entry or a nested group produces a new
//! context via [`ScopeContext::push_entry`] / [`ScopeContext::push_group`];
//! the parent's context is never mutated, so sibling branches cannot observe
//! each other's scope.
//!
//! A field's full identifier is always
//!
//! ```text
//! root ++ (frame.base ++ [frame.entry.index])* ++ relative
//! ```

use std::fmt::Write as _;

use serde_json::Value;

use super::name::NamePath;
use super::value::get_in;
use crate::host::ListEntry;

/// One level of nesting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeFrame {
    /// Name of the list (or group) relative to the enclosing scope.
    pub base: NamePath,
    /// The list entry this frame stands for. `None` for plain groups.
    pub entry: Option<ListEntry>,
}

/// Root prefix plus the ordered stack of enclosing scope frames.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeContext {
    root: NamePath,
    frames: Vec<ScopeFrame>,
}

impl ScopeContext {
    /// The form root: no prefix, no frames.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context whose identifiers all start with `root`.
    pub fn with_root(root: NamePath) -> Self {
        Self {
            root,
            frames: Vec::new(),
        }
    }

    /// Descend into `entry` of the list named `base`.
    pub fn push_entry(&self, base: NamePath, entry: ListEntry) -> Self {
        self.pushed(ScopeFrame {
            base,
            entry: Some(entry),
        })
    }

    /// Descend into a nested group named `base` (no list entry).
    pub fn push_group(&self, base: NamePath) -> Self {
        self.pushed(ScopeFrame { base, entry: None })
    }

    fn pushed(&self, frame: ScopeFrame) -> Self {
        let mut frames = Vec::with_capacity(self.frames.len() + 1);
        frames.extend_from_slice(&self.frames);
        frames.push(frame);
        Self {
            root: self.root.clone(),
            frames,
        }
    }

    pub fn root(&self) -> &NamePath {
        &self.root
    }

    pub fn frames(&self) -> &[ScopeFrame] {
        &self.frames
    }

    /// Nesting depth (number of frames).
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// The accumulated prefix every identifier in this scope starts with.
    pub fn path(&self) -> NamePath {
        self.frames
            .iter()
            .fold(self.root.clone(), |path, frame| Self::frame_path(path, frame))
    }

    fn frame_path(path: NamePath, frame: &ScopeFrame) -> NamePath {
        let mut path = path.join(&frame.base);
        if let Some(entry) = frame.entry {
            path.push(entry.index);
        }
        path
    }

    /// Full identifier for a field whose own name is `relative`.
    pub fn compose(&self, relative: &NamePath) -> NamePath {
        self.path().join(relative)
    }

    /// The list entry this scope sits directly in, if its innermost frame
    /// is a list entry.
    pub fn entry(&self) -> Option<ListEntry> {
        self.frames.last().and_then(|frame| frame.entry)
    }

    /// Path of the innermost list entry, if any frame is one.
    ///
    /// Group frames nested below that entry do not narrow the scope further.
    pub fn entry_path(&self) -> Option<NamePath> {
        let innermost = self.frames.iter().rposition(|frame| frame.entry.is_some())?;
        Some(
            self.frames[..=innermost]
                .iter()
                .fold(self.root.clone(), |path, frame| Self::frame_path(path, frame)),
        )
    }

    /// The values a computed property sees in this scope.
    ///
    /// Inside a list entry this is the entry's own sub-object (or `null` if
    /// it has no value yet); at the form root it is every value.
    pub fn scoped_values(&self, values: &Value) -> Value {
        match self.entry_path() {
            Some(path) => get_in(values, &path).cloned().unwrap_or(Value::Null),
            None => values.clone(),
        }
    }

    /// Stable identity of this scope for caching per-slot state.
    ///
    /// Built from list base names and entry keys (not indices), so an entry
    /// that moves keeps its identity.
    pub fn slot_prefix(&self) -> String {
        let mut prefix = self.root.to_string();
        for frame in &self.frames {
            prefix.push('/');
            let _ = write!(prefix, "{}", frame.base);
            if let Some(entry) = frame.entry {
                let _ = write!(prefix, "@{}", entry.key);
            }
        }
        prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name_path;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn entry(key: u64, index: usize) -> ListEntry {
        ListEntry { key, index }
    }

    #[test]
    fn root_scope_composes_relative_name() {
        let scope = ScopeContext::new();
        assert_eq!(scope.compose(&NamePath::key("name")), NamePath::key("name"));
        assert!(scope.entry().is_none());
    }

    #[test]
    fn list_entry_index_is_the_segment() {
        let scope = ScopeContext::new().push_entry(NamePath::key("contacts"), entry(7, 2));
        assert_eq!(
            scope.compose(&NamePath::key("email")),
            name_path!["contacts", 2usize, "email"]
        );
    }

    #[test]
    fn multi_segment_relative_name_appended_in_order() {
        let scope = ScopeContext::new().push_entry(NamePath::key("contacts"), entry(0, 1));
        assert_eq!(
            scope.compose(&name_path!["address", "city"]),
            name_path!["contacts", 1usize, "address", "city"]
        );
    }

    #[test]
    fn empty_relative_name_stops_at_entry() {
        let scope = ScopeContext::new().push_entry(NamePath::key("tags"), entry(0, 3));
        assert_eq!(scope.compose(&NamePath::new()), name_path!["tags", 3usize]);
    }

    #[test]
    fn root_prefix_comes_first() {
        let scope = ScopeContext::with_root(NamePath::key("profile"))
            .push_entry(NamePath::key("contacts"), entry(0, 0))
            .push_entry(NamePath::key("phones"), entry(4, 1));
        assert_eq!(
            scope.compose(&NamePath::key("number")),
            name_path!["profile", "contacts", 0usize, "phones", 1usize, "number"]
        );
    }

    #[test]
    fn push_does_not_touch_parent() {
        let parent = ScopeContext::new().push_entry(NamePath::key("a"), entry(0, 0));
        let _child = parent.push_entry(NamePath::key("b"), entry(1, 1));
        assert_eq!(parent.depth(), 1);
        assert_eq!(parent.path(), name_path!["a", 0usize]);
    }

    #[test]
    fn scoped_values_at_root_are_everything() {
        let values = json!({ "a": 1 });
        assert_eq!(ScopeContext::new().scoped_values(&values), values);
    }

    #[test]
    fn scoped_values_in_entry_are_the_row() {
        let values = json!({ "contacts": [{ "email": "x" }, { "email": "y" }] });
        let scope = ScopeContext::new().push_entry(NamePath::key("contacts"), entry(9, 1));
        assert_eq!(scope.scoped_values(&values), json!({ "email": "y" }));
    }

    #[test]
    fn scoped_values_ignore_groups_below_entry() {
        let values = json!({ "rows": [{ "address": { "city": "Oslo" } }] });
        let scope = ScopeContext::new()
            .push_entry(NamePath::key("rows"), entry(0, 0))
            .push_group(NamePath::key("address"));
        assert_eq!(scope.scoped_values(&values), json!({ "address": { "city": "Oslo" } }));
        assert_eq!(scope.path(), name_path!["rows", 0usize, "address"]);
        assert!(scope.entry().is_none());
    }

    #[test]
    fn scoped_values_missing_row_is_null() {
        let values = json!({});
        let scope = ScopeContext::new().push_entry(NamePath::key("rows"), entry(0, 0));
        assert_eq!(scope.scoped_values(&values), Value::Null);
    }

    #[test]
    fn root_only_scope_sees_all_values() {
        let values = json!({ "profile": { "a": 1 }, "b": 2 });
        let scope = ScopeContext::with_root(NamePath::key("profile"));
        assert_eq!(scope.scoped_values(&values), values);
    }

    #[test]
    fn slot_prefix_uses_keys_not_indices() {
        let first = ScopeContext::new().push_entry(NamePath::key("rows"), entry(5, 0));
        let moved = ScopeContext::new().push_entry(NamePath::key("rows"), entry(5, 3));
        assert_eq!(first.slot_prefix(), moved.slot_prefix());
        assert_eq!(first.slot_prefix(), "/rows@5");
    }
}
