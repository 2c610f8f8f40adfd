//! Reading and writing form values by name path.

use serde_json::{Map, Value};

use super::name::{NamePath, PathSegment};

/// Look up the value at `path`.
///
/// Index segments also address objects with numeric-string keys, so a path
/// behaves the same whether a list was stored as an array or a map.
pub fn get_in<'a>(values: &'a Value, path: &NamePath) -> Option<&'a Value> {
    path.iter().try_fold(values, |current, segment| match (segment, current) {
        (PathSegment::Key(key), Value::Object(map)) => map.get(key),
        (PathSegment::Index(index), Value::Array(items)) => items.get(*index),
        (PathSegment::Index(index), Value::Object(map)) => map.get(&index.to_string()),
        _ => None,
    })
}

/// Write `value` at `path`, creating intermediate objects and arrays.
///
/// A key segment turns a non-object into an empty object; an index segment
/// turns a non-array into an empty array and pads it with `null`.
pub fn set_in(values: &mut Value, path: &NamePath, value: Value) {
    let Some((last, parents)) = path.segments().split_last() else {
        *values = value;
        return;
    };

    let mut current = values;
    for segment in parents {
        current = slot(current, segment);
    }
    *slot(current, last) = value;
}

fn slot<'a>(current: &'a mut Value, segment: &PathSegment) -> &'a mut Value {
    match segment {
        PathSegment::Key(key) => {
            if !current.is_object() {
                *current = Value::Object(Map::new());
            }
            match current {
                Value::Object(map) => map.entry(key.clone()).or_insert(Value::Null),
                _ => unreachable!("just replaced with an object"),
            }
        }
        PathSegment::Index(index) => {
            if !current.is_array() {
                *current = Value::Array(Vec::new());
            }
            match current {
                Value::Array(items) => {
                    if items.len() <= *index {
                        items.resize(*index + 1, Value::Null);
                    }
                    &mut items[*index]
                }
                _ => unreachable!("just replaced with an array"),
            }
        }
    }
}

/// Copy only the values under `paths` into a fresh object.
///
/// Paths with no current value are skipped.
pub fn pick<'a>(values: &Value, paths: impl IntoIterator<Item = &'a NamePath>) -> Value {
    let mut out = Value::Object(Map::new());
    for path in paths {
        if path.is_empty() {
            continue;
        }
        if let Some(value) = get_in(values, path) {
            set_in(&mut out, path, value.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name_path;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "name": "Ada",
            "contacts": [
                { "email": "a@example.com" },
                { "email": "b@example.com", "phones": ["1", "2"] }
            ],
            "by_id": { "0": { "label": "zero" } }
        })
    }

    #[test]
    fn get_top_level_key() {
        assert_eq!(get_in(&sample(), &NamePath::key("name")), Some(&json!("Ada")));
    }

    #[test]
    fn get_nested_through_array() {
        let values = sample();
        let path = name_path!["contacts", 1usize, "phones", 0usize];
        assert_eq!(get_in(&values, &path), Some(&json!("1")));
    }

    #[test]
    fn index_addresses_numeric_object_keys() {
        let values = sample();
        let path = name_path!["by_id", 0usize, "label"];
        assert_eq!(get_in(&values, &path), Some(&json!("zero")));
    }

    #[test]
    fn missing_path_is_none() {
        let values = sample();
        assert_eq!(get_in(&values, &name_path!["contacts", 5usize]), None);
        assert_eq!(get_in(&values, &name_path!["name", "first"]), None);
    }

    #[test]
    fn empty_path_is_whole_value() {
        let values = sample();
        assert_eq!(get_in(&values, &NamePath::new()), Some(&values));
    }

    #[test]
    fn set_creates_intermediate_containers() {
        let mut values = json!({});
        set_in(&mut values, &name_path!["contacts", 1usize, "email"], json!("x"));
        assert_eq!(values, json!({ "contacts": [null, { "email": "x" }] }));
    }

    #[test]
    fn set_overwrites_existing() {
        let mut values = sample();
        set_in(&mut values, &NamePath::key("name"), json!("Grace"));
        assert_eq!(values["name"], json!("Grace"));
    }

    #[test]
    fn set_empty_path_replaces_root() {
        let mut values = sample();
        set_in(&mut values, &NamePath::new(), json!({ "fresh": true }));
        assert_eq!(values, json!({ "fresh": true }));
    }

    #[test]
    fn pick_projects_registered_paths() {
        let values = sample();
        let paths = [NamePath::key("name"), name_path!["contacts", 0usize, "email"]];
        assert_eq!(
            pick(&values, &paths),
            json!({ "name": "Ada", "contacts": [{ "email": "a@example.com" }] })
        );
    }

    #[test]
    fn pick_skips_missing_and_empty() {
        let values = sample();
        let paths = [NamePath::new(), NamePath::key("absent")];
        assert_eq!(pick(&values, &paths), json!({}));
    }
}
