//! Shape reduction - fold several JSON objects into one representative.
//!
//! The representative carries the union of all observed keys, so building a
//! model from it covers every sample. Folding is left to right and
//! deterministic for a given input order.

use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::config::ArrayShapePolicy;

/// Deep-merge objects into one object holding the union of their keys.
///
/// Non-object inputs are skipped and an empty input gives an empty object.
/// For a key seen more than once:
/// - nested objects are merged recursively, the newer object's keys first
/// - arrays of objects (or of arrays) are concatenated and reduced to a
///   single representative element
/// - null never replaces a non-null value, and an empty array never
///   replaces a non-empty one
/// - otherwise the last value wins
pub fn reduce_objects<'a>(values: impl IntoIterator<Item = &'a Value>) -> Value {
    let mut result = Map::new();

    for value in values {
        let Value::Object(object) = value else {
            continue;
        };
        for (key, new_value) in object {
            merge_entry(&mut result, key, new_value);
        }
    }

    Value::Object(result)
}

/// Reduce the objects found in `values`, looking one level into nested arrays
pub fn reduce_array_of_objects<'a>(values: impl IntoIterator<Item = &'a Value>) -> Value {
    reduce_objects(objects_in(values))
}

/// Shape of the first object element only, ignoring the rest
pub fn first_element_shape<'a>(values: impl IntoIterator<Item = &'a Value>) -> Value {
    objects_in(values)
        .next()
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()))
}

/// Element shape of an array of objects under the given policy
pub fn element_shape(items: &[Value], policy: ArrayShapePolicy) -> Value {
    match policy {
        ArrayShapePolicy::ReduceAll => reduce_array_of_objects(items),
        ArrayShapePolicy::FirstElement => first_element_shape(items),
    }
}

/// Keys that are missing or null in at least one of the objects
pub fn partially_present_keys<'a>(values: impl IntoIterator<Item = &'a Value>) -> HashSet<String> {
    let objects: Vec<&Map<String, Value>> = objects_in(values).filter_map(Value::as_object).collect();

    let mut keys = HashSet::new();
    for object in &objects {
        for key in object.keys() {
            if keys.contains(key) {
                continue;
            }
            let everywhere = objects
                .iter()
                .all(|o| o.get(key).is_some_and(|v| !v.is_null()));
            if !everywhere {
                keys.insert(key.clone());
            }
        }
    }
    keys
}

/// Whether an array's first element is an object or an array
pub fn starts_with_container(items: &[Value]) -> bool {
    matches!(items.first(), Some(Value::Object(_) | Value::Array(_)))
}

fn objects_in<'a>(values: impl IntoIterator<Item = &'a Value>) -> impl Iterator<Item = &'a Value> {
    values.into_iter().flat_map(|value| {
        let found: Vec<&'a Value> = match value {
            Value::Object(_) => vec![value],
            Value::Array(inner) => inner.iter().filter(|v| v.is_object()).collect(),
            _ => Vec::new(),
        };
        found
    })
}

/// One-element array standing for all `elements`, nested as deep as the
/// first level that holds objects. `None` when no level holds an object.
fn representative_element(elements: &[&Value]) -> Option<Value> {
    if elements.iter().any(|v| v.is_object()) {
        let merged = reduce_objects(elements.iter().copied().filter(|v| v.is_object()));
        return Some(Value::Array(vec![merged]));
    }

    let inner: Vec<&Value> = elements
        .iter()
        .copied()
        .filter_map(Value::as_array)
        .flatten()
        .collect();
    if inner.is_empty() {
        return None;
    }
    representative_element(&inner).map(|element| Value::Array(vec![element]))
}

fn merge_entry(result: &mut Map<String, Value>, key: &str, new_value: &Value) {
    let absent = result.get(key).map_or(true, Value::is_null);
    if absent {
        // a fresh slot takes the value verbatim, keeping single-object folds lossless
        result.insert(key.to_string(), new_value.clone());
        return;
    }

    let Some(slot) = result.get_mut(key) else {
        return;
    };

    match new_value {
        Value::Object(_) => {
            let existing = std::mem::take(slot);
            *slot = reduce_objects([new_value, &existing]);
        }
        Value::Array(items) if starts_with_container(items) => {
            let old: &[Value] = slot.as_array().map(Vec::as_slice).unwrap_or_default();
            let combined: Vec<&Value> = old.iter().chain(items).collect();

            // arrays of scalar arrays have no shape to merge, last one wins
            let merged = representative_element(&combined).unwrap_or_else(|| new_value.clone());
            *slot = merged;
        }
        Value::Array(items) if items.is_empty() && slot.as_array().is_some_and(|a| !a.is_empty()) => {}
        Value::Null => {}
        _ => *slot = new_value.clone(),
    }
}
