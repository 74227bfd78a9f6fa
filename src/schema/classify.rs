//! Kind classification of single JSON values

use serde_json::Value;

use crate::types::{FieldKind, ScalarKind};

/// Scalar kind of a leaf value, `None` for arrays and objects.
///
/// Numbers classify by storage: a number parsed with a fraction or exponent
/// is a float even when its value is whole (`3.0`).
pub fn scalar_kind(value: &Value) -> Option<ScalarKind> {
    match value {
        Value::String(_) => Some(ScalarKind::String),
        Value::Bool(_) => Some(ScalarKind::Bool),
        Value::Number(n) => {
            if n.is_f64() {
                Some(ScalarKind::Float)
            } else {
                Some(ScalarKind::Int)
            }
        }
        Value::Null => Some(ScalarKind::Null),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Kind of a field value, judged without looking at siblings.
///
/// Arrays are classified by their first element only. Objects, including
/// array elements, become `ObjectRef` with an empty name until the builder
/// assigns one.
pub fn classify(value: &Value) -> FieldKind {
    match value {
        Value::Null => FieldKind::Null,
        Value::Object(_) => FieldKind::ObjectRef(String::new()),
        Value::Array(items) => match items.first() {
            None => FieldKind::EmptyArray,
            Some(Value::Null) => FieldKind::array_of(FieldKind::Scalar(ScalarKind::Null)),
            Some(first) => FieldKind::array_of(classify(first)),
        },
        scalar => match scalar_kind(scalar) {
            Some(kind) => FieldKind::Scalar(kind),
            None => FieldKind::Null,
        },
    }
}

/// Whether any element differs in JSON kind from the first one.
///
/// Nulls are ignored, they carry no kind of their own.
pub fn is_heterogeneous(items: &[Value]) -> bool {
    let mut kinds = items.iter().filter(|v| !v.is_null()).map(json_kind);
    match kinds.next() {
        Some(first) => kinds.any(|k| k != first),
        None => false,
    }
}

#[derive(PartialEq, Eq)]
enum JsonKind {
    Bool,
    Int,
    Float,
    String,
    Array,
    Object,
    Null,
}

fn json_kind(value: &Value) -> JsonKind {
    match value {
        Value::Null => JsonKind::Null,
        Value::Bool(_) => JsonKind::Bool,
        Value::Number(n) if n.is_f64() => JsonKind::Float,
        Value::Number(_) => JsonKind::Int,
        Value::String(_) => JsonKind::String,
        Value::Array(_) => JsonKind::Array,
        Value::Object(_) => JsonKind::Object,
    }
}
