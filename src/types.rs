use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Scalar type of a JSON leaf value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    String,
    Int,
    Float,
    Bool,
    Null,
}

impl ScalarKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Int => "int",
            ScalarKind::Float => "float",
            ScalarKind::Bool => "bool",
            ScalarKind::Null => "null",
        }
    }
}

/// Inferred type of a single field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Scalar(ScalarKind),
    /// Reference to another entity, by name
    ObjectRef(String),
    ArrayOf(Box<FieldKind>),
    /// Array with no elements to infer from; emitted as an any-element array
    EmptyArray,
    Null,
}

impl FieldKind {
    pub fn array_of(inner: FieldKind) -> Self {
        FieldKind::ArrayOf(Box::new(inner))
    }

    /// Name of the entity this kind refers to, looking through arrays
    pub fn entity_ref(&self) -> Option<&str> {
        match self {
            FieldKind::ObjectRef(name) => Some(name),
            FieldKind::ArrayOf(inner) => inner.entity_ref(),
            _ => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Scalar(kind) => f.write_str(kind.as_str()),
            FieldKind::ObjectRef(name) => f.write_str(name),
            FieldKind::ArrayOf(inner) => write!(f, "[{}]", inner),
            FieldKind::EmptyArray => f.write_str("[any]"),
            FieldKind::Null => f.write_str("null"),
        }
    }
}

/// One inferred property of an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// The original JSON key
    pub source_key: String,

    /// Identifier-safe name for the property
    pub resolved_name: String,

    pub kind: FieldKind,

    /// Serialization key constant, e.g. `kUserFirstNameKey`
    pub constant_name: String,

    /// Whether the key was missing or null in some observed sample
    pub optional: bool,
}

/// Handle into a [`SourceArena`] for the JSON object an entity was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceId(pub usize);

/// An inferred object type - becomes one model definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// The entity type name, e.g. "Base", "Author"
    pub name: String,

    /// Fields in first-seen key order
    pub fields: Vec<Field>,

    pub is_top_level: bool,

    /// Back-reference to the originating JSON value, only meaningful
    /// together with the arena of the run that produced it
    #[serde(skip)]
    pub source: Option<SourceId>,
}

impl Entity {
    pub fn new(name: impl Into<String>, is_top_level: bool) -> Self {
        Entity {
            name: name.into(),
            fields: Vec::new(),
            is_top_level,
            source: None,
        }
    }

    pub fn with_source(mut self, source: SourceId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn field(&self, source_key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.source_key == source_key)
    }

    /// Names of the entities this one refers to, in field order
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().filter_map(|f| f.kind.entity_ref())
    }
}

/// Side table of the JSON objects entities were built from.
///
/// Entities hold a [`SourceId`] instead of a borrow so they stay plain values.
#[derive(Debug, Clone, Default)]
pub struct SourceArena {
    values: Vec<Value>,
}

impl SourceArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: Value) -> SourceId {
        self.values.push(value);
        SourceId(self.values.len() - 1)
    }

    pub fn get(&self, id: SourceId) -> Option<&Value> {
        self.values.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Move all values of `other` into this arena, returning the offset to add
    /// to ids that pointed into `other`
    pub fn absorb(&mut self, other: SourceArena) -> usize {
        let offset = self.values.len();
        self.values.extend(other.values);
        offset
    }
}
