//! Recursive schema builder.
//!
//! Walks one JSON document and produces an entity for every object shape it
//! contains. The entity for the document itself comes first, followed by its
//! nested entities in field order, each directly followed by its own
//! descendants.

use serde_json::Value;
use tracing::{debug, warn};

use crate::advisory::Advisory;
use crate::config::{ArrayShapePolicy, GenerationConfig};
use crate::naming::NameResolver;
use crate::schema::classify::{classify, is_heterogeneous};
use crate::schema::reduce::{element_shape, partially_present_keys};
use crate::types::{Entity, Field, FieldKind, ScalarKind, SourceArena};

/// Builds entities from JSON documents, recording the source object of each
/// entity and any modeling limitations hit along the way
pub struct SchemaBuilder<'a> {
    config: &'a GenerationConfig,
    names: NameResolver<'a>,
    sources: SourceArena,
    advisories: Vec<Advisory>,
    document: Option<String>,
}

/// Where a field sits while it is being built
struct FieldSite<'s> {
    entity_name: &'s str,
    key: &'s str,
    field_name: &'s str,
    depth: usize,
}

impl<'a> SchemaBuilder<'a> {
    pub fn new(config: &'a GenerationConfig) -> Self {
        SchemaBuilder {
            config,
            names: NameResolver::new(config),
            sources: SourceArena::new(),
            advisories: Vec::new(),
            document: None,
        }
    }

    /// Builder whose advisories name the given document
    pub fn for_document(config: &'a GenerationConfig, document: impl Into<String>) -> Self {
        let mut builder = Self::new(config);
        builder.document = Some(document.into());
        builder
    }

    /// Build the entities for `document`.
    ///
    /// Arrays model their element type; empty arrays, arrays of non-objects
    /// and bare scalars produce no entities and record an advisory instead.
    pub fn build(&mut self, document: &Value, base_name: &str, is_top_level: bool) -> Vec<Entity> {
        match document {
            Value::Object(_) => {
                let entity_name = self.names.entity_name(base_name, is_top_level);
                self.build_object(document, &entity_name, is_top_level, &[document], 0)
            }
            Value::Array(items) => match items.first() {
                Some(Value::Object(_)) => {
                    let shape = element_shape(items, self.config.array_shape);
                    let samples = self.element_samples(items.iter().collect(), &shape);
                    let entity_name = self.names.entity_name(base_name, is_top_level);
                    self.build_object(&shape, &entity_name, is_top_level, &samples, 0)
                }
                Some(_) => {
                    let document = self.document_label(base_name);
                    self.advise(Advisory::PrimitiveTopLevelArray { document });
                    Vec::new()
                }
                None => {
                    let document = self.document_label(base_name);
                    self.advise(Advisory::EmptyTopLevelArray { document });
                    Vec::new()
                }
            },
            _ => {
                let document = self.document_label(base_name);
                self.advise(Advisory::ScalarDocument { document });
                Vec::new()
            }
        }
    }

    /// Build a reduced object under an already resolved entity name.
    ///
    /// `samples` are the objects that were reduced into `object`; a key
    /// missing or null in any of them, at any nesting level, makes its field
    /// optional.
    pub fn build_named(
        &mut self,
        object: &Value,
        entity_name: &str,
        is_top_level: bool,
        samples: &[&Value],
    ) -> Vec<Entity> {
        self.build_object(object, entity_name, is_top_level, samples, 0)
    }

    pub fn sources(&self) -> &SourceArena {
        &self.sources
    }

    pub fn advisories(&self) -> &[Advisory] {
        &self.advisories
    }

    /// Consume the builder, returning the source arena and the advisories
    pub fn finish(self) -> (SourceArena, Vec<Advisory>) {
        (self.sources, self.advisories)
    }

    fn build_object(
        &mut self,
        value: &Value,
        entity_name: &str,
        is_top_level: bool,
        samples: &[&Value],
        depth: usize,
    ) -> Vec<Entity> {
        let Value::Object(object) = value else {
            return Vec::new();
        };

        let partial = partially_present_keys(samples.iter().copied());
        let source = self.sources.insert(value.clone());
        let mut entity = Entity::new(entity_name, is_top_level).with_source(source);
        let mut nested = Vec::new();

        for (key, field_value) in object {
            let field_name = self.names.resolve_field_name(key);
            let site = FieldSite {
                entity_name,
                key,
                field_name: &field_name,
                depth,
            };
            let Some(kind) = self.field_kind(&site, field_value, samples, &mut nested) else {
                continue;
            };

            let constant_name = self.names.constant_name(entity_name, &field_name);
            let optional = self.config.fields_optional_by_default || partial.contains(key);

            entity.fields.push(Field {
                source_key: key.clone(),
                resolved_name: field_name,
                kind,
                constant_name,
                optional,
            });
        }

        debug!(
            entity = %entity.name,
            fields = entity.fields.len(),
            nested = nested.len(),
            "built entity"
        );

        let mut entities = Vec::with_capacity(nested.len() + 1);
        entities.push(entity);
        entities.extend(nested);
        entities
    }

    /// Kind of one field, building nested entities into `nested`.
    /// `None` drops the field.
    fn field_kind(
        &mut self,
        site: &FieldSite<'_>,
        value: &Value,
        samples: &[&Value],
        nested: &mut Vec<Entity>,
    ) -> Option<FieldKind> {
        match value {
            Value::Null => {
                debug!(entity = %site.entity_name, field = %site.key, "skipping null field");
                None
            }
            Value::Object(_) => {
                if !self.within_depth(site) {
                    return None;
                }
                let child_samples: Vec<&Value> = samples
                    .iter()
                    .copied()
                    .filter_map(|sample| sample.get(site.key))
                    .filter(|v| v.is_object())
                    .collect();
                let child_name = self.names.entity_name(site.field_name, false);
                let produced = self.build_object(value, &child_name, false, &child_samples, site.depth + 1);
                let name = produced.first()?.name.clone();
                nested.extend(produced);
                Some(FieldKind::ObjectRef(name))
            }
            Value::Array(items) => {
                let sample_items: Vec<&Value> = samples
                    .iter()
                    .copied()
                    .filter_map(|sample| sample.get(site.key))
                    .filter_map(Value::as_array)
                    .flatten()
                    .collect();
                self.array_kind(site, items, sample_items, nested)
            }
            scalar => Some(classify(scalar)),
        }
    }

    /// `sample_items` are the elements of this array across every sample,
    /// at the same nesting level as `items`
    fn array_kind(
        &mut self,
        site: &FieldSite<'_>,
        items: &[Value],
        sample_items: Vec<&Value>,
        nested: &mut Vec<Entity>,
    ) -> Option<FieldKind> {
        let Some(first) = items.first() else {
            return Some(FieldKind::EmptyArray);
        };

        if is_heterogeneous(items) {
            self.advise(Advisory::HeterogeneousArray {
                entity: site.entity_name.to_string(),
                field: site.key.to_string(),
            });
        }

        match first {
            Value::Object(_) => {
                if !self.within_depth(site) {
                    return None;
                }
                let shape = element_shape(items, self.config.array_shape);
                let child_samples = self.element_samples(sample_items, &shape);
                let child_name = self.names.entity_name(site.field_name, false);
                let produced = self.build_object(&shape, &child_name, false, &child_samples, site.depth + 1);
                let name = produced.first()?.name.clone();
                nested.extend(produced);
                Some(FieldKind::array_of(FieldKind::ObjectRef(name)))
            }
            Value::Array(_) => {
                let inner: Vec<Value> = items
                    .iter()
                    .filter_map(Value::as_array)
                    .flatten()
                    .cloned()
                    .collect();
                let inner_samples: Vec<&Value> = sample_items
                    .into_iter()
                    .filter_map(Value::as_array)
                    .flatten()
                    .collect();
                let kind = self.array_kind(site, &inner, inner_samples, nested)?;
                Some(FieldKind::array_of(kind))
            }
            Value::Null => Some(FieldKind::array_of(FieldKind::Scalar(ScalarKind::Null))),
            scalar => Some(FieldKind::array_of(classify(scalar))),
        }
    }

    fn within_depth(&mut self, site: &FieldSite<'_>) -> bool {
        if site.depth < self.config.max_depth {
            return true;
        }
        self.advise(Advisory::DepthLimitReached {
            entity: site.entity_name.to_string(),
            field: site.key.to_string(),
            depth: self.config.max_depth,
        });
        false
    }

    /// Objects feeding the element entity of an array: every object element
    /// when reducing, only the element shape itself otherwise
    fn element_samples<'v>(&self, elements: Vec<&'v Value>, shape: &'v Value) -> Vec<&'v Value> {
        match self.config.array_shape {
            ArrayShapePolicy::ReduceAll => elements.into_iter().filter(|v| v.is_object()).collect(),
            ArrayShapePolicy::FirstElement => vec![shape],
        }
    }

    fn document_label(&self, base_name: &str) -> String {
        self.document.clone().unwrap_or_else(|| base_name.to_string())
    }

    fn advise(&mut self, advisory: Advisory) {
        warn!("{advisory}");
        self.advisories.push(advisory);
    }
}

/// Build the entities for one document with a throwaway builder
pub fn build(document: &Value, base_name: &str, is_top_level: bool, config: &GenerationConfig) -> Vec<Entity> {
    SchemaBuilder::new(config).build(document, base_name, is_top_level)
}
