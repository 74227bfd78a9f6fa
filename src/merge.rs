//! Multi-document generation.
//!
//! Every document is built on its own (in parallel), then entities that ended
//! up with the same name are combined into one. With [`MergeRule::ByName`] the
//! source objects of a group are reduced and the merged shape is rebuilt, so
//! the entity carries the fields of every member.

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::advisory::Advisory;
use crate::config::{GenerationConfig, MergeRule};
use crate::error::{Error, Result};
use crate::naming::NameResolver;
use crate::schema::reduce::reduce_objects;
use crate::schema::SchemaBuilder;
use crate::types::{Entity, SourceArena, SourceId};

/// Result of a generation run
#[derive(Debug, Clone, Serialize)]
pub struct Generation {
    /// Entities with unique names, ordered by document name then first-seen order
    pub entities: Vec<Entity>,

    pub advisories: Vec<Advisory>,

    #[serde(skip)]
    sources: SourceArena,
}

impl Generation {
    /// True when the input was valid but produced no models
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// The JSON object an entity was built from
    pub fn source_of(&self, entity: &Entity) -> Option<&Value> {
        entity.source.and_then(|id| self.sources.get(id))
    }

    pub fn sources(&self) -> &SourceArena {
        &self.sources
    }
}

struct DocumentBuild {
    entities: Vec<Entity>,
    sources: SourceArena,
    advisories: Vec<Advisory>,
}

/// Generates one coherent entity set from several documents
pub struct MultiDocumentMerger<'a> {
    config: &'a GenerationConfig,
}

impl<'a> MultiDocumentMerger<'a> {
    pub fn new(config: &'a GenerationConfig) -> Self {
        MultiDocumentMerger { config }
    }

    /// Parse raw document texts, then generate.
    ///
    /// Any document that is not valid JSON aborts the run before generation.
    pub fn generate_from_sources(&self, sources: &BTreeMap<String, String>) -> Result<Generation> {
        let mut documents = BTreeMap::new();
        for (name, text) in sources {
            let value = serde_json::from_str::<Value>(text).map_err(|source| Error::InvalidDocument {
                name: name.clone(),
                source,
            })?;
            documents.insert(name.clone(), value);
        }
        self.generate(&documents)
    }

    /// Generate a single document under the configured base entity name
    pub fn generate_single(&self, document: &Value) -> Result<Generation> {
        let mut documents = BTreeMap::new();
        documents.insert(self.config.base_entity_name.clone(), document.clone());
        self.generate(&documents)
    }

    /// Build every document with its name as the base name, then merge
    /// same-named entities.
    pub fn generate(&self, documents: &BTreeMap<String, Value>) -> Result<Generation> {
        self.config.validate()?;

        if documents.is_empty() {
            return Err(Error::NoDocuments);
        }

        // document names become base entity names
        let names = NameResolver::new(self.config);
        if let Some(name) = documents.keys().find(|name| names.resolve_field_name(name).is_empty()) {
            return Err(Error::EmptyDocumentName { name: name.clone() });
        }

        let style = self.config.mapping_style;
        if documents.len() > 1 && self.config.merge_rule.is_none() && style.rules().requires_merge_rule() {
            return Err(Error::MissingMergeRule { style });
        }

        let ordered: Vec<(&String, &Value)> = documents.iter().collect();
        let builds: Vec<DocumentBuild> = ordered
            .into_par_iter()
            .map(|(name, value)| self.build_document(name, value))
            .collect();

        // barrier: all documents are built before grouping
        let mut sources = SourceArena::new();
        let mut entities = Vec::new();
        let mut advisories = Vec::new();
        for build in builds {
            let offset = sources.absorb(build.sources);
            entities.extend(build.entities.into_iter().map(|mut entity| {
                entity.source = entity.source.map(|id| SourceId(id.0 + offset));
                entity
            }));
            advisories.extend(build.advisories);
        }

        let built = entities.len();
        let entities = self.merge_groups(entities, &mut sources, &mut advisories);

        info!(
            documents = documents.len(),
            built,
            entities = entities.len(),
            advisories = advisories.len(),
            "generation complete"
        );

        Ok(Generation {
            entities,
            advisories,
            sources,
        })
    }

    fn build_document(&self, name: &str, value: &Value) -> DocumentBuild {
        let mut builder = SchemaBuilder::for_document(self.config, name);
        let entities = builder.build(value, name, true);
        debug!(document = %name, entities = entities.len(), "built document");

        let (sources, advisories) = builder.finish();
        DocumentBuild {
            entities,
            sources,
            advisories,
        }
    }

    /// Replace every group of same-named entities with a single entity,
    /// positioned where the group's first member was
    fn merge_groups(
        &self,
        entities: Vec<Entity>,
        sources: &mut SourceArena,
        advisories: &mut Vec<Advisory>,
    ) -> Vec<Entity> {
        let mut groups: IndexMap<String, Vec<Entity>> = IndexMap::new();
        for entity in entities {
            groups.entry(entity.name.clone()).or_default().push(entity);
        }

        let rule = self.config.merge_rule.unwrap_or(MergeRule::ByName);
        let mut merged = Vec::with_capacity(groups.len());

        for (name, mut members) in groups {
            if members.len() == 1 || rule == MergeRule::KeepFirst {
                merged.push(members.swap_remove(0));
                continue;
            }

            debug!(entity = %name, members = members.len(), "merging entity group");
            match self.merge_members(&name, &members, sources, advisories) {
                Some(entity) => merged.push(entity),
                None => merged.push(members.swap_remove(0)),
            }
        }

        merged
    }

    fn merge_members(
        &self,
        name: &str,
        members: &[Entity],
        sources: &mut SourceArena,
        advisories: &mut Vec<Advisory>,
    ) -> Option<Entity> {
        let values: Vec<&Value> = members
            .iter()
            .filter_map(|m| m.source.and_then(|id| sources.get(id)))
            .collect();
        if values.is_empty() {
            return None;
        }

        let shape = reduce_objects(values.iter().copied());
        let is_top_level = members.iter().any(|m| m.is_top_level);

        let mut builder = SchemaBuilder::new(self.config);
        let rebuilt = builder.build_named(&shape, name, is_top_level, &values);
        let (rebuilt_sources, rebuilt_advisories) = builder.finish();

        let offset = sources.absorb(rebuilt_sources);
        for advisory in rebuilt_advisories {
            if !advisories.contains(&advisory) {
                advisories.push(advisory);
            }
        }

        // nested entities of the rebuild are dropped, their own groups cover them
        let mut entity = rebuilt.into_iter().find(|e| e.name == name)?;
        entity.source = entity.source.map(|id| SourceId(id.0 + offset));

        for field in &mut entity.fields {
            let optional_in_member = members
                .iter()
                .filter_map(|m| m.field(&field.source_key))
                .any(|f| f.optional);
            field.optional |= optional_in_member;
        }

        Some(entity)
    }
}

/// Generate entities for several documents keyed by logical name
pub fn generate(documents: &BTreeMap<String, Value>, config: &GenerationConfig) -> Result<Generation> {
    MultiDocumentMerger::new(config).generate(documents)
}
