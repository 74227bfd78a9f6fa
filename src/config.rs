//! Generation settings
//!
//! [`GenerationConfig`] is plain data threaded through every inference call.
//! It deserializes from a `.config.json` sidecar with camelCase keys; any
//! key may be omitted.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConfigError;
use crate::naming::NameResolver;

/// Whether generated models are value types or reference types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum ConstructKind {
    #[default]
    ValueType,
    ReferenceType,
}

impl fmt::Display for ConstructKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructKind::ValueType => f.write_str("value-type"),
            ConstructKind::ReferenceType => f.write_str("reference-type"),
        }
    }
}

/// Output idiom the emitter will use for serialization glue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum MappingStyle {
    /// Serialization derived by the target compiler
    #[default]
    Derived,
    /// Hand-written accessors over a dynamic JSON wrapper
    Accessor,
    /// Two-way mapping functions
    Mapper,
    /// Decode-only unmarshaling
    Marshal,
}

impl MappingStyle {
    pub const ALL: [MappingStyle; 4] = [
        MappingStyle::Derived,
        MappingStyle::Accessor,
        MappingStyle::Mapper,
        MappingStyle::Marshal,
    ];
}

impl fmt::Display for MappingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rules().name())
    }
}

/// How entities sharing a name are combined after per-document builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MergeRule {
    /// Reduce all source objects of the group and rebuild one entity
    ByName,
    /// Keep the first entity of the group as-is
    KeepFirst,
}

/// How the element shape of an array of objects is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArrayShapePolicy {
    /// Union of all elements' keys
    #[default]
    ReduceAll,
    /// Shape of the first element only
    FirstElement,
}

/// Configuration for a generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationConfig {
    /// Name of the root entity when a single document is generated
    pub base_entity_name: String,

    /// Prepended verbatim to every entity name
    pub name_prefix: Option<String>,

    pub fields_optional_by_default: bool,

    pub construct_kind: ConstructKind,

    pub mapping_style: MappingStyle,

    /// Archiving (coder) support, reference types only
    pub archiving: bool,

    /// Overrides the mapping style's keyword table
    pub reserved_words: Option<Vec<String>>,

    /// Appended to field names that collide with a reserved word
    pub reserved_suffix: String,

    pub merge_rule: Option<MergeRule>,

    pub array_shape: ArrayShapePolicy,

    /// Maximum object nesting depth before fields are skipped
    pub max_depth: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            base_entity_name: String::from("Base"),
            name_prefix: None,
            fields_optional_by_default: false,
            construct_kind: ConstructKind::ValueType,
            mapping_style: MappingStyle::Derived,
            archiving: false,
            reserved_words: None,
            reserved_suffix: String::from("Value"),
            merge_rule: Some(MergeRule::ByName),
            array_shape: ArrayShapePolicy::ReduceAll,
            max_depth: 64,
        }
    }
}

impl GenerationConfig {
    pub fn new(base_entity_name: impl Into<String>) -> Self {
        GenerationConfig {
            base_entity_name: base_entity_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn with_mapping_style(mut self, style: MappingStyle) -> Self {
        self.mapping_style = style;
        self
    }

    #[must_use]
    pub fn with_construct_kind(mut self, construct: ConstructKind) -> Self {
        self.construct_kind = construct;
        self
    }

    #[must_use]
    pub fn with_fields_optional(mut self, optional: bool) -> Self {
        self.fields_optional_by_default = optional;
        self
    }

    #[must_use]
    pub fn with_merge_rule(mut self, rule: Option<MergeRule>) -> Self {
        self.merge_rule = rule;
        self
    }

    #[must_use]
    pub fn with_array_shape(mut self, policy: ArrayShapePolicy) -> Self {
        self.array_shape = policy;
        self
    }

    #[must_use]
    pub fn with_reserved_words(mut self, words: Vec<String>, suffix: impl Into<String>) -> Self {
        self.reserved_words = Some(words);
        self.reserved_suffix = suffix.into();
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// The configured prefix, or "" if none
    pub fn prefix(&self) -> &str {
        self.name_prefix.as_deref().unwrap_or("")
    }

    /// Check construct/style combinations before any generation work
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rules = self.mapping_style.rules();

        if rules.requires_reference_type() && self.construct_kind == ConstructKind::ValueType {
            return Err(ConfigError::ConstructMismatch {
                style: self.mapping_style,
                construct: self.construct_kind,
            });
        }

        if self.archiving && self.construct_kind == ConstructKind::ValueType {
            return Err(ConfigError::ArchivingRequiresReferenceType);
        }

        if let Some(prefix) = &self.name_prefix {
            let valid = prefix
                .chars()
                .enumerate()
                .all(|(i, c)| c == '_' || c.is_alphabetic() || (i > 0 && c.is_ascii_digit()));
            if !valid {
                return Err(ConfigError::InvalidPrefix {
                    prefix: prefix.clone(),
                });
            }
        }

        let resolver = NameResolver::new(self);
        if resolver.resolve_field_name(&self.base_entity_name).is_empty() {
            return Err(ConfigError::EmptyBaseName {
                name: self.base_entity_name.clone(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(GenerationConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_mapper_requires_reference_type() {
        let config = GenerationConfig::default().with_mapping_style(MappingStyle::Mapper);
        assert_eq!(
            config.validate(),
            Err(ConfigError::ConstructMismatch {
                style: MappingStyle::Mapper,
                construct: ConstructKind::ValueType,
            })
        );

        let config = config.with_construct_kind(ConstructKind::ReferenceType);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_archiving_requires_reference_type() {
        let mut config = GenerationConfig::default();
        config.archiving = true;
        assert_eq!(config.validate(), Err(ConfigError::ArchivingRequiresReferenceType));

        config.construct_kind = ConstructKind::ReferenceType;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_invalid_prefix() {
        let config = GenerationConfig::default().with_prefix("9X");
        assert!(matches!(config.validate(), Err(ConfigError::InvalidPrefix { .. })));

        let config = GenerationConfig::default().with_prefix("");
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_empty_base_name() {
        let config = GenerationConfig::new("-_-");
        assert!(matches!(config.validate(), Err(ConfigError::EmptyBaseName { .. })));
    }

    #[test]
    fn test_partial_sidecar_uses_defaults() {
        let config: GenerationConfig = serde_json::from_str(
            r#"{"baseEntityName": "Person", "namePrefix": "AB", "mappingStyle": "mapper", "constructKind": "referenceType"}"#,
        )
        .unwrap();

        assert_eq!(config.base_entity_name, "Person");
        assert_eq!(config.prefix(), "AB");
        assert_eq!(config.mapping_style, MappingStyle::Mapper);
        assert_eq!(config.construct_kind, ConstructKind::ReferenceType);
        assert_eq!(config.merge_rule, Some(MergeRule::ByName));
        assert_eq!(config.reserved_suffix, "Value");
        assert_eq!(config.max_depth, 64);
    }

    #[test]
    fn test_explicit_null_merge_rule() {
        let config: GenerationConfig = serde_json::from_str(r#"{"mergeRule": null}"#).unwrap();
        assert_eq!(config.merge_rule, None);
    }
}
