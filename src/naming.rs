//! Identifier resolution for JSON keys.
//!
//! Keys become camelCase property names and UpperCamelCase entity names.
//! Casing inside each word is kept, so acronyms like `URL` survive.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::GenerationConfig;
use crate::style::StyleRules;

static SEPARATOR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-_]").unwrap());

enum ReservedWords<'a> {
    Style(&'static dyn StyleRules),
    Custom(&'a [String]),
}

impl ReservedWords<'_> {
    fn contains(&self, word: &str) -> bool {
        match self {
            ReservedWords::Style(rules) => rules.is_reserved(word),
            ReservedWords::Custom(words) => words.iter().any(|w| w == word),
        }
    }
}

/// Turns raw JSON keys into identifiers for the configured target idiom
pub struct NameResolver<'a> {
    reserved: ReservedWords<'a>,
    suffix: &'a str,
    prefix: &'a str,
}

impl<'a> NameResolver<'a> {
    pub fn new(config: &'a GenerationConfig) -> Self {
        let reserved = match &config.reserved_words {
            Some(words) => ReservedWords::Custom(words),
            None => ReservedWords::Style(config.mapping_style.rules()),
        };

        NameResolver {
            reserved,
            suffix: &config.reserved_suffix,
            prefix: config.prefix(),
        }
    }

    /// Property name for a JSON key, e.g. `first_name` -> `firstName`
    pub fn resolve_field_name(&self, raw_key: &str) -> String {
        if self.reserved.contains(raw_key) {
            return format!("{}{}", raw_key, self.suffix);
        }

        let spaced = SEPARATOR_REGEX.replace_all(raw_key, " ");

        let mut name = String::with_capacity(raw_key.len());
        for (i, token) in spaced.trim().split(' ').enumerate() {
            if i == 0 {
                name.push_str(&lower_first(token));
            } else {
                name.push_str(&upper_first(token));
            }
        }

        // "Class" or "type_" only collide after conversion
        if self.reserved.contains(&name) {
            name.push_str(self.suffix);
        }

        name
    }

    /// Entity name for a key or base name.
    ///
    /// Nested names arrive already resolved as field names and are reused
    /// verbatim; top-level names go through [`Self::resolve_field_name`] first.
    pub fn resolve_entity_name(&self, raw_key: &str, prefix: Option<&str>, is_top_level: bool) -> String {
        let name = if is_top_level {
            self.resolve_field_name(raw_key)
        } else {
            raw_key.to_string()
        };

        format!("{}{}", prefix.unwrap_or(""), upper_first(&name))
    }

    /// Entity name using the configured prefix
    pub fn entity_name(&self, raw_key: &str, is_top_level: bool) -> String {
        self.resolve_entity_name(raw_key, Some(self.prefix), is_top_level)
    }

    /// Serialization key constant for a field, e.g. `kUserFirstNameKey`
    pub fn constant_name(&self, entity_name: &str, field_name: &str) -> String {
        format!("k{}{}Key", entity_name, upper_first(field_name))
    }
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
