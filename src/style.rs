//! Per-style rules consulted by inference.
//!
//! Each [`MappingStyle`] has one rules struct; [`MappingStyle::rules`] is the
//! dispatch table. Emitters own everything else about a style.

use crate::config::MappingStyle;

/// Keywords of the target idiom shared by every style
const BASE_KEYWORDS: &[&str] = &[
    "associatedtype", "class", "deinit", "enum", "extension", "fileprivate", "func", "import",
    "init", "inout", "internal", "let", "open", "operator", "private", "protocol", "public",
    "static", "struct", "subscript", "typealias", "var", "break", "case", "continue", "default",
    "defer", "do", "else", "fallthrough", "for", "guard", "if", "in", "repeat", "return",
    "switch", "where", "while", "as", "catch", "false", "is", "nil", "rethrows", "super", "self",
    "throw", "throws", "true", "try", "description", "type", "Type", "Self",
];

/// Rules a mapping style imposes on inferred models
pub trait StyleRules: Sync {
    fn name(&self) -> &'static str;

    /// Words that may not be used verbatim as property names
    fn reserved_words(&self) -> &'static [&'static str] {
        BASE_KEYWORDS
    }

    /// Extra words reserved only by this style
    fn style_reserved_words(&self) -> &'static [&'static str] {
        &[]
    }

    fn requires_reference_type(&self) -> bool {
        false
    }

    /// Whether several documents feeding one namespace need an explicit merge rule
    fn requires_merge_rule(&self) -> bool {
        true
    }

    fn is_reserved(&self, word: &str) -> bool {
        self.reserved_words().contains(&word) || self.style_reserved_words().contains(&word)
    }
}

pub struct DerivedRules;
pub struct AccessorRules;
pub struct MapperRules;
pub struct MarshalRules;

impl StyleRules for DerivedRules {
    fn name(&self) -> &'static str {
        "derived"
    }

    fn style_reserved_words(&self) -> &'static [&'static str] {
        &["CodingKeys", "encode"]
    }
}

impl StyleRules for AccessorRules {
    fn name(&self) -> &'static str {
        "accessor"
    }

    fn style_reserved_words(&self) -> &'static [&'static str] {
        &["json", "dictionaryRepresentation"]
    }
}

impl StyleRules for MapperRules {
    fn name(&self) -> &'static str {
        "mapper"
    }

    fn style_reserved_words(&self) -> &'static [&'static str] {
        &["map", "mapping"]
    }

    fn requires_reference_type(&self) -> bool {
        true
    }
}

impl StyleRules for MarshalRules {
    fn name(&self) -> &'static str {
        "marshal"
    }

    fn style_reserved_words(&self) -> &'static [&'static str] {
        &["value", "object"]
    }
}

impl MappingStyle {
    pub fn rules(self) -> &'static dyn StyleRules {
        match self {
            MappingStyle::Derived => &DerivedRules,
            MappingStyle::Accessor => &AccessorRules,
            MappingStyle::Mapper => &MapperRules,
            MappingStyle::Marshal => &MarshalRules,
        }
    }
}
