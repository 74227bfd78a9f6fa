use serde::{Deserialize, Serialize};
use std::fmt;

/// A modeling limitation hit during inference.
///
/// Advisories never abort generation; they explain why a result is empty or
/// partial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    EmptyTopLevelArray { document: String },
    PrimitiveTopLevelArray { document: String },
    ScalarDocument { document: String },
    HeterogeneousArray { entity: String, field: String },
    DepthLimitReached { entity: String, field: String, depth: usize },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::EmptyTopLevelArray { document } => {
                write!(f, "{document}: top-level array is empty, no model generated")
            }
            Advisory::PrimitiveTopLevelArray { document } => {
                write!(f, "{document}: top-level array does not contain objects, no model generated")
            }
            Advisory::ScalarDocument { document } => {
                write!(f, "{document}: document is not an object or array, no model generated")
            }
            Advisory::HeterogeneousArray { entity, field } => {
                write!(f, "{entity}.{field}: array elements differ in kind, using the first element")
            }
            Advisory::DepthLimitReached { entity, field, depth } => {
                write!(f, "{entity}.{field}: nesting deeper than {depth} levels, field skipped")
            }
        }
    }
}
