//! # Anvil - JSON Model Inference
//!
//! Infers typed entity definitions from example JSON documents: every nested
//! object shape becomes an [`Entity`] with ordered, typed [`Field`]s and
//! identifier-safe names. Several documents can be generated together, in
//! which case entities that share a name are merged into one.
//!
//! ## Modules
//!
//! - **naming**: raw JSON keys to identifiers, entity names and key constants
//! - **schema**: value classification, shape reduction and the entity builder
//! - **merge**: multi-document generation with same-name merging
//! - **loader**: reading documents and `.config.json` sidecars from disk
//! - **writer**: JSON or outline output of a generation
//!
//! ## Quick Start
//!
//! ### Single document
//!
//! ```rust
//! use anvil::{build, FieldKind, GenerationConfig, ScalarKind};
//! use serde_json::json;
//!
//! let config = GenerationConfig::default().with_prefix("PT");
//! let entities = build(&json!({"user_id": 7, "profile": {"bio": "hi"}}), "Base", true, &config);
//!
//! assert_eq!(entities[0].name, "PTBase");
//! assert_eq!(entities[0].fields[0].resolved_name, "userId");
//! assert_eq!(entities[0].fields[0].kind, FieldKind::Scalar(ScalarKind::Int));
//! assert_eq!(entities[1].name, "PTProfile");
//! ```
//!
//! ### Several documents
//!
//! ```rust
//! use anvil::{generate, GenerationConfig};
//! use serde_json::json;
//! use std::collections::BTreeMap;
//!
//! # fn main() -> anvil::Result<()> {
//! let mut documents = BTreeMap::new();
//! documents.insert("Dog".to_string(), json!({"pet": {"barks": true}}));
//! documents.insert("Cat".to_string(), json!({"pet": {"meows": true}}));
//!
//! let generation = generate(&documents, &GenerationConfig::default())?;
//! let pet = generation.entity("Pet").unwrap();
//! assert_eq!(pet.fields.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod advisory;
pub mod config;
pub mod error;
pub mod loader;
pub mod merge;
pub mod naming;
pub mod schema;
pub mod style;
pub mod types;
pub mod writer;

// Re-export commonly used types for convenience
pub use advisory::Advisory;
pub use config::{ArrayShapePolicy, ConstructKind, GenerationConfig, MappingStyle, MergeRule};
pub use error::{ConfigError, Error, Result};
pub use merge::{generate, Generation, MultiDocumentMerger};
pub use naming::NameResolver;
pub use schema::{build, SchemaBuilder};
pub use style::StyleRules;
pub use types::{Entity, Field, FieldKind, ScalarKind, SourceArena, SourceId};
pub use writer::{OutputFormat, SchemaWriter};
