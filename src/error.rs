//! Error types for anvil
//!
//! Input and configuration problems are errors. Modeling limitations
//! (empty arrays, primitive top-level documents) are reported as
//! [`Advisory`](crate::Advisory) values instead.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::{ConstructKind, MappingStyle};

/// The main error type for model generation
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Input Errors
    // ============================================================================
    #[error("No documents to generate models from")]
    NoDocuments,

    #[error("Document '{name}' is not valid JSON: {source}")]
    InvalidDocument {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Document '{name}' does not produce an entity name")]
    EmptyDocumentName { name: String },

    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No .json documents found in '{}'", path.display())]
    NoJsonFiles { path: PathBuf },

    #[error("Invalid input pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Sidecar config '{}' is invalid: {source}", path.display())]
    InvalidSidecar {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Multiple documents require a merge rule for the '{style}' mapping style")]
    MissingMergeRule { style: MappingStyle },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Structurally invalid generation settings, reported before any work starts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("The '{style}' mapping style cannot generate {construct} constructs")]
    ConstructMismatch {
        style: MappingStyle,
        construct: ConstructKind,
    },

    #[error("Archiving support is only available for reference-type constructs")]
    ArchivingRequiresReferenceType,

    #[error("Name prefix '{prefix}' is not a valid identifier prefix")]
    InvalidPrefix { prefix: String },

    #[error("Base entity name '{name}' does not produce an identifier")]
    EmptyBaseName { name: String },
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_document_names_document() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::InvalidDocument {
            name: "Dog".to_string(),
            source,
        };
        let message = err.to_string();
        assert!(message.contains("'Dog'"), "{message}");
        assert!(message.contains("EOF"), "{message}");
    }

    #[test]
    fn test_config_error_converts() {
        let err: Error = ConfigError::ArchivingRequiresReferenceType.into();
        assert!(matches!(err, Error::Config(ConfigError::ArchivingRequiresReferenceType)));
    }
}
