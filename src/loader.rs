//! Document discovery and loading.
//!
//! Inputs may be files, directories (every `*.json` inside, sorted) or glob
//! patterns. Each document is keyed by its file stem, which becomes the base
//! name of its top-level entity. A directory may carry a `.config.json`
//! sidecar with [`GenerationConfig`] settings.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::GenerationConfig;
use crate::error::{Error, Result};

/// Name of the per-directory settings file
pub const SIDECAR_FILE: &str = ".config.json";

/// Logical document name for a path, e.g. `data/user.json` -> `user`
pub fn document_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Expand files, directories and glob patterns into document paths
pub fn resolve_inputs<I>(inputs: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
    }

    let mut out = Vec::new();

    for raw in inputs {
        let input = raw.as_ref();

        if has_glob_chars(input) {
            let entries = glob::glob(input).map_err(|e| Error::InvalidPattern {
                pattern: input.to_string(),
                message: e.to_string(),
            })?;

            let mut matched_any = false;
            for entry in entries {
                let path = entry.map_err(|e| Error::InvalidPattern {
                    pattern: input.to_string(),
                    message: e.to_string(),
                })?;
                matched_any = true;
                out.push(path);
            }

            if !matched_any {
                return Err(Error::InvalidPattern {
                    pattern: input.to_string(),
                    message: "matched no files".to_string(),
                });
            }
            continue;
        }

        let path = PathBuf::from(input);
        let metadata = fs::metadata(&path).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;

        if metadata.is_dir() {
            out.extend(json_files_in(&path)?);
        } else {
            out.push(path);
        }
    }

    Ok(out)
}

/// Read every document, keyed by [`document_name`]
pub fn load_sources(paths: &[PathBuf]) -> Result<BTreeMap<String, String>> {
    let mut sources = BTreeMap::new();

    for path in paths {
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;

        let name = document_name(path);
        if sources.contains_key(&name) {
            warn!(document = %name, path = %path.display(), "duplicate document name, keeping the first");
            continue;
        }

        debug!(document = %name, bytes = text.len(), "loaded document");
        sources.insert(name, text);
    }

    Ok(sources)
}

/// Resolve inputs and read every document they name
pub fn load_documents<I>(inputs: I) -> Result<BTreeMap<String, String>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let paths = resolve_inputs(inputs)?;
    debug!(documents = paths.len(), "resolved inputs");
    load_sources(&paths)
}

/// Read the `.config.json` sidecar of a directory, if it has one
pub fn load_sidecar_config(dir: &Path) -> Result<Option<GenerationConfig>> {
    let path = dir.join(SIDECAR_FILE);
    if !path.is_file() {
        return Ok(None);
    }
    load_config_file(&path).map(Some)
}

/// Read a [`GenerationConfig`] from a JSON file
pub fn load_config_file(path: &Path) -> Result<GenerationConfig> {
    let text = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = serde_json::from_str(&text).map_err(|source| Error::InvalidSidecar {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "loaded config");

    Ok(config)
}

fn json_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| Error::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| Error::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        let is_json = path.extension().is_some_and(|ext| ext == "json");
        let is_sidecar = path.file_name().is_some_and(|name| name == SIDECAR_FILE);
        if path.is_file() && is_json && !is_sidecar {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(Error::NoJsonFiles {
            path: dir.to_path_buf(),
        });
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MappingStyle;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_document_name() {
        assert_eq!(document_name(Path::new("data/user.json")), "user");
        assert_eq!(document_name(Path::new("Pet")), "Pet");
    }

    #[test]
    fn test_directory_expands_to_sorted_json_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "dog.json", "{}");
        write(dir.path(), "cat.json", "{}");
        write(dir.path(), "notes.txt", "ignored");
        write(dir.path(), SIDECAR_FILE, "{}");

        let paths = resolve_inputs([dir.path().to_string_lossy()]).unwrap();
        let names: Vec<String> = paths.iter().map(|p| document_name(p)).collect();
        assert_eq!(names, vec!["cat", "dog"]);
    }

    #[test]
    fn test_glob_pattern() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.json", "{}");
        write(dir.path(), "b.json", "{}");

        let pattern = format!("{}/*.json", dir.path().display());
        assert_eq!(resolve_inputs([pattern]).unwrap().len(), 2);

        let pattern = format!("{}/*.yaml", dir.path().display());
        assert!(matches!(resolve_inputs([pattern]), Err(Error::InvalidPattern { .. })));
    }

    #[test]
    fn test_missing_path_is_io_error() {
        let err = resolve_inputs(["/definitely/not/here.json"]).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn test_empty_directory() {
        let dir = TempDir::new().unwrap();
        let err = resolve_inputs([dir.path().to_string_lossy()]).unwrap_err();
        assert!(matches!(err, Error::NoJsonFiles { .. }));
    }

    #[test]
    fn test_load_sources_keys_by_stem() {
        let dir = TempDir::new().unwrap();
        let dog = write(dir.path(), "Dog.json", r#"{"name": "Rex"}"#);

        let sources = load_sources(&[dog]).unwrap();
        assert_eq!(sources.get("Dog").map(String::as_str), Some(r#"{"name": "Rex"}"#));
    }

    #[test]
    fn test_load_documents() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "Cat.json", "{}");
        let single = write(dir.path(), "Dog.json", "[]");

        let sources = load_documents([single.to_string_lossy()]).unwrap();
        assert_eq!(sources.keys().collect::<Vec<_>>(), vec!["Dog"]);

        let sources = load_documents([dir.path().to_string_lossy()]).unwrap();
        assert_eq!(sources.keys().collect::<Vec<_>>(), vec!["Cat", "Dog"]);
    }

    #[test]
    fn test_sidecar_config() {
        let dir = TempDir::new().unwrap();
        assert!(load_sidecar_config(dir.path()).unwrap().is_none());

        write(dir.path(), SIDECAR_FILE, r#"{"namePrefix": "PT", "mappingStyle": "accessor"}"#);
        let config = load_sidecar_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.prefix(), "PT");
        assert_eq!(config.mapping_style, MappingStyle::Accessor);

        write(dir.path(), SIDECAR_FILE, r#"{"namePrefix": 3}"#);
        assert!(matches!(load_sidecar_config(dir.path()), Err(Error::InvalidSidecar { .. })));
    }
}
