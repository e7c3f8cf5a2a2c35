use std::collections::BTreeMap;
use std::path::Path;

use anamnesis_core::models::prompt::PromptSpec;
use tracing::{debug, info};

use crate::error::StorageError;

const PREFIX: &str = "prompt_";
const SUFFIX: &str = ".txt";

/// Prompt templates indexed by version tag.
///
/// On disk a template lives in `prompt_<version>.txt`.
#[derive(Debug, Clone, Default)]
pub struct PromptLibrary {
    templates: BTreeMap<String, String>,
}

impl PromptLibrary {
    /// Index every `prompt_<version>.txt` file in `dir`.
    pub async fn load(dir: &Path) -> Result<Self, StorageError> {
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| StorageError::io(dir, e))?;

        let mut templates = BTreeMap::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::io(dir, e))?
        {
            let path = entry.path();
            let Some(version) = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(version_from_file_name)
            else {
                continue;
            };

            let template = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| StorageError::io(&path, e))?;
            debug!(version, path = %path.display(), "indexed prompt template");
            templates.insert(version.to_string(), template);
        }

        info!(dir = %dir.display(), count = templates.len(), "prompt library loaded");
        Ok(Self { templates })
    }

    /// Build a library from in-memory `(version, template)` pairs.
    pub fn from_templates<I, V, T>(templates: I) -> Self
    where
        I: IntoIterator<Item = (V, T)>,
        V: Into<String>,
        T: Into<String>,
    {
        Self {
            templates: templates
                .into_iter()
                .map(|(v, t)| (v.into(), t.into()))
                .collect(),
        }
    }

    /// Known version tags, sorted.
    pub fn versions(&self) -> Vec<String> {
        self.templates.keys().cloned().collect()
    }

    /// Resolve a version tag to its prompt.
    pub fn resolve(&self, version: &str) -> Result<PromptSpec, StorageError> {
        let template = self
            .templates
            .get(version)
            .ok_or_else(|| StorageError::UnknownPromptVersion {
                version: version.to_string(),
                available: self.versions(),
            })?;
        Ok(PromptSpec::new(version, template.clone())?)
    }
}

fn version_from_file_name(name: &str) -> Option<&str> {
    name.strip_prefix(PREFIX)?
        .strip_suffix(SUFFIX)
        .filter(|v| !v.is_empty())
}
