//! Definition registry: load, validate, iterate

use std::collections::HashSet;
use std::path::Path;

use super::model::{AlertDefinition, DefinitionError, RawDefinition};

/// Validated set of definitions for one run
///
/// Loading is fail-fast: any invalid definition refuses the whole run,
/// since the evaluator assumes validated input.
#[derive(Debug, Default)]
pub struct Registry {
    definitions: Vec<AlertDefinition>,
}

impl Registry {
    /// Load from a JSON array of definition objects
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let raw: Vec<RawDefinition> = serde_json::from_str(json)?;

        let mut seen: HashSet<String> = HashSet::new();
        let mut definitions = Vec::with_capacity(raw.len());

        for entry in raw {
            let def = entry.validate()?;
            if !seen.insert(def.id.clone()) {
                return Err(RegistryError::Duplicate(def.id));
            }
            definitions.push(def);
        }

        tracing::info!("Loaded {} alert definitions", definitions.len());
        Ok(Self { definitions })
    }

    /// Load from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Definitions in input order
    pub fn iter(&self) -> impl Iterator<Item = &AlertDefinition> {
        self.definitions.iter()
    }

    /// Look up a definition by ID
    pub fn get(&self, id: &str) -> Option<&AlertDefinition> {
        self.definitions.iter().find(|d| d.id == id)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Registry load errors (all fatal)
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Failed to read definitions: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse definitions: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error("Duplicate definition ID: {0}")]
    Duplicate(String),
}
