//! In-memory document snapshot loaded from JSON or JSON5.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::traits::VariableSource;
use crate::models::{Collection, Variable};

/// Error loading a document snapshot
#[derive(Debug, Error)]
pub enum DocumentError {
    /// File I/O error
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),
    /// Neither JSON nor JSON5 could parse the input
    #[error("failed to parse document: {0}")]
    Parse(String),
}

/// Raw on-disk shape: `{ "collections": [...], "variables": [...] }`
#[derive(Debug, Default, Serialize, Deserialize)]
struct RawDocument {
    #[serde(default)]
    collections: Vec<Collection>,
    #[serde(default)]
    variables: Vec<Variable>,
}

/// A read-only snapshot of a document's local variable collections.
///
/// Lookups by id are indexed once at construction time.
#[derive(Debug, Clone, Default)]
pub struct Document {
    collections: Vec<Collection>,
    variables: Vec<Variable>,
    collection_index: HashMap<String, usize>,
    variable_index: HashMap<String, usize>,
}

impl Document {
    /// Build a document from collections and variables
    pub fn new(collections: Vec<Collection>, variables: Vec<Variable>) -> Self {
        let collection_index =
            collections.iter().enumerate().map(|(i, c)| (c.id.clone(), i)).collect();
        let variable_index = variables.iter().enumerate().map(|(i, v)| (v.id.clone(), i)).collect();
        Self { collections, variables, collection_index, variable_index }
    }

    /// Parse a document from a string.
    ///
    /// Strict JSON is tried first; JSON5 (comments, trailing commas) is the fallback.
    pub fn parse(content: &str) -> Result<Self, DocumentError> {
        let raw: RawDocument = match serde_json::from_str(content) {
            Ok(raw) => raw,
            Err(json_err) => json5::from_str(content).map_err(|json5_err| {
                log::debug!("strict JSON parse failed: {}", json_err);
                DocumentError::Parse(json5_err.to_string())
            })?,
        };
        log::debug!(
            "loaded document: {} collections, {} variables",
            raw.collections.len(),
            raw.variables.len()
        );
        Ok(Self::new(raw.collections, raw.variables))
    }

    /// Load a document snapshot from a file
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }
}

impl VariableSource for Document {
    fn get_variable(&self, id: &str) -> Option<&Variable> {
        self.variable_index.get(id).map(|&i| &self.variables[i])
    }

    fn get_collection(&self, id: &str) -> Option<&Collection> {
        self.collection_index.get(id).map(|&i| &self.collections[i])
    }

    fn list_variables(&self) -> &[Variable] {
        &self.variables
    }

    fn list_collections(&self) -> &[Collection] {
        &self.collections
    }
}
