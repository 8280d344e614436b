//! Collection summaries for the control panel

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{Collection, Mode, Variable};

/// Summary of one collection, as shown in the panel's include list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionInfo {
    pub id: String,
    pub name: String,
    pub default_mode_id: String,
    pub modes: Vec<Mode>,
    pub variable_count: usize,
}

/// Summarize collections with their variable counts.
///
/// Counting is a single pass over `variables`. Variables whose collection is
/// not in `collections` are counted but never reported.
pub fn build_snapshot(variables: &[Variable], collections: &[Collection]) -> Vec<CollectionInfo> {
    let mut count_by_collection: HashMap<&str, usize> = HashMap::new();
    for v in variables {
        *count_by_collection.entry(v.variable_collection_id.as_str()).or_insert(0) += 1;
    }

    collections
        .iter()
        .map(|c| CollectionInfo {
            id: c.id.clone(),
            name: c.display_name().to_string(),
            default_mode_id: c.default_mode_id.clone(),
            modes: c.modes.clone(),
            variable_count: count_by_collection.get(c.id.as_str()).copied().unwrap_or(0),
        })
        .collect()
}
