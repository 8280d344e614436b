//! Render-ready export model.
//!
//! The model is an ordered description of the document: one card per
//! collection, each holding group headers and rows in display order. Renderers
//! walk it front to back and never resolve anything themselves.

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::format::EMPTY_PLACEHOLDER;

/// Title of the exported document
pub const DOCUMENT_TITLE: &str = "Variables Export";

/// Text shown in a card whose collection has no variables
pub const NO_VARIABLES_PLACEHOLDER: &str = "— (no variables)";

/// Label of the first column in the mode header row
pub const NAME_COLUMN_HEADER: &str = "Variable Name";

/// One (variable, mode) cell, ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolvedCell {
    /// Concrete number, string or unknown value
    Text { text: String },
    /// Concrete color: draw a swatch next to the hex text
    Color { hex: String, color: Rgba },
    /// Concrete boolean: draw a filled or outlined indicator
    Boolean { value: bool },
    /// Alias chip pointing at another variable
    Alias {
        target_id: String,
        target_name: String,
        /// Target lives in another collection or under another first name segment
        cross_scope: bool,
    },
    /// No value in this mode nor the default mode
    Empty,
    /// Alias loop or dangling alias
    Warning { message: String },
}

impl ResolvedCell {
    /// Plain text for the cell, without any glyphs
    pub fn text(&self) -> String {
        match self {
            ResolvedCell::Text { text } => text.clone(),
            ResolvedCell::Color { hex, .. } => hex.clone(),
            ResolvedCell::Boolean { value } => value.to_string(),
            ResolvedCell::Alias { target_name, .. } => target_name.clone(),
            ResolvedCell::Empty => EMPTY_PLACEHOLDER.to_string(),
            ResolvedCell::Warning { message } => message.clone(),
        }
    }
}

/// One variable row: its label and one cell per collection mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowDescriptor {
    pub variable_id: String,
    pub display_name: String,
    pub group_key: Option<String>,
    pub cells: Vec<ResolvedCell>,
}

/// An item inside a collection card, in display order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Entry {
    GroupHeader { label: String },
    Row(RowDescriptor),
    /// Separator drawn after every row
    Divider,
    Placeholder { text: String },
}

/// Everything rendered for one collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionCard {
    pub id: String,
    pub title: String,
    /// Mode names, one column each
    pub modes: Vec<String>,
    pub entries: Vec<Entry>,
}

impl CollectionCard {
    /// Rows only, skipping headers, dividers and placeholders
    pub fn rows(&self) -> impl Iterator<Item = &RowDescriptor> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Row(row) => Some(row),
            _ => None,
        })
    }

    /// Group header labels in order
    pub fn group_headers(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                Entry::GroupHeader { label } => Some(label.as_str()),
                _ => None,
            })
            .collect()
    }

    /// True when the card only carries the "no variables" placeholder
    pub fn is_placeholder(&self) -> bool {
        matches!(self.entries.as_slice(), [Entry::Placeholder { .. }])
    }
}

/// The whole exported document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExportModel {
    pub cards: Vec<CollectionCard>,
}

impl ExportModel {
    /// Find a card by collection id
    pub fn card(&self, collection_id: &str) -> Option<&CollectionCard> {
        self.cards.iter().find(|c| c.id == collection_id)
    }

    /// Total number of variable rows across all cards
    pub fn row_count(&self) -> usize {
        self.cards.iter().map(|c| c.rows().count()).sum()
    }
}
