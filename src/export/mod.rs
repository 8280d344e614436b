//! Export model building and document writers.
//!
//! Export runs in two steps:
//! 1. [`build_export_model`] resolves every (variable, mode) cell and lays
//!    collections out as ordered cards of group headers and rows.
//! 2. An [`Exporter`] writes that model in a concrete format.
//!
//! # Supported Formats
//!
//! - **Markdown**: one table per collection, human-readable
//! - **JSON**: the model itself, for other tools to render
//!
//! # Example
//!
//! ```
//! use varsheet::export::{build_export_model, exporter_for, ExportOptions, ExportRequest, OutputFormat};
//! use varsheet::models::{Collection, Mode, Variable};
//! use varsheet::registry::Document;
//!
//! let doc = Document::new(
//!     vec![Collection::new("c1", "Spacing", vec![Mode::new("m1", "Base")])],
//!     vec![Variable::new("v1", "gap", "c1").with_value("m1", 8.0)],
//! );
//! let model = build_export_model(&doc, &ExportRequest::default()).unwrap();
//! let exporter = exporter_for(OutputFormat::Markdown);
//! let text = exporter.export_to_string(&model, &ExportOptions::default()).unwrap();
//! assert!(text.contains("## Spacing"));
//! ```

mod builder;
pub mod json;
pub mod markdown;
mod model;

pub use builder::{build_export_model, resolve_cell};
pub use json::JsonExporter;
pub use markdown::MarkdownExporter;
pub use model::{
    CollectionCard, Entry, ExportModel, ResolvedCell, RowDescriptor, DOCUMENT_TITLE,
    NAME_COLUMN_HEADER, NO_VARIABLES_PLACEHOLDER,
};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Error during export
#[derive(Debug, Error)]
pub enum ExportError {
    /// The document has no collections or no variables
    #[error("no local variables found in this document")]
    NothingToExport,
    /// IO error during file writing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self {
        ExportError::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// Which collections to export and how to treat empty ones
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExportRequest {
    /// Collection id -> include flag. Only an explicit `false` excludes.
    #[serde(default)]
    pub include_by_collection: HashMap<String, bool>,
    /// Drop collections without variables instead of emitting a placeholder card
    #[serde(default)]
    pub skip_empty: bool,
}

impl ExportRequest {
    /// Whether a collection is included (absent means included)
    pub fn includes(&self, collection_id: &str) -> bool {
        self.include_by_collection.get(collection_id) != Some(&false)
    }

    /// Builder-style helper to opt a collection out
    pub fn exclude(mut self, collection_id: impl Into<String>) -> Self {
        self.include_by_collection.insert(collection_id.into(), false);
        self
    }

    /// Builder-style helper to set `skip_empty`
    pub fn with_skip_empty(mut self, skip_empty: bool) -> Self {
        self.skip_empty = skip_empty;
        self
    }
}

/// Output document format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Options for export operations.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Pretty print output (JSON indentation)
    pub pretty: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Trait for document format implementations.
pub trait Exporter {
    /// Write the model to a stream.
    fn write(&self, model: &ExportModel, out: &mut dyn Write, options: &ExportOptions)
        -> Result<()>;

    /// Get the format name for this exporter.
    fn format_name(&self) -> &'static str;

    /// Get the default file extension for this format.
    fn extension(&self) -> &'static str;

    /// Render the model to a string.
    fn export_to_string(&self, model: &ExportModel, options: &ExportOptions) -> Result<String> {
        let mut buf = Vec::new();
        self.write(model, &mut buf, options)?;
        String::from_utf8(buf).map_err(|e| ExportError::Serialization(e.to_string()))
    }

    /// Write the model to a file, creating parent directories as needed.
    fn export(&self, model: &ExportModel, output_path: &Path, options: &ExportOptions) -> Result<()> {
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut writer = BufWriter::new(File::create(output_path)?);
        self.write(model, &mut writer, options)?;
        writer.flush()?;
        log::info!("wrote {} export to {}", self.format_name(), output_path.display());
        Ok(())
    }
}

/// Get the exporter for a format
pub fn exporter_for(format: OutputFormat) -> Box<dyn Exporter + Send + Sync> {
    match format {
        OutputFormat::Markdown => Box::new(MarkdownExporter::new()),
        OutputFormat::Json => Box::new(JsonExporter::new()),
    }
}
