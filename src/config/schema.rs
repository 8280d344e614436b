//! Configuration schema types for `varsheet.toml`
//!
//! Defines the structure and validation rules for export configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::export::{ExportOptions, ExportRequest, OutputFormat};
use crate::models::Collection;

/// Which collections are exported and how empty ones are treated
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    /// Drop collections that have no variables
    #[serde(default)]
    pub skip_empty: bool,
    /// Collection ids or names to leave out
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl ExportConfig {
    /// Build an export request against the collections of a document.
    ///
    /// An `exclude` entry matches a collection by id, or by name ignoring
    /// case and surrounding whitespace. Entries matching nothing are logged
    /// and otherwise ignored.
    pub fn request_for(&self, collections: &[Collection]) -> ExportRequest {
        let mut request = ExportRequest::default().with_skip_empty(self.skip_empty);

        for pattern in &self.exclude {
            let needle = pattern.trim();
            let mut matched = false;
            for collection in collections {
                if collection.id == needle || collection.name.trim().eq_ignore_ascii_case(needle) {
                    request = request.exclude(collection.id.clone());
                    matched = true;
                }
            }
            if !matched {
                log::warn!("exclude entry '{}' matches no collection", pattern);
            }
        }

        request
    }
}

/// Where and how the export document is written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Document format
    #[serde(default)]
    pub format: OutputFormat,
    /// Output file; stdout when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Indent JSON output
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_pretty() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { format: OutputFormat::default(), path: None, pretty: default_pretty() }
    }
}

impl OutputConfig {
    /// Writer options for this output section
    pub fn options(&self) -> ExportOptions {
        ExportOptions { pretty: self.pretty }
    }
}

/// Root configuration structure for `varsheet.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VarsheetConfig {
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Validation error for config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "export.exclude[1]")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "varsheet.toml: '{}' {}", self.field, self.message)
    }
}

impl VarsheetConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        for (i, pattern) in self.export.exclude.iter().enumerate() {
            if pattern.trim().is_empty() {
                errors.push(ConfigValidationError {
                    field: format!("export.exclude[{}]", i),
                    message: "must be a non-empty collection id or name".to_string(),
                });
            }
        }

        if let Some(path) = &self.output.path {
            if path.as_os_str().is_empty() {
                errors.push(ConfigValidationError {
                    field: "output.path".to_string(),
                    message: "must not be empty (omit it to write to stdout)".to_string(),
                });
            }
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
