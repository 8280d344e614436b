//! Export command implementation

use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use crate::config::CliOverrides;
use crate::export::{build_export_model, exporter_for, ExportError};
use crate::registry::VariableSource;

use super::{load_document, resolve_config, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the export command
pub fn run_export(document: &Path, config_path: Option<&Path>, overrides: &CliOverrides) -> ExitCode {
    let config = match resolve_config(config_path, overrides) {
        Ok(config) => config,
        Err(code) => return code,
    };
    let doc = match load_document(document) {
        Ok(doc) => doc,
        Err(code) => return code,
    };

    let request = config.export.request_for(doc.list_collections());
    let model = match build_export_model(&doc, &request) {
        Ok(model) => model,
        Err(ExportError::NothingToExport) => {
            eprintln!("Notice: {}", ExportError::NothingToExport);
            return ExitCode::from(EXIT_SUCCESS);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let exporter = exporter_for(config.output.format);
    let options = config.output.options();
    let result = match &config.output.path {
        Some(path) => exporter.export(&model, path, &options),
        None => {
            let mut lock = io::stdout().lock();
            exporter
                .write(&model, &mut lock, &options)
                .and_then(|()| lock.flush().map_err(ExportError::from))
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
