//! Serve command implementation

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::CliOverrides;
use crate::session::{serve, Session};

use super::{load_document, resolve_config, EXIT_ERROR, EXIT_SUCCESS};

/// Base name of the export file when no output path is configured
const DEFAULT_OUTPUT_STEM: &str = "variables-export";

/// Execute the serve command
pub fn run_serve(document: &Path, config_path: Option<&Path>, overrides: &CliOverrides) -> ExitCode {
    use tokio::runtime::Runtime;

    let config = match resolve_config(config_path, overrides) {
        Ok(config) => config,
        Err(code) => return code,
    };
    let doc = match load_document(document) {
        Ok(doc) => doc,
        Err(code) => return code,
    };

    let exporter = crate::export::exporter_for(config.output.format);
    let output = config
        .output
        .path
        .clone()
        .unwrap_or_else(|| default_output(document, exporter.extension()));
    let session = Session::new(doc, config.output.format, output).with_options(config.output.options());
    log::info!("serving {} (exports go to {})", document.display(), session.output().display());

    let rt = match Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: Failed to create async runtime: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match rt.block_on(serve(session, tokio::io::stdin(), tokio::io::stdout())) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// `variables-export.<ext>` next to the document
fn default_output(document: &Path, extension: &str) -> PathBuf {
    let file_name = format!("{}.{}", DEFAULT_OUTPUT_STEM, extension);
    match document.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(file_name),
        _ => PathBuf::from(file_name),
    }
}
