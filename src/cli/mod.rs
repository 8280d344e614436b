//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod collections;
mod export;
#[cfg(feature = "serve")]
mod serve;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{load_config, merge_cli_overrides, CliOverrides, VarsheetConfig};
use crate::export::OutputFormat;
use crate::registry::Document;

#[cfg(feature = "serve")]
use serve::run_serve;

/// Process exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Varsheet - Export design variables as a per-mode reference sheet
#[derive(Parser)]
#[command(name = "varsheet")]
#[command(about = "Varsheet - Resolve design variables per mode and export them as a reference sheet")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short = 'v', long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the document's collections with their modes and variable counts
    Collections {
        /// Input document (.json or .json5)
        document: PathBuf,

        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export every included collection as a reference document
    Export {
        /// Input document (.json or .json5)
        document: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Collection id or name to leave out (repeatable)
        #[arg(long, value_name = "ID_OR_NAME")]
        exclude: Vec<String>,

        /// Drop collections that have no variables
        #[arg(long)]
        skip_empty: bool,

        /// Write compact JSON
        #[arg(long)]
        compact: bool,

        /// Config file (default: discover varsheet.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run a panel session as JSON lines on stdin/stdout
    Serve {
        /// Input document (.json or .json5)
        document: PathBuf,

        /// Export file written on each request
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Config file (default: discover varsheet.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Parse arguments, set up logging and run the selected command
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match cli.command {
        Commands::Collections { document, json } => collections::run_collections(&document, json),
        Commands::Export { document, output, format, exclude, skip_empty, compact, config } => {
            let overrides = CliOverrides {
                out: output,
                format,
                skip_empty: skip_empty.then_some(true),
                exclude,
                pretty: compact.then_some(false),
            };
            export::run_export(&document, config.as_deref(), &overrides)
        }
        Commands::Serve { document, output, format, config } => {
            let overrides = CliOverrides { out: output, format, ..Default::default() };
            run_serve(&document, config.as_deref(), &overrides)
        }
    }
}

#[cfg(not(feature = "serve"))]
fn run_serve(_document: &Path, _config: Option<&Path>, _overrides: &CliOverrides) -> ExitCode {
    eprintln!("Error: varsheet was built without the 'serve' feature");
    ExitCode::from(EXIT_ERROR)
}

/// Initialize env_logger: `info` by default, `debug` with `--debug`,
/// `RUST_LOG` wins when set.
fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .try_init()
        .ok();
}

/// Load a document, reporting failures the CLI way
pub(crate) fn load_document(path: &Path) -> Result<Document, ExitCode> {
    Document::load(path).map_err(|e| {
        eprintln!("Error: Cannot read '{}': {}", path.display(), e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })
}

/// Load config and apply CLI overrides
pub(crate) fn resolve_config(
    config_path: Option<&Path>,
    overrides: &CliOverrides,
) -> Result<VarsheetConfig, ExitCode> {
    let mut config = load_config(config_path).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })?;
    merge_cli_overrides(&mut config, overrides);
    Ok(config)
}
