//! Configuration loading and discovery for `varsheet.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::VarsheetConfig;
use crate::export::OutputFormat;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up during discovery
pub const CONFIG_FILE_NAME: &str = "varsheet.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse varsheet.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override output file
    pub out: Option<PathBuf>,
    /// Override output format
    pub format: Option<OutputFormat>,
    /// Force skipping empty collections
    pub skip_empty: Option<bool>,
    /// Extra collections to exclude, added to the configured ones
    pub exclude: Vec<String>,
    /// Override JSON indentation
    pub pretty: Option<bool>,
}

/// Find varsheet.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for varsheet.toml
/// 2. Check XDG_CONFIG_HOME/varsheet/varsheet.toml (or ~/.config/varsheet/varsheet.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find varsheet.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("varsheet").join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find varsheet.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a varsheet.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses [`find_config`]
/// to locate one. Without any config file the defaults are returned.
///
/// # Example
/// ```ignore
/// let config = load_config(None)?;
/// let config = load_config(Some(Path::new("design/varsheet.toml")))?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<VarsheetConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => {
            log::debug!("no {} found, using defaults", CONFIG_FILE_NAME);
            Ok(VarsheetConfig::default())
        }
    }
}

/// Load configuration from a specific file path.
///
/// A relative `output.path` is resolved against the directory holding the
/// config file.
fn load_config_file(path: &Path) -> Result<VarsheetConfig, ConfigError> {
    log::debug!("loading config from {}", path.display());
    let contents = fs::read_to_string(path)?;
    let mut config: VarsheetConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    if let (Some(root), Some(out)) = (project_root(path), config.output.path.as_ref()) {
        config.output.path = Some(resolve_path(root, out));
    }

    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values. Excludes are
/// additive.
pub fn merge_cli_overrides(config: &mut VarsheetConfig, overrides: &CliOverrides) {
    if let Some(ref out) = overrides.out {
        config.output.path = Some(out.clone());
    }

    if let Some(format) = overrides.format {
        config.output.format = format;
    }

    if let Some(pretty) = overrides.pretty {
        config.output.pretty = pretty;
    }

    if let Some(skip_empty) = overrides.skip_empty {
        config.export.skip_empty = skip_empty;
    }

    for pattern in &overrides.exclude {
        if !config.export.exclude.contains(pattern) {
            config.export.exclude.push(pattern.clone());
        }
    }
}

/// Get the directory holding a config file.
pub fn project_root(config_path: &Path) -> Option<&Path> {
    config_path.parent()
}

/// Resolve a path relative to the project root.
///
/// If the path is absolute, returns it unchanged.
pub fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}
