//! Varsheet - Library for exporting design variables as reference sheets
//!
//! This library provides functionality to:
//! - Load a document's variable collections (JSON or JSON5)
//! - Resolve alias chains per mode, with loop and dangling-target detection
//! - Group and sort variables by their top-level name segment
//! - Build a render-ready export model and write it as Markdown or JSON
//! - Serve a panel session over JSON lines

pub mod cli;
pub mod color;
pub mod config;
pub mod export;
pub mod format;
pub mod grouping;
pub mod models;
pub mod registry;
pub mod session;
pub mod snapshot;
pub mod variables;
