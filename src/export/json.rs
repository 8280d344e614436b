//! JSON export format.
//!
//! Writes the export model as-is so other tools can render it. Cells and
//! entries are tagged by `kind` and `type`.
//!
//! # Example Output
//!
//! ```json
//! {
//!   "cards": [
//!     {
//!       "id": "c1",
//!       "title": "Colors",
//!       "modes": ["Light", "Dark"],
//!       "entries": [
//!         { "type": "group_header", "label": "Brand" },
//!         {
//!           "type": "row",
//!           "variable_id": "v1",
//!           "display_name": "Primary",
//!           "group_key": "Brand",
//!           "cells": [{ "kind": "color", "hex": "#FF0000", "color": { "r": 1.0, "g": 0.0, "b": 0.0, "a": 1.0 } }]
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::io::Write;

use super::{ExportModel, ExportOptions, Exporter, Result};

/// JSON format exporter.
#[derive(Debug, Default)]
pub struct JsonExporter;

impl JsonExporter {
    /// Create a new JSON exporter.
    pub fn new() -> Self {
        Self
    }
}

impl Exporter for JsonExporter {
    fn write(&self, model: &ExportModel, out: &mut dyn Write, options: &ExportOptions) -> Result<()> {
        if options.pretty {
            serde_json::to_writer_pretty(&mut *out, model)?;
        } else {
            serde_json::to_writer(&mut *out, model)?;
        }
        writeln!(out)?;
        Ok(())
    }

    fn format_name(&self) -> &'static str {
        "json"
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}
