//! Collections command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::registry::VariableSource;
use crate::snapshot::{build_snapshot, CollectionInfo};

use super::{load_document, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the collections command
pub fn run_collections(document: &Path, json: bool) -> ExitCode {
    let doc = match load_document(document) {
        Ok(doc) => doc,
        Err(code) => return code,
    };

    let snapshot = build_snapshot(doc.list_variables(), doc.list_collections());

    if json {
        match serde_json::to_string_pretty(&snapshot) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
        return ExitCode::from(EXIT_SUCCESS);
    }

    if snapshot.is_empty() {
        println!("No collections in {}", document.display());
        return ExitCode::from(EXIT_SUCCESS);
    }

    for info in &snapshot {
        println!("{}", describe(info));
    }
    ExitCode::from(EXIT_SUCCESS)
}

fn describe(info: &CollectionInfo) -> String {
    let modes: Vec<&str> = info.modes.iter().map(|m| m.name.as_str()).collect();
    let noun = if info.variable_count == 1 { "variable" } else { "variables" };
    format!("{} ({})  {} {}  modes: {}", info.name, info.id, info.variable_count, noun, modes.join(", "))
}
