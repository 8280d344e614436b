//! Markdown export format.
//!
//! One section per collection with a table of variables by mode:
//!
//! ```text
//! # Variables Export
//!
//! ## Colors
//!
//! | Variable Name | Light | Dark |
//! | --- | --- | --- |
//! | **Brand** | | |
//! | Primary | <span style="color:#FF0000">■</span> `#FF0000` | <span style="color:#0000FF">■</span> `#0000FF` |
//! | Primary-Alias | *$* `Primary` | *$* `Primary` |
//! ```
//!
//! Swatches use inline HTML so viewers that allow it show the actual color.
//! Booleans render as a filled (true) or outlined (false) dot.

use std::io::Write;

use super::model::{CollectionCard, Entry, ResolvedCell, DOCUMENT_TITLE, NAME_COLUMN_HEADER};
use super::{ExportModel, ExportOptions, Exporter, Result};

/// Markdown format exporter.
#[derive(Debug, Default)]
pub struct MarkdownExporter;

impl MarkdownExporter {
    /// Create a new Markdown exporter.
    pub fn new() -> Self {
        Self
    }

    fn write_card(&self, card: &CollectionCard, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "## {}", escape(&card.title))?;
        writeln!(out)?;

        if card.is_placeholder() {
            for entry in &card.entries {
                if let Entry::Placeholder { text } = entry {
                    writeln!(out, "_{}_", escape(text))?;
                }
            }
            writeln!(out)?;
            return Ok(());
        }

        let columns = card.modes.len() + 1;
        let header: Vec<String> = std::iter::once(NAME_COLUMN_HEADER.to_string())
            .chain(card.modes.iter().map(|m| escape(m)))
            .collect();
        writeln!(out, "| {} |", header.join(" | "))?;
        writeln!(out, "|{}", " --- |".repeat(columns))?;

        for entry in &card.entries {
            match entry {
                Entry::GroupHeader { label } => {
                    writeln!(out, "| **{}** |{}", escape(label), " |".repeat(columns - 1))?;
                }
                Entry::Row(row) => {
                    let cells: Vec<String> = row.cells.iter().map(render_cell).collect();
                    if cells.is_empty() {
                        writeln!(out, "| {} |", escape(&row.display_name))?;
                    } else {
                        writeln!(out, "| {} | {} |", escape(&row.display_name), cells.join(" | "))?;
                    }
                }
                // Table rows are already ruled
                Entry::Divider => {}
                Entry::Placeholder { text } => {
                    writeln!(out, "| _{}_ |{}", escape(text), " |".repeat(columns - 1))?;
                }
            }
        }
        writeln!(out)?;
        Ok(())
    }
}

impl Exporter for MarkdownExporter {
    fn write(&self, model: &ExportModel, out: &mut dyn Write, _options: &ExportOptions) -> Result<()> {
        writeln!(out, "# {}", DOCUMENT_TITLE)?;
        writeln!(out)?;
        for card in &model.cards {
            self.write_card(card, out)?;
        }
        Ok(())
    }

    fn format_name(&self) -> &'static str {
        "markdown"
    }

    fn extension(&self) -> &'static str {
        "md"
    }
}

/// Markdown for one cell
fn render_cell(cell: &ResolvedCell) -> String {
    match cell {
        ResolvedCell::Text { text } => format!("`{}`", code(text)),
        ResolvedCell::Color { hex, .. } => {
            format!("<span style=\"color:{}\">■</span> `{}`", hex, hex)
        }
        ResolvedCell::Boolean { value: true } => "● `true`".to_string(),
        ResolvedCell::Boolean { value: false } => "○ `false`".to_string(),
        ResolvedCell::Alias { target_name, .. } => format!("*$* `{}`", code(target_name)),
        ResolvedCell::Empty => cell.text(),
        ResolvedCell::Warning { message } => escape(message),
    }
}

/// Escape table-breaking characters in plain text
fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('|', "\\|")
        .replace('*', "\\*")
        .replace('_', "\\_")
        .replace('\n', " ")
}

/// Inline code cannot contain backticks or raw pipes inside a table
fn code(text: &str) -> String {
    text.replace('`', "'").replace('|', "\\|").replace('\n', " ")
}
