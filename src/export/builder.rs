//! Builds the export model from a variable source.

use crate::color::to_display_hex;
use crate::format::format_value;
use crate::grouping::{
    detect_group_boundaries, display_name, group_key_of, qualified_name, sort_variables,
};
use crate::models::{Collection, Variable, VariableValue};
use crate::registry::VariableSource;
use crate::variables::{resolve_alias_target, resolve_value, trace_alias_chain};

use super::model::{CollectionCard, Entry, ExportModel, ResolvedCell, RowDescriptor};
use super::model::NO_VARIABLES_PLACEHOLDER;
use super::{ExportError, ExportRequest};

/// Build the render-ready model for every included collection.
///
/// Collections keep source order. Within a card, variables are sorted and
/// group headers interleaved.
///
/// # Errors
///
/// Returns [`ExportError::NothingToExport`] when the source has no collections
/// or no variables at all.
///
/// # Example
///
/// ```
/// use varsheet::export::{build_export_model, ExportRequest};
/// use varsheet::models::{Collection, Mode, Variable};
/// use varsheet::registry::Document;
///
/// let doc = Document::new(
///     vec![Collection::new("c1", "Spacing", vec![Mode::new("m1", "Base")])],
///     vec![Variable::new("v1", "gap", "c1").with_value("m1", 8.0)],
/// );
/// let model = build_export_model(&doc, &ExportRequest::default()).unwrap();
/// assert_eq!(model.cards[0].title, "Spacing");
/// assert_eq!(model.row_count(), 1);
/// ```
pub fn build_export_model<S: VariableSource + ?Sized>(
    source: &S,
    request: &ExportRequest,
) -> Result<ExportModel, ExportError> {
    if source.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    let mut cards = Vec::new();
    for collection in source.list_collections() {
        if !request.includes(&collection.id) {
            log::debug!("skipping excluded collection '{}'", collection.display_name());
            continue;
        }

        let mut variables = source.variables_in(&collection.id);
        sort_variables(&mut variables);

        if request.skip_empty && variables.is_empty() {
            log::debug!("skipping empty collection '{}'", collection.display_name());
            continue;
        }

        cards.push(build_card(source, collection, &variables));
    }

    let model = ExportModel { cards };
    log::info!("built export model: {} collections, {} rows", model.cards.len(), model.row_count());
    Ok(model)
}

fn build_card<S: VariableSource + ?Sized>(
    source: &S,
    collection: &Collection,
    sorted: &[&Variable],
) -> CollectionCard {
    let mut entries = Vec::new();

    if sorted.is_empty() {
        entries.push(Entry::Placeholder { text: NO_VARIABLES_PLACEHOLDER.to_string() });
    }

    for grouped in detect_group_boundaries(sorted) {
        if let (true, Some(label)) = (grouped.new_group, grouped.group_label) {
            entries.push(Entry::GroupHeader { label: label.to_string() });
        }
        entries.push(Entry::Row(build_row(source, collection, grouped.variable)));
        entries.push(Entry::Divider);
    }

    CollectionCard {
        id: collection.id.clone(),
        title: collection.display_name().to_string(),
        modes: collection.modes.iter().map(|m| m.name.clone()).collect(),
        entries,
    }
}

fn build_row<S: VariableSource + ?Sized>(
    source: &S,
    collection: &Collection,
    variable: &Variable,
) -> RowDescriptor {
    RowDescriptor {
        variable_id: variable.id.clone(),
        display_name: display_name(&variable.name),
        group_key: group_key_of(&variable.name).filter(|g| !g.is_empty()).map(str::to_string),
        cells: collection.modes.iter().map(|m| resolve_cell(source, variable, &m.id)).collect(),
    }
}

/// Compute the display cell for one variable in one mode.
///
/// Aliases take precedence: when the value is an alias that reaches a target,
/// the cell names the target instead of showing its value.
pub fn resolve_cell<S: VariableSource + ?Sized>(
    source: &S,
    variable: &Variable,
    mode_id: &str,
) -> ResolvedCell {
    if let Some(target) = resolve_alias_target(source, variable, mode_id) {
        let cross_scope = is_cross_scope(variable, target);
        let target_name = if cross_scope {
            let collection_name = source
                .get_collection(&target.variable_collection_id)
                .map(Collection::display_name)
                .unwrap_or(Collection::UNTITLED);
            format!("{}/{}", collection_name, qualified_name(&target.name))
        } else {
            display_name(&target.name)
        };
        return ResolvedCell::Alias { target_id: target.id.clone(), target_name, cross_scope };
    }

    let resolution = resolve_value(source, variable, mode_id);
    if let Some(message) = resolution.warning() {
        log::debug!(
            "'{}' in mode {}: {} ({})",
            variable.name,
            mode_id,
            message,
            trace_alias_chain(source, variable, mode_id).join(" -> ")
        );
        return ResolvedCell::Warning { message: message.to_string() };
    }

    match resolution.value() {
        None => ResolvedCell::Empty,
        Some(VariableValue::Boolean(value)) => ResolvedCell::Boolean { value: *value },
        Some(VariableValue::Color(color)) => {
            ResolvedCell::Color { hex: to_display_hex(color), color: *color }
        }
        Some(value) => ResolvedCell::Text { text: format_value(Some(value)) },
    }
}

/// An alias is cross-scope when its target lives in another collection or
/// under another top-level segment (case-insensitive) than the aliasing
/// variable. An ungrouped name is its own top-level segment.
fn is_cross_scope(variable: &Variable, target: &Variable) -> bool {
    variable.variable_collection_id != target.variable_collection_id
        || scope_segment(&variable.name) != scope_segment(&target.name)
}

fn scope_segment(name: &str) -> String {
    name.split('/').next().unwrap_or_default().trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::models::Mode;
    use crate::registry::Document;

    fn colors() -> Collection {
        Collection::new("c1", "Colors", vec![Mode::new("light", "Light"), Mode::new("dark", "Dark")])
    }

    fn primitives() -> Collection {
        Collection::new("c2", "Primitives", vec![Mode::new("p", "Value")])
    }

    #[test]
    fn test_empty_document_aborts() {
        let result = build_export_model(&Document::default(), &ExportRequest::default());
        assert!(matches!(result, Err(ExportError::NothingToExport)));

        let no_vars = Document::new(vec![colors()], vec![]);
        assert!(matches!(
            build_export_model(&no_vars, &ExportRequest::default()),
            Err(ExportError::NothingToExport)
        ));
    }

    #[test]
    fn test_cells_by_kind() {
        let doc = Document::new(
            vec![colors()],
            vec![
                Variable::new("v1", "flag", "c1").with_value("light", true).with_value("dark", false),
                Variable::new("v2", "radius", "c1").with_value("light", 4.0),
                Variable::new("v3", "font", "c1").with_value("dark", "Inter"),
                Variable::new("v4", "tint", "c1").with_value("light", Rgba::new(0.0, 0.0, 1.0, 0.5)),
            ],
        );
        let var = |id: &str| doc.get_variable(id).unwrap();

        assert_eq!(resolve_cell(&doc, var("v1"), "dark"), ResolvedCell::Boolean { value: false });
        // dark falls back to the default mode
        assert_eq!(resolve_cell(&doc, var("v2"), "dark"), ResolvedCell::Text { text: "4".to_string() });
        assert_eq!(resolve_cell(&doc, var("v3"), "light"), ResolvedCell::Empty);
        assert_eq!(
            resolve_cell(&doc, var("v4"), "light"),
            ResolvedCell::Color { hex: "#0000FF80".to_string(), color: Rgba::new(0.0, 0.0, 1.0, 0.5) }
        );
    }

    #[test]
    fn test_alias_in_same_group_uses_short_name() {
        let doc = Document::new(
            vec![colors()],
            vec![
                Variable::new("v1", "Brand/Primary", "c1").with_value("light", Rgba::opaque(1.0, 0.0, 0.0)),
                Variable::new("v2", "brand/Link", "c1").with_value("light", VariableValue::alias("v1")),
            ],
        );
        let cell = resolve_cell(&doc, doc.get_variable("v2").unwrap(), "light");
        assert_eq!(
            cell,
            ResolvedCell::Alias {
                target_id: "v1".to_string(),
                target_name: "Primary".to_string(),
                cross_scope: false
            }
        );
    }

    #[test]
    fn test_alias_to_other_group_is_qualified() {
        let doc = Document::new(
            vec![colors()],
            vec![
                Variable::new("v1", "Brand/Primary", "c1").with_value("light", 1.0),
                Variable::new("v2", "Button/Fill", "c1").with_value("light", VariableValue::alias("v1")),
            ],
        );
        let cell = resolve_cell(&doc, doc.get_variable("v2").unwrap(), "light");
        assert_eq!(cell.text(), "Colors/Brand / Primary");
    }

    #[test]
    fn test_alias_to_other_collection_is_qualified() {
        let doc = Document::new(
            vec![colors(), primitives()],
            vec![
                Variable::new("p1", "Brand/Red", "c2").with_value("p", Rgba::opaque(1.0, 0.0, 0.0)),
                Variable::new("v1", "Brand/Primary", "c1").with_value("light", VariableValue::alias("p1")),
            ],
        );
        match resolve_cell(&doc, doc.get_variable("v1").unwrap(), "light") {
            ResolvedCell::Alias { target_name, cross_scope, .. } => {
                assert!(cross_scope);
                assert_eq!(target_name, "Primitives/Brand / Red");
            }
            other => panic!("expected alias cell, got {:?}", other),
        }
    }

    #[test]
    fn test_ungrouped_alias_is_its_own_scope() {
        let spacing = Collection::new("c3", "Spacing", vec![Mode::new("s", "Base")]);
        let doc = Document::new(
            vec![spacing],
            vec![
                Variable::new("v1", "base", "c3").with_value("s", 4.0),
                Variable::new("v2", "gap", "c3").with_value("s", VariableValue::alias("v1")),
                Variable::new("v3", "Base", "c3").with_value("s", VariableValue::alias("v1")),
                Variable::new("v4", "Layout/gap", "c3").with_value("s", VariableValue::alias("v1")),
            ],
        );
        let cell = |id: &str| resolve_cell(&doc, doc.get_variable(id).unwrap(), "s");

        assert_eq!(
            cell("v2"),
            ResolvedCell::Alias {
                target_id: "v1".to_string(),
                target_name: "Spacing/base".to_string(),
                cross_scope: true
            }
        );
        // Same first segment ignoring case
        assert_eq!(cell("v3").text(), "base");
        assert_eq!(cell("v4").text(), "Spacing/base");
    }

    #[test]
    fn test_scope_segment() {
        assert_eq!(scope_segment(" Brand /Primary"), "brand");
        assert_eq!(scope_segment("gap"), "gap");
        assert_eq!(scope_segment(""), "");
    }

    #[test]
    fn test_loops_and_dangling_become_warnings() {
        let doc = Document::new(
            vec![colors()],
            vec![
                Variable::new("a", "A", "c1").with_value("light", VariableValue::alias("b")),
                Variable::new("b", "B", "c1").with_value("light", VariableValue::alias("a")),
                Variable::new("c", "C", "c1").with_value("light", VariableValue::alias("missing")),
            ],
        );
        assert_eq!(
            resolve_cell(&doc, doc.get_variable("a").unwrap(), "light"),
            ResolvedCell::Warning { message: "⚠️ Alias loop".to_string() }
        );
        assert_eq!(
            resolve_cell(&doc, doc.get_variable("c").unwrap(), "light"),
            ResolvedCell::Warning { message: "⚠️ Missing alias target".to_string() }
        );
    }

    #[test]
    fn test_excluded_collection_is_skipped() {
        let doc = Document::new(
            vec![colors(), primitives()],
            vec![
                Variable::new("v1", "a", "c1").with_value("light", 1.0),
                Variable::new("p1", "b", "c2").with_value("p", 2.0),
            ],
        );
        let model = build_export_model(&doc, &ExportRequest::default().exclude("c1")).unwrap();
        assert_eq!(model.cards.len(), 1);
        assert_eq!(model.cards[0].id, "c2");
    }

    #[test]
    fn test_explicit_include_is_kept() {
        let doc = Document::new(
            vec![colors()],
            vec![Variable::new("v1", "a", "c1").with_value("light", 1.0)],
        );
        let mut request = ExportRequest::default();
        request.include_by_collection.insert("c1".to_string(), true);
        assert_eq!(build_export_model(&doc, &request).unwrap().cards.len(), 1);
    }

    #[test]
    fn test_rows_sorted_with_group_headers() {
        let doc = Document::new(
            vec![colors()],
            vec![
                Variable::new("v1", "Zeta/One", "c1"),
                Variable::new("v2", "alpha/Two", "c1"),
                Variable::new("v3", "Solo", "c1"),
                Variable::new("v4", "alpha/Three", "c1"),
            ],
        );
        let model = build_export_model(&doc, &ExportRequest::default()).unwrap();
        let card = &model.cards[0];
        let names: Vec<&str> = card.rows().map(|r| r.display_name.as_str()).collect();
        assert_eq!(names, vec!["Solo", "Three", "Two", "One"]);
        assert_eq!(card.group_headers(), vec!["alpha", "Zeta"]);
        assert!(matches!(&card.entries[0], Entry::Row(r) if r.group_key.is_none()));
        assert_eq!(card.entries[1], Entry::Divider);
        assert!(matches!(&card.entries[2], Entry::GroupHeader { label } if label == "alpha"));
        assert_eq!(card.entries.iter().filter(|e| **e == Entry::Divider).count(), 4);
        assert_eq!(card.modes, vec!["Light", "Dark"]);
        assert_eq!(card.rows().next().unwrap().cells, vec![ResolvedCell::Empty, ResolvedCell::Empty]);
    }
}
