//! Alias resolution for variable values
//!
//! A variable's value for a mode may be an alias to another variable, which may
//! itself be an alias. This module follows those chains:
//! - Mode fallback to the owning collection's default mode
//! - Transitive alias resolution to a concrete value
//! - Terminal alias target lookup (for "this cell points at X" display)
//! - Circular and dangling reference detection
//!
//! Loops and dangling references are display concerns, not errors: they resolve
//! to [`Resolution::AliasLoop`] and [`Resolution::MissingTarget`].
//!
//! # Example
//!
//! ```
//! use varsheet::models::{Collection, Mode, Variable, VariableValue};
//! use varsheet::registry::{Document, VariableSource};
//! use varsheet::variables::{resolve_alias_target, resolve_value, Resolution};
//!
//! let doc = Document::new(
//!     vec![Collection::new("c1", "Colors", vec![Mode::new("m1", "Light")])],
//!     vec![
//!         Variable::new("base", "Base", "c1").with_value("m1", 4.0),
//!         Variable::new("gap", "Gap", "c1").with_value("m1", VariableValue::alias("base")),
//!     ],
//! );
//! let gap = doc.get_variable("gap").unwrap();
//! assert_eq!(resolve_value(&doc, gap, "m1"), Resolution::Value(VariableValue::Number(4.0)));
//! assert_eq!(resolve_alias_target(&doc, gap, "m1").map(|v| v.id.as_str()), Some("base"));
//! ```

use std::collections::HashSet;

use crate::models::{Variable, VariableValue};
use crate::registry::VariableSource;

/// Display text for a value whose alias chain loops back on itself
pub const ALIAS_LOOP_MESSAGE: &str = "⚠️ Alias loop";

/// Display text for an alias pointing at a variable that does not exist
pub const MISSING_TARGET_MESSAGE: &str = "⚠️ Missing alias target";

/// Outcome of resolving a variable's value for one mode
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// A concrete value
    Value(VariableValue),
    /// No value for the mode or for the collection's default mode
    Empty,
    /// The alias chain revisits a variable
    AliasLoop,
    /// The alias chain points at a variable id that does not exist
    MissingTarget,
}

impl Resolution {
    /// The concrete value, if resolution reached one
    pub fn value(&self) -> Option<&VariableValue> {
        match self {
            Resolution::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Warning text for loop and dangling outcomes
    pub fn warning(&self) -> Option<&'static str> {
        match self {
            Resolution::AliasLoop => Some(ALIAS_LOOP_MESSAGE),
            Resolution::MissingTarget => Some(MISSING_TARGET_MESSAGE),
            _ => None,
        }
    }
}

/// Look up a variable's raw value for a mode, falling back to the owning
/// collection's default mode.
pub fn value_for_mode<'a, S: VariableSource + ?Sized>(
    source: &S,
    variable: &'a Variable,
    mode_id: &str,
) -> Option<&'a VariableValue> {
    variable.value_for(mode_id).or_else(|| {
        let collection = source.get_collection(&variable.variable_collection_id)?;
        variable.value_for(&collection.default_mode_id)
    })
}

/// Resolve a variable's value for a mode, following aliases transitively.
///
/// Always terminates: each alias hop marks its target as visited, and a hop
/// onto an already visited target yields [`Resolution::AliasLoop`]. The walk is
/// iterative, so chain length is bounded only by the number of variables.
pub fn resolve_value<'a, S: VariableSource + ?Sized>(
    source: &'a S,
    variable: &'a Variable,
    mode_id: &str,
) -> Resolution {
    let mut visited: HashSet<&'a str> = HashSet::new();
    let mut current = variable;

    loop {
        let value = match value_for_mode(source, current, mode_id) {
            Some(v) => v,
            None => return Resolution::Empty,
        };

        let target_id = match value.alias_target() {
            Some(id) => id,
            None => return Resolution::Value(value.clone()),
        };

        if !visited.insert(target_id) {
            log::debug!(
                "alias loop resolving '{}' in mode {}: {}",
                variable.name,
                mode_id,
                visited_chain(&visited, target_id)
            );
            return Resolution::AliasLoop;
        }

        current = match source.get_variable(target_id) {
            Some(target) => target,
            None => {
                log::debug!("alias target '{}' of '{}' does not exist", target_id, current.name);
                return Resolution::MissingTarget;
            }
        };
    }
}

/// Find the variable an alias chain ends at.
///
/// Returns `None` when the value for the mode is concrete or empty, and when the
/// chain loops or dangles; callers then show the resolved value (or its
/// warning) instead of an alias.
pub fn resolve_alias_target<'a, S: VariableSource + ?Sized>(
    source: &'a S,
    variable: &'a Variable,
    mode_id: &str,
) -> Option<&'a Variable> {
    let mut visited = HashSet::new();
    let mut current = variable;

    loop {
        let target_id = value_for_mode(source, current, mode_id)?.alias_target()?;
        if !visited.insert(target_id) {
            return None;
        }
        let target = source.get_variable(target_id)?;
        match value_for_mode(source, target, mode_id) {
            Some(next) if next.is_alias() => current = target,
            _ => return Some(target),
        }
    }
}

/// Ids of every variable visited by an alias chain, starting with `variable`.
///
/// Stops at the first repeated or missing id. Used for diagnostics.
pub fn trace_alias_chain<S: VariableSource + ?Sized>(
    source: &S,
    variable: &Variable,
    mode_id: &str,
) -> Vec<String> {
    let mut chain = vec![variable.id.clone()];
    let mut current = variable;

    while let Some(target_id) = value_for_mode(source, current, mode_id).and_then(|v| v.alias_target())
    {
        let seen = chain.iter().any(|id| id == target_id);
        chain.push(target_id.to_string());
        if seen {
            break;
        }
        match source.get_variable(target_id) {
            Some(target) => current = target,
            None => break,
        }
    }

    chain
}

fn visited_chain(visited: &HashSet<&str>, repeated: &str) -> String {
    let mut ids: Vec<&str> = visited.iter().copied().collect();
    ids.sort_unstable();
    format!("{{{}}} -> {}", ids.join(", "), repeated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::models::{Collection, Mode};
    use crate::registry::Document;

    fn doc(variables: Vec<Variable>) -> Document {
        Document::new(
            vec![
                Collection::new("c1", "Colors", vec![Mode::new("light", "Light"), Mode::new("dark", "Dark")]),
                Collection::new("c2", "Primitives", vec![Mode::new("p", "Value")]),
            ],
            variables,
        )
    }

    fn var<'a>(doc: &'a Document, id: &str) -> &'a Variable {
        doc.get_variable(id).unwrap()
    }

    #[test]
    fn test_concrete_value() {
        let d = doc(vec![Variable::new("a", "A", "c1").with_value("light", 1.0)]);
        assert_eq!(resolve_value(&d, var(&d, "a"), "light"), Resolution::Value(1.0.into()));
        assert!(resolve_alias_target(&d, var(&d, "a"), "light").is_none());
    }

    #[test]
    fn test_missing_mode_falls_back_to_default_mode() {
        let d = doc(vec![Variable::new("a", "A", "c1").with_value("light", "x")]);
        assert_eq!(resolve_value(&d, var(&d, "a"), "dark"), Resolution::Value("x".into()));
    }

    #[test]
    fn test_no_value_at_all_is_empty() {
        let d = doc(vec![Variable::new("a", "A", "c1").with_value("dark", true)]);
        assert_eq!(resolve_value(&d, var(&d, "a"), "light"), Resolution::Empty);
        assert!(resolve_alias_target(&d, var(&d, "a"), "light").is_none());
    }

    #[test]
    fn test_chain_resolves_to_terminal_value() {
        let red = Rgba::opaque(1.0, 0.0, 0.0);
        let d = doc(vec![
            Variable::new("a", "A", "c1").with_value("light", VariableValue::alias("b")),
            Variable::new("b", "B", "c1").with_value("light", VariableValue::alias("c")),
            Variable::new("c", "C", "c1").with_value("light", red),
        ]);
        let a = var(&d, "a");
        assert_eq!(resolve_value(&d, a, "light"), resolve_value(&d, var(&d, "c"), "light"));
        assert_eq!(resolve_alias_target(&d, a, "light").map(|v| v.id.as_str()), Some("c"));
    }

    #[test]
    fn test_two_cycle_is_alias_loop() {
        let d = doc(vec![
            Variable::new("a", "A", "c1").with_value("light", VariableValue::alias("b")),
            Variable::new("b", "B", "c1").with_value("light", VariableValue::alias("a")),
        ]);
        assert_eq!(resolve_value(&d, var(&d, "a"), "light"), Resolution::AliasLoop);
        assert!(resolve_alias_target(&d, var(&d, "a"), "light").is_none());
    }

    #[test]
    fn test_self_alias_is_alias_loop() {
        let d = doc(vec![Variable::new("a", "A", "c1").with_value("light", VariableValue::alias("a"))]);
        assert_eq!(resolve_value(&d, var(&d, "a"), "light"), Resolution::AliasLoop);
        assert_eq!(Resolution::AliasLoop.warning(), Some("⚠️ Alias loop"));
    }

    #[test]
    fn test_cycle_downstream_of_start() {
        // a -> b -> c -> b
        let d = doc(vec![
            Variable::new("a", "A", "c1").with_value("light", VariableValue::alias("b")),
            Variable::new("b", "B", "c1").with_value("light", VariableValue::alias("c")),
            Variable::new("c", "C", "c1").with_value("light", VariableValue::alias("b")),
        ]);
        assert_eq!(resolve_value(&d, var(&d, "a"), "light"), Resolution::AliasLoop);
        assert!(resolve_alias_target(&d, var(&d, "a"), "light").is_none());
        assert_eq!(trace_alias_chain(&d, var(&d, "a"), "light"), vec!["a", "b", "c", "b"]);
    }

    #[test]
    fn test_dangling_alias_is_missing_target() {
        let d = doc(vec![Variable::new("a", "A", "c1").with_value("light", VariableValue::alias("gone"))]);
        assert_eq!(resolve_value(&d, var(&d, "a"), "light"), Resolution::MissingTarget);
        assert_eq!(Resolution::MissingTarget.warning(), Some("⚠️ Missing alias target"));
        assert!(resolve_alias_target(&d, var(&d, "a"), "light").is_none());
    }

    #[test]
    fn test_dangling_further_down_the_chain() {
        let d = doc(vec![
            Variable::new("a", "A", "c1").with_value("light", VariableValue::alias("b")),
            Variable::new("b", "B", "c1").with_value("light", VariableValue::alias("gone")),
        ]);
        assert_eq!(resolve_value(&d, var(&d, "a"), "light"), Resolution::MissingTarget);
        assert!(resolve_alias_target(&d, var(&d, "a"), "light").is_none());
    }

    #[test]
    fn test_cross_collection_alias_uses_target_default_mode() {
        // "light" does not exist in c2, so the target falls back to mode "p"
        let d = doc(vec![
            Variable::new("a", "A", "c1").with_value("light", VariableValue::alias("prim")),
            Variable::new("prim", "Gray/100", "c2").with_value("p", 0.5),
        ]);
        assert_eq!(resolve_value(&d, var(&d, "a"), "light"), Resolution::Value(0.5.into()));
        assert_eq!(resolve_alias_target(&d, var(&d, "a"), "light").map(|v| v.id.as_str()), Some("prim"));
    }

    #[test]
    fn test_alias_to_empty_variable() {
        let d = doc(vec![
            Variable::new("a", "A", "c1").with_value("light", VariableValue::alias("b")),
            Variable::new("b", "B", "c1"),
        ]);
        assert_eq!(resolve_value(&d, var(&d, "a"), "light"), Resolution::Empty);
        assert_eq!(resolve_alias_target(&d, var(&d, "a"), "light").map(|v| v.id.as_str()), Some("b"));
    }

    #[test]
    fn test_long_chain_resolves_to_terminal_value() {
        let mut vars: Vec<Variable> = (0..300)
            .map(|i| {
                Variable::new(format!("v{}", i), format!("V{}", i), "c1")
                    .with_value("light", VariableValue::alias(format!("v{}", i + 1)))
            })
            .collect();
        vars.push(Variable::new("v300", "End", "c1").with_value("light", 1.0));
        let d = doc(vars);
        assert_eq!(resolve_value(&d, var(&d, "v0"), "light"), Resolution::Value(1.0.into()));
        assert_eq!(resolve_alias_target(&d, var(&d, "v0"), "light").map(|v| v.id.as_str()), Some("v300"));
        assert_eq!(trace_alias_chain(&d, var(&d, "v0"), "light").len(), 301);
    }

    #[test]
    fn test_long_chain_closing_into_a_cycle() {
        // v0 -> ... -> v299 -> v150
        let vars: Vec<Variable> = (0..300)
            .map(|i| {
                let next = if i == 299 { 150 } else { i + 1 };
                Variable::new(format!("v{}", i), format!("V{}", i), "c1")
                    .with_value("light", VariableValue::alias(format!("v{}", next)))
            })
            .collect();
        let d = doc(vars);
        assert_eq!(resolve_value(&d, var(&d, "v0"), "light"), Resolution::AliasLoop);
        assert!(resolve_alias_target(&d, var(&d, "v0"), "light").is_none());
    }
}
