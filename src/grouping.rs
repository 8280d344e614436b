//! Name-based grouping and ordering of variables
//!
//! Variable names are `/`-delimited paths. The first segment is the variable's
//! group, used purely for display clustering:
//! - `Color/Primary/500` belongs to group `Color`
//! - `Spacing-base` is ungrouped
//!
//! Within a collection, ungrouped variables sort first, then groups
//! alphabetically, then names. Text comparison goes through a root-locale
//! collator at base strength, so case and accents do not move a name away
//! from its letter (`Émphasis` sorts before `Zeta`).

use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions, Strength};

use crate::models::Variable;

thread_local! {
    static BASE_COLLATOR: Option<Collator> = base_collator();
}

fn base_collator() -> Option<Collator> {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Primary);
    match Collator::try_new(&Default::default(), options) {
        Ok(collator) => Some(collator),
        Err(e) => {
            log::warn!("collator unavailable, sorting by lower-cased text: {}", e);
            None
        }
    }
}

/// Locale-aware comparison ignoring case and accents
pub fn collate(a: &str, b: &str) -> Ordering {
    BASE_COLLATOR.with(|collator| match collator {
        Some(collator) => collator.compare(a, b),
        None => a.to_lowercase().cmp(&b.to_lowercase()),
    })
}

/// Group key of a variable name: the trimmed text before the first `/`.
///
/// Returns `None` for names without a `/`. The key keeps its original case;
/// comparisons lower-case it. A leading `/` yields an empty key.
///
/// # Examples
///
/// ```
/// use varsheet::grouping::group_key_of;
///
/// assert_eq!(group_key_of("Color/Primary/500"), Some("Color"));
/// assert_eq!(group_key_of(" Brand /Primary"), Some("Brand"));
/// assert_eq!(group_key_of("Spacing-base"), None);
/// ```
pub fn group_key_of(name: &str) -> Option<&str> {
    name.find('/').map(|i| name[..i].trim())
}

/// Compare two variable names for display order.
///
/// 1. Ungrouped before grouped
/// 2. Group keys, collated; keys that collate equal but differ in case or
///    accents are kept apart by their lower-cased text
/// 3. Full names, collated, with a case-sensitive tie-break
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let (a_group, b_group) = (group_key_of(a), group_key_of(b));
    match (a_group, b_group) {
        (None, Some(_)) => return Ordering::Less,
        (Some(_), None) => return Ordering::Greater,
        _ => {}
    }

    let a_group = a_group.unwrap_or_default().to_lowercase();
    let b_group = b_group.unwrap_or_default().to_lowercase();
    collate(&a_group, &b_group)
        .then_with(|| a_group.cmp(&b_group))
        .then_with(|| collate(a, b))
        .then_with(|| a.cmp(b))
}

/// Compare two variables by name, see [`compare_names`]
pub fn compare_variables(a: &Variable, b: &Variable) -> Ordering {
    compare_names(&a.name, &b.name)
}

/// Sort variables in display order (stable)
pub fn sort_variables(variables: &mut [&Variable]) {
    variables.sort_by(|a, b| compare_variables(a, b));
}

/// A variable in display order, annotated with group boundary information
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupedEntry<'a> {
    pub variable: &'a Variable,
    /// True when a group header should be emitted before this variable
    pub new_group: bool,
    /// The variable's non-empty group key, if any
    pub group_label: Option<&'a str>,
}

/// Walk an already sorted sequence and mark where group headers belong.
///
/// A header is emitted exactly when a variable's non-empty group key differs
/// from the last emitted one. Ungrouped variables never start a group and do
/// not reset the current one.
pub fn detect_group_boundaries<'a>(sorted: &[&'a Variable]) -> Vec<GroupedEntry<'a>> {
    let mut current: Option<&str> = None;
    sorted
        .iter()
        .map(|&variable| {
            let label = group_key_of(&variable.name).filter(|g| !g.is_empty());
            let new_group = match label {
                Some(g) if current != Some(g) => {
                    current = Some(g);
                    true
                }
                _ => false,
            };
            GroupedEntry { variable, new_group, group_label: label }
        })
        .collect()
}

/// Full path for display, with spaced separators: `Brand / Primary / 500`
pub fn qualified_name(name: &str) -> String {
    name.replace('/', " / ")
}

/// Row label: the path below the group segment, or the full name when ungrouped.
///
/// # Examples
///
/// ```
/// use varsheet::grouping::display_name;
///
/// assert_eq!(display_name("Brand/Primary"), "Primary");
/// assert_eq!(display_name("Color/Primary/500"), "Primary / 500");
/// assert_eq!(display_name("Solo"), "Solo");
/// ```
pub fn display_name(name: &str) -> String {
    match name.split_once('/') {
        Some((_, rest)) if !rest.trim().is_empty() => qualified_name(rest),
        _ => qualified_name(name),
    }
}
