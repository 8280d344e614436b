//! Read-only query interface over a document's variables and collections.

use crate::models::{Collection, Variable};

/// Narrow, read-only view of the host document's variable data.
///
/// The resolver and export builder only ever query through this trait, so any
/// host (a JSON snapshot, a live editor bridge, a test fixture) can back them.
///
/// # Example
///
/// ```
/// use varsheet::models::{Collection, Mode, Variable};
/// use varsheet::registry::{Document, VariableSource};
///
/// let doc = Document::new(
///     vec![Collection::new("c1", "Colors", vec![Mode::new("m1", "Light")])],
///     vec![Variable::new("v1", "Brand/Primary", "c1")],
/// );
///
/// assert!(doc.get_variable("v1").is_some());
/// assert_eq!(doc.list_collections().len(), 1);
/// ```
pub trait VariableSource {
    /// Look up a variable by id.
    fn get_variable(&self, id: &str) -> Option<&Variable>;

    /// Look up a collection by id.
    fn get_collection(&self, id: &str) -> Option<&Collection>;

    /// All local variables, in document order.
    fn list_variables(&self) -> &[Variable];

    /// All local collections, in document order.
    fn list_collections(&self) -> &[Collection];

    /// Variables owned by a collection, in document order.
    fn variables_in<'a>(&'a self, collection_id: &str) -> Vec<&'a Variable> {
        self.list_variables().iter().filter(|v| v.variable_collection_id == collection_id).collect()
    }

    /// Check if the document has nothing to export.
    fn is_empty(&self) -> bool {
        self.list_collections().is_empty() || self.list_variables().is_empty()
    }
}
