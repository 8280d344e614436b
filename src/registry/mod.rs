//! Document data sources.
//!
//! This module provides:
//! - The `VariableSource` trait, the only way the core reads host data
//! - `Document`, an in-memory snapshot loaded from JSON/JSON5

mod document;
mod traits;

pub use document::{Document, DocumentError};
pub use traits::VariableSource;
