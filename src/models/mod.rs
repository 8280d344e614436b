//! Data models for variable collections (variables, modes, collections)

mod core;
mod variable;

// Re-export all public types
pub use self::core::{VariableValue, ALIAS_TYPE};
pub use variable::{Collection, Mode, Variable};
