//! Configuration module for varsheet
//!
//! Provides types, discovery and parsing for `varsheet.toml`.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
