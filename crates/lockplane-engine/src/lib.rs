//! Lockplane engine - schema loading and checking
//!
//! This crate implements:
//! - Discovery and loading of `.lp.sql` files
//! - Duplicate table validation
//! - The check pipeline that turns load results into diagnostics

pub mod error;
pub mod loader;
pub mod duplicates;
pub mod check;

pub use error::LoadError;
pub use loader::{discover_schema_files, is_schema_file, SchemaLoader, SCHEMA_FILE_SUFFIX};
pub use duplicates::{
    duplicate_table_diagnostics, find_duplicate_tables, validate_no_duplicate_tables, DuplicateTable,
    DuplicateTableError,
};
pub use check::{check_schema_json, SchemaChecker};
