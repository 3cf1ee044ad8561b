//! Lockplane Core
//!
//! Core domain model with stable, versioned types.
//! Never rename diagnostic codes - they are part of the public API.

pub mod diagnostic;
pub mod schema;
pub mod report;
pub mod config;

pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use schema::{Column, Dialect, QualifiedName, Schema, SourceLocation, Table, DEFAULT_SCHEMA};
pub use report::{CheckOutput, Summary};
pub use config::{Config, ConfigError, CONFIG_FILE_NAME};
