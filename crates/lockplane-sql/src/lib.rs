//! SQL parsing and lowering
//!
//! This crate handles:
//! - Parsing PostgreSQL DDL using libpg_query
//! - Normalizing column types to canonical names
//! - Rendering DEFAULT expressions back to SQL
//! - Lowering CREATE TABLE / ALTER TABLE into the table model
//! - Resolving statement offsets to line and column

pub mod parser;
pub mod types;
pub mod expr;
pub mod position;
pub mod lower;

pub use parser::{SqlParser, ParsedSql, ParseError, Statement};
pub use types::{normalize_type, render_type};
pub use expr::{ExprFormatter, UNDEFINED_EXPRESSION};
pub use position::{line_column, skip_trivia};
pub use lower::{lower_into, parse_schema, LowerError, SchemaLowerer};
