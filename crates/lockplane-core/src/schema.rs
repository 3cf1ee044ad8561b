//! Normalized table model
//!
//! A [`Schema`] is what DDL lowers into: schema-qualified tables with
//! canonical column types and the position each table was defined at.

use serde::{Deserialize, Serialize};

/// Schema name assumed when a table is not qualified
pub const DEFAULT_SCHEMA: &str = "public";

/// SQL dialect a schema was written in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// PostgreSQL
    #[default]
    Postgres,

    /// SQLite (recognized, cannot be lowered yet)
    Sqlite,
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Postgres => write!(f, "postgres"),
            Self::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Where a definition starts in its source file
///
/// Names the statement's first token, so leading whitespace and comments
/// after the previous `;` are not counted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Source file path, empty for inline SQL
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file: String,

    /// 1-indexed line
    pub line: usize,

    /// 1-indexed column
    pub column: usize,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.file.is_empty() {
            write!(f, "line {}", self.line)
        } else {
            write!(f, "{}:{}:{}", self.file, self.line, self.column)
        }
    }
}

/// Schema-qualified table identity
///
/// An empty schema resolves to [`DEFAULT_SCHEMA`]. Comparison is exact,
/// so identifier case is whatever the parser delivered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    pub schema: String,
    pub name: String,
}

impl QualifiedName {
    /// Build from a possibly empty schema qualifier
    pub fn new(schema: &str, name: impl Into<String>) -> Self {
        let schema = if schema.is_empty() { DEFAULT_SCHEMA } else { schema };
        Self {
            schema: schema.to_string(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

/// A column definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,

    /// Canonical type, including `(p,s)` modifiers and `[]` suffix
    #[serde(rename = "type")]
    pub data_type: String,

    /// Whether NULL is allowed
    pub nullable: bool,

    /// Declared as PRIMARY KEY
    pub is_primary_key: bool,

    /// DEFAULT expression rendered back to SQL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl Column {
    /// Create a nullable, non-key column without a default
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable: true,
            is_primary_key: false,
            default: None,
        }
    }
}

/// A table definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Table name
    pub name: String,

    /// Schema qualifier as written; empty when unqualified
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub schema: String,

    /// Columns in declaration order
    pub columns: Vec<Column>,

    /// Row-level security enabled via ALTER TABLE
    #[serde(default)]
    pub rls_enabled: bool,

    /// Position of the CREATE TABLE statement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_location: Option<SourceLocation>,
}

impl Table {
    /// Create an empty, unqualified table
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: String::new(),
            columns: Vec::new(),
            rls_enabled: false,
            source_location: None,
        }
    }

    /// Set the schema qualifier
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    /// Set the source location
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.source_location = Some(location);
        self
    }

    /// Identity used for ALTER TABLE matching and duplicate detection
    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::new(&self.schema, self.name.clone())
    }

    /// Find a column by name
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// An ordered collection of tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Dialect the tables were parsed as
    pub dialect: Dialect,

    /// Tables in file order, then statement order
    pub tables: Vec<Table>,
}

impl Schema {
    /// Create an empty schema for a dialect
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            tables: Vec::new(),
        }
    }

    /// Find a table by qualified name
    pub fn find_table(&self, name: &QualifiedName) -> Option<&Table> {
        self.tables.iter().find(|t| &t.qualified_name() == name)
    }

    /// Mutable lookup by qualified name (first match)
    pub fn find_table_mut(&mut self, name: &QualifiedName) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| &t.qualified_name() == name)
    }

    /// Append all tables of another schema
    pub fn extend(&mut self, other: Schema) {
        self.tables.extend(other.tables);
    }

    /// Get table names
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    /// Pretty-printed JSON, the `--print-schema` output
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
