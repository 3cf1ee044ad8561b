//! Diagnostic codes and error reporting
//!
//! IMPORTANT: Diagnostic codes are versioned and stable.
//! NEVER rename or remove codes - editor integrations match on them.
//! Add new codes with new names only.

use serde::{Deserialize, Serialize};
use crate::schema::SourceLocation;

/// Diagnostic code registry (v1)
///
/// These codes are STABLE and VERSIONED.
/// Do NOT rename or remove codes - only add new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    // SQL issues (1xxx)
    /// The SQL parser rejected the file
    SqlParseError,

    /// A statement parsed but is missing a relation or column name
    SqlInvalidStatement,

    /// The requested SQL dialect cannot be lowered
    SqlUnsupportedDialect,

    // Input selection (2xxx)
    /// The input path is neither a directory nor a schema file
    SchemaPathUnsupported,

    /// A directory contained no schema files
    SchemaFilesNotFound,

    /// A schema file or directory could not be read
    SchemaReadError,

    // Schema validation (3xxx)
    /// The same schema-qualified table is defined more than once
    SchemaDuplicateTable,
}

impl DiagnosticCode {
    /// Get the diagnostic code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SqlParseError => "SQL_PARSE_ERROR",
            Self::SqlInvalidStatement => "SQL_INVALID_STATEMENT",
            Self::SqlUnsupportedDialect => "SQL_UNSUPPORTED_DIALECT",
            Self::SchemaPathUnsupported => "SCHEMA_PATH_UNSUPPORTED",
            Self::SchemaFilesNotFound => "SCHEMA_FILES_NOT_FOUND",
            Self::SchemaReadError => "SCHEMA_READ_ERROR",
            Self::SchemaDuplicateTable => "SCHEMA_DUPLICATE_TABLE",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,

    /// Should be reviewed but does not invalidate the schema
    Warning,

    /// Invalidates the schema
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A diagnostic message with an optional source position
///
/// The position fields are flat so the JSON shape stays
/// `{ message, severity, file?, line?, column?, code? }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Human-readable message
    pub message: String,

    /// Severity level
    pub severity: Severity,

    /// File the diagnostic points into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// 1-indexed line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,

    /// 1-indexed column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,

    /// Stable diagnostic code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<DiagnosticCode>,
}

impl Diagnostic {
    /// Create a new diagnostic with no code or position
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity,
            file: None,
            line: None,
            column: None,
            code: None,
        }
    }

    /// Shorthand for an error diagnostic
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Shorthand for a warning diagnostic
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Set the code
    pub fn with_code(mut self, code: DiagnosticCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Point at a file, line and column. An empty file leaves `file` unset.
    pub fn with_position(mut self, file: impl Into<String>, line: usize, column: usize) -> Self {
        let file = file.into();
        self.file = if file.is_empty() { None } else { Some(file) };
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Point at a table's source location
    pub fn with_location(self, location: &SourceLocation) -> Self {
        self.with_position(location.file.clone(), location.line, location.column)
    }
}
