//! Loader errors and their diagnostic form

use crate::duplicates::DuplicateTableError;
use lockplane_core::{Diagnostic, DiagnosticCode};
use lockplane_sql::{LowerError, ParseError};
use std::path::{Path, PathBuf};

/// Error loading a schema from disk
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("did not find .lp.sql file(s) at {}", .path.display())]
    UnsupportedPath { path: PathBuf },

    #[error("no .lp.sql files found in directory {}", .dir.display())]
    NoSchemaFilesFound { dir: PathBuf },

    #[error("failed to read schema directory {}: {source}", .dir.display())]
    ReadDir {
        dir: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to read SQL file {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse SQL file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: LowerError,
    },

    #[error(transparent)]
    Duplicate(#[from] DuplicateTableError),
}

impl LoadError {
    /// Stable code for this failure
    pub fn code(&self) -> DiagnosticCode {
        match self {
            Self::UnsupportedPath { .. } => DiagnosticCode::SchemaPathUnsupported,
            Self::NoSchemaFilesFound { .. } => DiagnosticCode::SchemaFilesNotFound,
            Self::ReadDir { .. } | Self::ReadFile { .. } => DiagnosticCode::SchemaReadError,
            Self::Parse { source, .. } => match source {
                LowerError::Parse(ParseError::Syntax(_)) => DiagnosticCode::SqlParseError,
                LowerError::Parse(ParseError::UnsupportedDialect(_)) => DiagnosticCode::SqlUnsupportedDialect,
                LowerError::MissingRelation { .. } | LowerError::MissingColumnName { .. } => {
                    DiagnosticCode::SqlInvalidStatement
                }
            },
            Self::Duplicate(_) => DiagnosticCode::SchemaDuplicateTable,
        }
    }

    /// Convert into a single error diagnostic
    ///
    /// Lowering failures point at the offending statement. Other file
    /// failures point at the start of that file, and path selection
    /// failures at the start of `input`.
    pub fn to_diagnostic(&self, input: &Path) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.to_string()).with_code(self.code());

        match self {
            Self::Parse { source, path } => match source.location() {
                Some(location) => diagnostic.with_location(location),
                None => diagnostic.with_position(path.display().to_string(), 1, 1),
            },
            Self::ReadFile { path, .. } => diagnostic.with_position(path.display().to_string(), 1, 1),
            Self::ReadDir { dir, .. } => diagnostic.with_position(dir.display().to_string(), 1, 1),
            Self::Duplicate(err) => match err.duplicates.first().and_then(|d| d.occurrences.iter().flatten().next()) {
                Some(location) => diagnostic.with_location(location),
                None => diagnostic.with_position(input.display().to_string(), 1, 1),
            },
            Self::UnsupportedPath { .. } | Self::NoSchemaFilesFound { .. } => {
                diagnostic.with_position(input.display().to_string(), 1, 1)
            }
        }
    }
}
