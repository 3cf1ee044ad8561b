//! Loading schemas from `.lp.sql` files
//!
//! A path is either a single schema file or a directory that is scanned
//! one level deep. Each file is lowered on its own and the resulting tables
//! are concatenated in sorted path order, so ALTER TABLE only reaches
//! tables created in the same file.

use crate::duplicates::validate_no_duplicate_tables;
use crate::error::LoadError;
use lockplane_core::{Config, Dialect, Schema};
use lockplane_sql::parse_schema;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Suffix that marks a schema file, matched case-insensitively
pub const SCHEMA_FILE_SUFFIX: &str = ".lp.sql";

/// Whether a path names a schema file
pub fn is_schema_file(path: &Path) -> bool {
    path.to_string_lossy().to_lowercase().ends_with(SCHEMA_FILE_SUFFIX)
}

/// Loads schema files into a [`Schema`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaLoader {
    dialect: Dialect,
}

impl SchemaLoader {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// Loader for the configured dialect
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.dialect)
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Load and reject duplicate table definitions
    pub fn load(&self, path: &Path) -> Result<Schema, LoadError> {
        let schema = self.load_unvalidated(path)?;
        validate_no_duplicate_tables(&schema)?;
        Ok(schema)
    }

    /// Load without the duplicate check
    pub fn load_unvalidated(&self, path: &Path) -> Result<Schema, LoadError> {
        let files = discover_schema_files(path)?;

        let mut schema = Schema::new(self.dialect);
        for file in &files {
            self.load_file_into(&mut schema, file)?;
        }

        tracing::info!(
            path = %path.display(),
            files = files.len(),
            tables = schema.tables.len(),
            "loaded schema"
        );
        Ok(schema)
    }

    /// Lower in-memory SQL as if it were the file `file`, rejecting
    /// duplicates
    pub fn load_str(&self, sql: &str, file: &str) -> Result<Schema, LoadError> {
        let schema = parse_schema(sql, self.dialect, file).map_err(|source| LoadError::Parse {
            path: PathBuf::from(file),
            source,
        })?;
        validate_no_duplicate_tables(&schema)?;
        Ok(schema)
    }

    fn load_file_into(&self, schema: &mut Schema, path: &Path) -> Result<(), LoadError> {
        let sql = std::fs::read_to_string(path).map_err(|source| LoadError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;

        let file = path.display().to_string();
        let lowered = parse_schema(&sql, self.dialect, &file).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(file = %file, tables = lowered.tables.len(), "lowered schema file");
        schema.extend(lowered);
        Ok(())
    }
}

/// Resolve a path to the schema files it names, in load order
///
/// Directories are scanned without recursion. Subdirectories and symbolic
/// links inside them are skipped.
pub fn discover_schema_files(path: &Path) -> Result<Vec<PathBuf>, LoadError> {
    if path.is_dir() {
        return discover_in_dir(path);
    }

    if path.exists() && is_schema_file(path) {
        return Ok(vec![path.to_path_buf()]);
    }

    Err(LoadError::UnsupportedPath {
        path: path.to_path_buf(),
    })
}

fn discover_in_dir(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(false) {
        let entry = entry.map_err(|source| LoadError::ReadDir {
            dir: dir.to_path_buf(),
            source,
        })?;

        if entry.path_is_symlink() || entry.file_type().is_dir() {
            continue;
        }

        if is_schema_file(Path::new(entry.file_name())) {
            tracing::debug!(file = %entry.path().display(), "discovered schema file");
            files.push(entry.into_path());
        }
    }

    if files.is_empty() {
        return Err(LoadError::NoSchemaFilesFound { dir: dir.to_path_buf() });
    }

    files.sort();
    Ok(files)
}
