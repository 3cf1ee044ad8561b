//! Schema check pipeline
//!
//! Loads a schema path and reports every problem as a diagnostic instead of
//! failing. Content problems never make the check itself fail.

use crate::duplicates::duplicate_table_diagnostics;
use crate::loader::SchemaLoader;
use lockplane_core::CheckOutput;
use std::path::Path;

/// Runs the check pipeline over schema files
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaChecker {
    loader: SchemaLoader,
}

impl SchemaChecker {
    pub fn new(loader: SchemaLoader) -> Self {
        Self { loader }
    }

    /// Check a file or directory
    ///
    /// A load failure becomes the only diagnostic. Otherwise every duplicate
    /// table definition is reported.
    pub fn check(&self, path: &Path) -> CheckOutput {
        let mut output = CheckOutput::new();

        let schema = match self.loader.load_unvalidated(path) {
            Ok(schema) => schema,
            Err(err) => {
                tracing::debug!(error = %err, "schema failed to load");
                output.add_diagnostic(err.to_diagnostic(path));
                return output;
            }
        };

        for diagnostic in duplicate_table_diagnostics(&schema) {
            output.add_diagnostic(diagnostic);
        }

        tracing::info!(
            errors = output.summary.errors,
            valid = output.summary.valid,
            "schema check finished"
        );
        output
    }

    /// Check a path and render the report as pretty JSON
    pub fn check_json(&self, path: &Path) -> Result<String, serde_json::Error> {
        self.check(path).to_json()
    }
}

/// Check a path with the default loader and render the report as JSON
pub fn check_schema_json(path: &Path) -> Result<String, serde_json::Error> {
    SchemaChecker::default().check_json(path)
}
