//! Check report (stable wire format)
//!
//! This shape is consumed by editor integrations.
//! Fields may be added, never renamed.

use serde::{Deserialize, Serialize};
use crate::diagnostic::{Diagnostic, Severity};

fn is_zero(n: &usize) -> bool {
    *n == 0
}

/// Summary statistics for a check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of errors
    pub errors: usize,

    /// Number of warnings
    #[serde(default, skip_serializing_if = "is_zero")]
    pub warnings: usize,

    /// False once any error was reported
    pub valid: bool,
}

impl Default for Summary {
    fn default() -> Self {
        Self {
            errors: 0,
            warnings: 0,
            valid: true,
        }
    }
}

/// Output of a schema check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutput {
    /// All diagnostics, in the order they were reported
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,

    /// Summary statistics
    pub summary: Summary,
}

impl CheckOutput {
    /// Create a new, valid output with no diagnostics
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an output from diagnostics
    pub fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
        let mut output = Self::new();
        for diagnostic in diagnostics {
            output.add_diagnostic(diagnostic);
        }
        output
    }

    /// Add a diagnostic, updating the summary
    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => {
                self.summary.errors += 1;
                self.summary.valid = false;
            }
            Severity::Warning => self.summary.warnings += 1,
            Severity::Info => {}
        }

        self.diagnostics.push(diagnostic);
    }

    /// Add an error diagnostic at a position
    pub fn add_error(&mut self, message: impl Into<String>, file: impl Into<String>, line: usize, column: usize) {
        self.add_diagnostic(Diagnostic::error(message).with_position(file, line, column));
    }

    /// Add a warning diagnostic at a position
    pub fn add_warning(&mut self, message: impl Into<String>, file: impl Into<String>, line: usize, column: usize) {
        self.add_diagnostic(Diagnostic::warning(message).with_position(file, line, column));
    }

    /// Check if the output has any errors
    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }

    /// Serialize to a pretty-printed JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
