//! Duplicate table detection
//!
//! Tables are keyed by effective schema and name, so `users` and
//! `public.users` collide while `auth.users` does not. Keys compare as exact
//! strings; quoting rules were already applied by the parser.

use lockplane_core::{Diagnostic, DiagnosticCode, QualifiedName, Schema, SourceLocation};
use std::collections::HashMap;

/// A table key defined more than once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateTable {
    /// The colliding identity
    pub name: QualifiedName,

    /// Location of every definition, in schema order
    pub occurrences: Vec<Option<SourceLocation>>,
}

/// One or more tables are defined multiple times
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", describe(.duplicates))]
pub struct DuplicateTableError {
    pub duplicates: Vec<DuplicateTable>,
}

fn describe(duplicates: &[DuplicateTable]) -> String {
    duplicates
        .iter()
        .map(|duplicate| {
            let locations: Vec<String> = duplicate
                .occurrences
                .iter()
                .flatten()
                .map(ToString::to_string)
                .collect();

            if locations.is_empty() {
                format!("table \"{}\" is defined multiple times", duplicate.name)
            } else {
                format!(
                    "table \"{}\" is defined multiple times at: {}",
                    duplicate.name,
                    locations.join(", ")
                )
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Group tables by qualified name and keep the keys seen more than once.
///
/// Keys come back in order of their first definition.
pub fn find_duplicate_tables(schema: &Schema) -> Vec<DuplicateTable> {
    let mut index: HashMap<QualifiedName, usize> = HashMap::new();
    let mut groups: Vec<DuplicateTable> = Vec::new();

    for table in &schema.tables {
        let name = table.qualified_name();
        let slot = *index.entry(name.clone()).or_insert_with(|| {
            groups.push(DuplicateTable {
                name,
                occurrences: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].occurrences.push(table.source_location.clone());
    }

    groups.retain(|group| group.occurrences.len() > 1);
    groups
}

/// Fail if any table is defined more than once
pub fn validate_no_duplicate_tables(schema: &Schema) -> Result<(), DuplicateTableError> {
    let duplicates = find_duplicate_tables(schema);
    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(DuplicateTableError { duplicates })
    }
}

/// One error diagnostic per definition of every duplicated table
///
/// The first definition is reported as the first occurrence and each later
/// one as a duplicate. Definitions without a known location point at line 1,
/// column 1 with no file.
pub fn duplicate_table_diagnostics(schema: &Schema) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for duplicate in find_duplicate_tables(schema) {
        for (i, occurrence) in duplicate.occurrences.iter().enumerate() {
            let message = if i == 0 {
                format!("Table \"{}\" is defined multiple times (first occurrence)", duplicate.name)
            } else {
                format!("Table \"{}\" is already defined (duplicate definition)", duplicate.name)
            };

            let diagnostic = Diagnostic::error(message).with_code(DiagnosticCode::SchemaDuplicateTable);
            let diagnostic = match occurrence {
                Some(location) => diagnostic.with_location(location),
                None => diagnostic.with_position("", 1, 1),
            };
            diagnostics.push(diagnostic);
        }
    }

    diagnostics
}
