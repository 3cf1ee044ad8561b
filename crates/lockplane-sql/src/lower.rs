//! Lowering parsed statements into the table model
//!
//! CREATE TABLE produces a [`Table`]; ALTER TABLE toggles row-level
//! security on a table lowered earlier. Every other statement kind is
//! accepted and ignored.

use lockplane_core::{Column, Dialect, QualifiedName, Schema, SourceLocation, Table};
use pg_query::protobuf::{AlterTableStmt, AlterTableType, ColumnDef, ConstrType, Constraint, CreateStmt};
use pg_query::NodeEnum;

use crate::expr::ExprFormatter;
use crate::parser::{ParseError, SqlParser};
use crate::position::{line_column, skip_trivia};
use crate::types::render_type;

/// Error lowering SQL into a schema
#[derive(Debug, thiserror::Error)]
pub enum LowerError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("{statement} missing relation at {location}")]
    MissingRelation {
        statement: &'static str,
        location: SourceLocation,
    },

    #[error("column missing name in table \"{table}\" at {location}")]
    MissingColumnName {
        table: String,
        location: SourceLocation,
    },
}

impl LowerError {
    /// Where in the source the error was found, if known
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Self::Parse(_) => None,
            Self::MissingRelation { location, .. } | Self::MissingColumnName { location, .. } => Some(location),
        }
    }
}

/// Parse SQL and lower it into a new schema
///
/// `file` is recorded in every source location; pass an empty string for
/// inline SQL.
pub fn parse_schema(sql: &str, dialect: Dialect, file: &str) -> Result<Schema, LowerError> {
    let mut schema = Schema::new(dialect);
    lower_into(&mut schema, sql, file)?;
    Ok(schema)
}

/// Parse SQL and lower it into an existing schema
///
/// New tables are appended in statement order. ALTER TABLE statements see
/// every table already in `schema`, not just those from `sql`. Returns the
/// number of tables added.
pub fn lower_into(schema: &mut Schema, sql: &str, file: &str) -> Result<usize, LowerError> {
    let parsed = SqlParser::from_dialect(schema.dialect).parse(sql)?;
    let before = schema.tables.len();

    let mut lowerer = SchemaLowerer::new(schema, sql, file);
    for statement in parsed.statements() {
        lowerer.lower_statement(statement.node, statement.location)?;
    }

    Ok(schema.tables.len() - before)
}

/// Lowers statements from one source text into a schema
pub struct SchemaLowerer<'a> {
    schema: &'a mut Schema,
    sql: &'a str,
    file: &'a str,
}

impl<'a> SchemaLowerer<'a> {
    /// `sql` must be the exact text the statements were parsed from
    pub fn new(schema: &'a mut Schema, sql: &'a str, file: &'a str) -> Self {
        Self { schema, sql, file }
    }

    /// Lower one statement that starts at byte offset `location`
    pub fn lower_statement(&mut self, node: &NodeEnum, location: i32) -> Result<(), LowerError> {
        match node {
            NodeEnum::CreateStmt(stmt) => {
                let table = self.lower_create_table(stmt, location)?;
                tracing::debug!(table = %table.qualified_name(), columns = table.columns.len(), "lowered CREATE TABLE");
                self.schema.tables.push(table);
            }
            NodeEnum::AlterTableStmt(stmt) => self.lower_alter_table(stmt, location)?,
            _ => tracing::trace!(location, "skipping unsupported statement"),
        }
        Ok(())
    }

    /// Resolve a statement offset to the position of its first token
    fn locate(&self, offset: i32) -> SourceLocation {
        let (line, column) = line_column(self.sql, skip_trivia(self.sql, offset));
        SourceLocation::new(self.file, line, column)
    }

    fn lower_create_table(&self, stmt: &CreateStmt, location: i32) -> Result<Table, LowerError> {
        let location = self.locate(location);
        let Some(relation) = stmt.relation.as_ref().filter(|r| !r.relname.is_empty()) else {
            return Err(LowerError::MissingRelation {
                statement: "CREATE TABLE",
                location,
            });
        };

        // the schema stays as written; "public" is only assumed when comparing
        let mut table = Table::new(relation.relname.clone())
            .with_schema(relation.schemaname.clone())
            .with_location(location);

        // table-level constraints (PRIMARY KEY (a, b), FOREIGN KEY ...) are not modelled
        for element in &stmt.table_elts {
            if let Some(NodeEnum::ColumnDef(def)) = &element.node {
                let column = self.lower_column(def, &table.name)?;
                table.columns.push(column);
            }
        }

        Ok(table)
    }

    fn lower_column(&self, def: &ColumnDef, table: &str) -> Result<Column, LowerError> {
        if def.colname.is_empty() {
            return Err(LowerError::MissingColumnName {
                table: table.to_string(),
                location: self.locate(def.location),
            });
        }

        let data_type = def.type_name.as_ref().map(|t| render_type(t)).unwrap_or_default();
        let mut column = Column::new(def.colname.clone(), data_type);

        for node in &def.constraints {
            if let Some(NodeEnum::Constraint(constraint)) = &node.node {
                self.apply_constraint(&mut column, constraint);
            }
        }

        Ok(column)
    }

    /// Constraints apply in source order, so a later NULL overrides NOT NULL
    fn apply_constraint(&self, column: &mut Column, constraint: &Constraint) {
        match constraint.contype() {
            ConstrType::ConstrNotnull => column.nullable = false,
            ConstrType::ConstrNull => column.nullable = true,
            ConstrType::ConstrDefault => {
                if let Some(expr) = &constraint.raw_expr {
                    column.default = Some(ExprFormatter::with_source(self.sql).format(expr));
                }
            }
            ConstrType::ConstrPrimary => {
                column.is_primary_key = true;
                column.nullable = false;
            }
            _ => {}
        }
    }

    fn lower_alter_table(&mut self, stmt: &AlterTableStmt, location: i32) -> Result<(), LowerError> {
        let Some(relation) = stmt.relation.as_ref().filter(|r| !r.relname.is_empty()) else {
            return Err(LowerError::MissingRelation {
                statement: "ALTER TABLE",
                location: self.locate(location),
            });
        };

        let target = QualifiedName::new(&relation.schemaname, relation.relname.clone());

        // The table may be created later or already exist in the database.
        let Some(table) = self.schema.find_table_mut(&target) else {
            tracing::debug!(table = %target, "ALTER TABLE target not defined yet, skipping");
            return Ok(());
        };

        for node in &stmt.cmds {
            if let Some(NodeEnum::AlterTableCmd(cmd)) = &node.node {
                match cmd.subtype() {
                    AlterTableType::AtEnableRowSecurity => table.rls_enabled = true,
                    AlterTableType::AtDisableRowSecurity => table.rls_enabled = false,
                    _ => {}
                }
            }
        }

        Ok(())
    }
}
