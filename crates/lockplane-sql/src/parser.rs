//! SQL parsing using libpg_query
//!
//! PostgreSQL's own grammar produces the tree, so identifier case folding
//! and internal type spellings match what a live server would see.

use lockplane_core::Dialect;
use pg_query::protobuf::RawStmt;
use pg_query::NodeEnum;

/// SQL parser for one dialect
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlParser {
    dialect: Dialect,
}

impl SqlParser {
    /// Create a parser for the default (PostgreSQL) dialect
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser for PostgreSQL
    pub fn postgres() -> Self {
        Self { dialect: Dialect::Postgres }
    }

    /// Create a parser for a configured dialect
    pub fn from_dialect(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// Dialect this parser accepts
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Parse SQL text into raw statements
    ///
    /// Any syntax error fails the whole call; there is no partial result.
    pub fn parse(&self, sql: &str) -> Result<ParsedSql, ParseError> {
        match self.dialect {
            Dialect::Postgres => {
                let result = pg_query::parse(sql)?;
                Ok(ParsedSql {
                    sql: sql.to_string(),
                    stmts: result.protobuf.stmts,
                })
            }
            other => Err(ParseError::UnsupportedDialect(other)),
        }
    }
}

/// One top-level statement and the byte offset it starts at
#[derive(Debug, Clone, Copy)]
pub struct Statement<'a> {
    pub node: &'a NodeEnum,

    /// Byte offset reported by the parser
    pub location: i32,
}

/// Successfully parsed SQL
#[derive(Debug, Clone)]
pub struct ParsedSql {
    /// Original SQL string
    pub sql: String,

    /// Raw statements in source order
    pub stmts: Vec<RawStmt>,
}

impl ParsedSql {
    /// Iterate statements that carry a node, in source order
    pub fn statements(&self) -> impl Iterator<Item = Statement<'_>> {
        self.stmts.iter().filter_map(|raw| {
            let node = raw.stmt.as_ref()?.node.as_ref()?;
            Some(Statement {
                node,
                location: raw.stmt_location,
            })
        })
    }

    /// Count the number of statements
    pub fn statement_count(&self) -> usize {
        self.stmts.len()
    }
}

/// SQL parsing error
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to parse SQL: {0}")]
    Syntax(#[from] pg_query::Error),

    #[error("unsupported dialect {0}")]
    UnsupportedDialect(Dialect),
}
