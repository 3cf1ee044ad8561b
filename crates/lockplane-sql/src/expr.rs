//! Rendering DEFAULT expressions back to SQL text

use pg_query::protobuf::a_const::Val;
use pg_query::protobuf::{AConst, CoercionForm, FuncCall, Node};
use pg_query::NodeEnum;

use crate::types::CATALOG_SCHEMA;

/// Placeholder for expression kinds that cannot be rendered
pub const UNDEFINED_EXPRESSION: &str = "UNDEFINED_EXPRESSION";

/// Keyword for a SQL value function operation code.
///
/// Precision-qualified variants (`CURRENT_TIME(3)`) render like their
/// plain counterparts.
pub fn value_function_keyword(op: i32) -> Option<&'static str> {
    let keyword = match op {
        1 => "CURRENT_DATE",
        2 | 3 => "CURRENT_TIME",
        4 | 5 => "CURRENT_TIMESTAMP",
        6 | 7 => "LOCALTIME",
        8 | 9 => "LOCALTIMESTAMP",
        10 => "CURRENT_ROLE",
        11 => "CURRENT_USER",
        12 => "USER",
        13 => "SESSION_USER",
        14 => "CURRENT_CATALOG",
        15 => "CURRENT_SCHEMA",
        _ => return None,
    };
    Some(keyword)
}

/// Formats expression nodes as SQL
///
/// Given the pristine source text, function names keep the spelling the
/// author wrote (`NOW()` stays `NOW()` even though the parser lowercases it).
#[derive(Debug, Clone, Copy, Default)]
pub struct ExprFormatter<'a> {
    source: &'a str,
}

impl<'a> ExprFormatter<'a> {
    /// Formatter without source text; function names render as parsed
    pub fn new() -> Self {
        Self::default()
    }

    /// Formatter that consults the source for function name spelling
    pub fn with_source(source: &'a str) -> Self {
        Self { source }
    }

    /// Render an expression. Never fails: unknown kinds yield
    /// [`UNDEFINED_EXPRESSION`].
    pub fn format(&self, node: &Node) -> String {
        match &node.node {
            Some(node) => self.format_node(node),
            None => UNDEFINED_EXPRESSION.to_string(),
        }
    }

    /// Render an already unwrapped node
    pub fn format_node(&self, node: &NodeEnum) -> String {
        match node {
            NodeEnum::AConst(constant) => format_const(constant),
            NodeEnum::FuncCall(call) => self.format_func_call(call),
            // casts are transparent: '{}'::jsonb renders as '{}'
            NodeEnum::TypeCast(cast) => match &cast.arg {
                Some(arg) => self.format(arg),
                None => UNDEFINED_EXPRESSION.to_string(),
            },
            NodeEnum::SqlvalueFunction(function) => value_function_keyword(function.op)
                .unwrap_or(UNDEFINED_EXPRESSION)
                .to_string(),
            _ => UNDEFINED_EXPRESSION.to_string(),
        }
    }

    fn format_func_call(&self, call: &FuncCall) -> String {
        let names: Vec<&str> = call
            .funcname
            .iter()
            .filter_map(|node| match &node.node {
                Some(NodeEnum::String(s)) => Some(s.sval.as_str()),
                _ => None,
            })
            .collect();

        // Only the first segment names the function, except for the
        // parser's own catalog qualifier (EXTRACT, TRIM and friends).
        let name = match names.as_slice() {
            [] => return UNDEFINED_EXPRESSION.to_string(),
            [CATALOG_SCHEMA, .., last] => *last,
            [first, ..] => *first,
        };
        let name = self.source_spelling(name, call.location);

        // CURRENT_USER and friends parse as argument-less SQL-syntax calls
        if call.args.is_empty() && call.funcformat == CoercionForm::CoerceSqlSyntax as i32 {
            return name.to_string();
        }

        let args: Vec<String> = call.args.iter().map(|arg| self.format(arg)).collect();
        format!("{}({})", name, args.join(", "))
    }

    /// The name as written at `location`, if it matches ignoring ASCII case
    fn source_spelling<'s>(&'s self, name: &'s str, location: i32) -> &'s str {
        usize::try_from(location)
            .ok()
            .and_then(|start| self.source.get(start..start + name.len()))
            .filter(|written| written.eq_ignore_ascii_case(name))
            .unwrap_or(name)
    }
}

fn format_const(constant: &AConst) -> String {
    match &constant.val {
        Some(Val::Ival(int)) => int.ival.to_string(),
        Some(Val::Fval(float)) => float.fval.clone(),
        Some(Val::Sval(string)) => format!("'{}'", string.sval.replace('\'', "''")),
        Some(Val::Bsval(bits)) => bits.bsval.clone(),
        Some(Val::Boolval(boolean)) => boolean.boolval.to_string(),
        None if constant.isnull => "NULL".to_string(),
        None => UNDEFINED_EXPRESSION.to_string(),
    }
}
