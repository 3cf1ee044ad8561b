//! Canonical column type names
//!
//! The parser reports many built-in types by their catalog spelling
//! (`BIGINT` arrives as `pg_catalog.int8`). These are mapped back to the
//! standard SQL names so two schemas compare equal regardless of how the
//! author spelled the type.

use pg_query::protobuf::a_const::Val;
use pg_query::protobuf::TypeName;
use pg_query::NodeEnum;

/// Qualifier the parser puts on built-in types
pub const CATALOG_SCHEMA: &str = "pg_catalog";

/// Internal spelling to canonical name. Lookup is case-insensitive.
const TYPE_ALIASES: &[(&str, &str)] = &[
    // Integer types
    ("int2", "smallint"),
    ("int4", "integer"),
    ("int8", "bigint"),
    ("serial", "serial"),
    ("serial2", "smallserial"),
    ("serial4", "serial"),
    ("serial8", "bigserial"),
    // Boolean
    ("bool", "boolean"),
    // Character types
    ("varchar", "varchar"),
    ("bpchar", "char"),
    // Floating point
    ("float4", "real"),
    ("float8", "double precision"),
    // Date/time
    ("timestamp", "timestamp without time zone"),
    ("timestamptz", "timestamp with time zone"),
    ("time", "time without time zone"),
    ("timetz", "time with time zone"),
    // Text
    ("text", "text"),
    // Numeric
    ("numeric", "numeric"),
    ("decimal", "decimal"),
];

/// Map an internal type spelling to its canonical SQL name.
///
/// Unknown names are returned unchanged.
pub fn normalize_type(name: &str) -> &str {
    TYPE_ALIASES
        .iter()
        .find(|(internal, _)| internal.eq_ignore_ascii_case(name))
        .map(|(_, canonical)| *canonical)
        .unwrap_or(name)
}

/// Render a type reference as canonical SQL text, e.g. `varchar(255)` or
/// `integer[]`.
pub fn render_type(type_name: &TypeName) -> String {
    let parts: Vec<&str> = type_name
        .names
        .iter()
        .filter_map(|node| match &node.node {
            Some(NodeEnum::String(s)) => Some(s.sval.as_str()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        return String::new();
    }

    let base = match parts.as_slice() {
        [CATALOG_SCHEMA, .., last] => (*last).to_string(),
        _ => parts.join("."),
    };

    let mut rendered = normalize_type(&base).to_string();

    let modifiers: Vec<String> = type_name
        .typmods
        .iter()
        .filter_map(|node| match &node.node {
            Some(NodeEnum::AConst(constant)) => match &constant.val {
                Some(Val::Ival(int)) => Some(int.ival.to_string()),
                _ => None,
            },
            _ => None,
        })
        .collect();

    if !modifiers.is_empty() {
        rendered = format!("{}({})", rendered, modifiers.join(","));
    }

    if !type_name.array_bounds.is_empty() {
        rendered.push_str("[]");
    }

    rendered
}
