//! Integration tests for loading schema files from disk

use lockplane_core::{Dialect, QualifiedName};
use lockplane_engine::{LoadError, SchemaLoader};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, sql: &str) {
    fs::write(dir.join(name), sql).unwrap();
}

fn load(path: &Path) -> Result<lockplane_core::Schema, LoadError> {
    SchemaLoader::default().load(path)
}

#[test]
fn single_file() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "schema.lp.sql", "CREATE TABLE users (id BIGINT PRIMARY KEY);");

    let schema = load(&dir.path().join("schema.lp.sql")).unwrap();
    assert_eq!(schema.dialect, Dialect::Postgres);
    assert_eq!(schema.table_names(), vec!["users"]);
}

#[test]
fn directory_in_alphabetical_order() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "030_comments.lp.sql", "CREATE TABLE comments (id INT);");
    write(dir.path(), "010_users.lp.sql", "CREATE TABLE users (id INT);");
    write(
        dir.path(),
        "020_posts.lp.sql",
        "CREATE TABLE posts (id INT);\nCREATE TABLE post_tags (id INT);",
    );

    let schema = load(dir.path()).unwrap();
    assert_eq!(schema.table_names(), vec!["users", "posts", "post_tags", "comments"]);
}

#[test]
fn source_locations_name_each_file() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.lp.sql", "CREATE TABLE users (id INT);");
    write(dir.path(), "b.lp.sql", "\n\nCREATE TABLE posts (id INT);");

    let schema = load(dir.path()).unwrap();
    let posts = schema.tables[1].source_location.as_ref().unwrap();
    assert_eq!(posts.file, dir.path().join("b.lp.sql").display().to_string());
    assert_eq!((posts.line, posts.column), (3, 1));
}

#[test]
fn ignores_other_files() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "users.lp.sql", "CREATE TABLE users (id INT);");
    write(dir.path(), "README.md", "# schema");
    write(dir.path(), "plain.sql", "CREATE TABLE plain (id INT);");
    write(dir.path(), "notes.lp.sql.bak", "CREATE TABLE backup (id INT);");

    let schema = load(dir.path()).unwrap();
    assert_eq!(schema.table_names(), vec!["users"]);
}

#[test]
fn ignores_subdirectories() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "users.lp.sql", "CREATE TABLE users (id INT);");

    let nested = dir.path().join("nested");
    fs::create_dir(&nested).unwrap();
    write(&nested, "posts.lp.sql", "CREATE TABLE posts (id INT);");

    // a directory whose name looks like a schema file
    fs::create_dir(dir.path().join("dir.lp.sql")).unwrap();

    let schema = load(dir.path()).unwrap();
    assert_eq!(schema.table_names(), vec!["users"]);
}

#[cfg(unix)]
#[test]
fn skips_symlinks_in_directory() {
    let target = TempDir::new().unwrap();
    write(target.path(), "linked.lp.sql", "CREATE TABLE linked (id INT);");

    let dir = TempDir::new().unwrap();
    write(dir.path(), "users.lp.sql", "CREATE TABLE users (id INT);");
    std::os::unix::fs::symlink(target.path().join("linked.lp.sql"), dir.path().join("linked.lp.sql")).unwrap();

    let schema = load(dir.path()).unwrap();
    assert_eq!(schema.table_names(), vec!["users"]);
}

#[test]
fn case_insensitive_suffix() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.LP.SQL", "CREATE TABLE upper (id INT);");
    write(dir.path(), "b.Lp.Sql", "CREATE TABLE mixed (id INT);");

    let schema = load(dir.path()).unwrap();
    assert_eq!(schema.table_names(), vec!["upper", "mixed"]);

    let schema = load(&dir.path().join("a.LP.SQL")).unwrap();
    assert_eq!(schema.table_names(), vec!["upper"]);
}

#[test]
fn empty_directory_names_directory() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "README.md", "nothing");

    let err = load(dir.path()).unwrap_err();
    assert!(matches!(err, LoadError::NoSchemaFilesFound { .. }));
    assert_eq!(
        err.to_string(),
        format!("no .lp.sql files found in directory {}", dir.path().display())
    );
}

#[test]
fn nonexistent_path() {
    let dir = TempDir::new().unwrap();
    let err = load(&dir.path().join("missing.lp.sql")).unwrap_err();
    assert!(matches!(err, LoadError::UnsupportedPath { .. }));
    assert!(err.to_string().contains("did not find .lp.sql file(s)"));
}

#[test]
fn file_without_suffix() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "schema.sql", "CREATE TABLE users (id INT);");

    let err = load(&dir.path().join("schema.sql")).unwrap_err();
    assert!(matches!(err, LoadError::UnsupportedPath { .. }));
}

#[test]
fn invalid_sql_names_file() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "bad.lp.sql", "CREATE TABLE users (id INT");

    let err = load(dir.path()).unwrap_err();
    assert!(matches!(err, LoadError::Parse { .. }));
    assert!(err.to_string().contains("bad.lp.sql"));
}

#[test]
fn trailing_newline_is_irrelevant() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "with.lp.sql", "CREATE TABLE a (id INT);\n");
    write(dir.path(), "without.lp.sql", "CREATE TABLE b (id INT)");

    let schema = load(dir.path()).unwrap();
    assert_eq!(schema.table_names(), vec!["a", "b"]);
}

#[test]
fn empty_file_has_no_tables() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "empty.lp.sql", "");

    let schema = load(&dir.path().join("empty.lp.sql")).unwrap();
    assert!(schema.tables.is_empty());
}

#[test]
fn duplicate_in_same_file() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "schema.lp.sql",
        "CREATE TABLE users (id INT);\nCREATE TABLE users (id INT);",
    );

    let err = load(dir.path()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("table \"public.users\" is defined multiple times"));
    assert!(message.contains("schema.lp.sql:1:1"));
    assert!(message.contains("schema.lp.sql:2:1"));
}

#[test]
fn duplicate_across_files() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "users1.lp.sql", "CREATE TABLE users (id INT);");
    write(dir.path(), "users2.lp.sql", "CREATE TABLE users (email TEXT);");

    let err = load(dir.path()).unwrap_err();
    assert!(matches!(err, LoadError::Duplicate(_)));

    let message = err.to_string();
    assert!(message.contains("table \"public.users\" is defined multiple times"));
    assert!(message.contains("users1.lp.sql"));
    assert!(message.contains("users2.lp.sql"));
}

#[test]
fn multiple_duplicate_tables() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "schema.lp.sql",
        "CREATE TABLE users (id INT);\nCREATE TABLE posts (id INT);\n\
         CREATE TABLE users (id INT);\nCREATE TABLE posts (id INT);",
    );

    let message = load(dir.path()).unwrap_err().to_string();
    assert!(message.contains("\"public.users\""));
    assert!(message.contains("\"public.posts\""));
    assert!(message.contains("; "));
}

#[test]
fn unvalidated_load_keeps_duplicates() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.lp.sql", "CREATE TABLE users (id INT);");
    write(dir.path(), "b.lp.sql", "CREATE TABLE users (id INT);");

    let schema = SchemaLoader::default().load_unvalidated(dir.path()).unwrap();
    assert_eq!(schema.tables.len(), 2);
}

#[test]
fn same_name_in_different_schemas() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "schema.lp.sql",
        "CREATE TABLE users (id INT);\nCREATE TABLE auth.users (id INT);\nCREATE TABLE billing.users (id INT);",
    );

    let schema = load(dir.path()).unwrap();
    assert_eq!(schema.tables.len(), 3);
    assert!(schema.find_table(&QualifiedName::new("auth", "users")).is_some());
}

#[test]
fn implicit_and_explicit_public_collide() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.lp.sql", "CREATE TABLE users (id INT);");
    write(dir.path(), "b.lp.sql", "CREATE TABLE public.users (id INT);");

    let message = load(dir.path()).unwrap_err().to_string();
    assert!(message.contains("table \"public.users\" is defined multiple times"));
}

#[test]
fn identifier_case() {
    let dir = TempDir::new().unwrap();

    // unquoted identifiers fold to lower case
    write(dir.path(), "a.lp.sql", "CREATE TABLE Users (id INT);\nCREATE TABLE users (id INT);");
    assert!(load(&dir.path().join("a.lp.sql")).is_err());

    write(dir.path(), "b.lp.sql", "CREATE TABLE \"Users\" (id INT);\nCREATE TABLE users (id INT);");
    assert!(load(&dir.path().join("b.lp.sql")).is_ok());

    write(dir.path(), "c.lp.sql", "CREATE TABLE \"Users\" (id INT);\nCREATE TABLE \"Users\" (id INT);");
    assert!(load(&dir.path().join("c.lp.sql")).is_err());
}

#[test]
fn row_security_stays_within_file() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "01_tables.lp.sql", "CREATE TABLE users (id INT);");
    write(dir.path(), "02_policies.lp.sql", "ALTER TABLE users ENABLE ROW LEVEL SECURITY;");

    // each file lowers on its own, so the ALTER finds no table
    let schema = load(dir.path()).unwrap();
    assert_eq!(schema.table_names(), vec!["users"]);
    assert!(!schema.tables[0].rls_enabled);
}

#[test]
fn row_security_in_same_file() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "01_users.lp.sql",
        "CREATE TABLE users (id INT);
ALTER TABLE users ENABLE ROW LEVEL SECURITY;",
    );
    write(dir.path(), "02_posts.lp.sql", "CREATE TABLE posts (id INT);");

    let schema = load(dir.path()).unwrap();
    assert!(schema.tables[0].rls_enabled);
    assert!(!schema.tables[1].rls_enabled);
}
