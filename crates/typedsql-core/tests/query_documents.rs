//! Tests for query-document validation and the end-to-end pipeline from
//! schema text to a `ResolvedQuery`.

mod common;
use common::*;

use typedsql_core::ast::{NumericType, SimpleType, SqlType};
use typedsql_core::{parse_query_document, Error, QueryKind, VariableKey};

#[test]
fn document_with_one_select_is_accepted() {
    let statement = parse_query_document("SELECT id FROM users;").expect("document");
    assert!(matches!(statement, typedsql_core::Statement::Select(_)));
}

#[test]
fn document_with_trailing_comment_is_accepted() {
    let statement =
        parse_query_document("SELECT id FROM users;\n-- picks every user id\n").expect("document");
    assert!(matches!(statement, typedsql_core::Statement::Select(_)));
}

#[test]
fn document_with_two_statements_is_rejected() {
    let err = parse_query_document("SELECT id FROM users; SELECT name FROM users;")
        .expect_err("two statements");
    assert!(matches!(err, Error::InvalidQueryDocument { .. }));
}

#[test]
fn document_with_no_statement_is_rejected() {
    let err = parse_query_document("-- nothing here\n;").expect_err("no statement");
    assert!(matches!(err, Error::InvalidQueryDocument { .. }));
}

#[test]
fn document_with_create_table_is_rejected() {
    let err = parse_query_document("CREATE TABLE t (a int)").expect_err("wrong kind");
    assert!(matches!(err, Error::InvalidQueryDocument { .. }));
}

#[test]
fn end_to_end_select_with_join_and_variable() {
    let query = resolve(
        "SELECT u.id, u.name, o.total FROM users u \
         LEFT JOIN orders o ON o.user_id = u.id WHERE u.id = $1",
    );

    assert_eq!(query.kind, QueryKind::Select);
    assert_eq!(query.name, "query");

    let columns = query.columns.as_ref().expect("select has columns");
    let summary: Vec<(&str, SqlType, bool)> = columns
        .iter()
        .map(|c| (c.column.as_str(), c.data_type, c.nullable))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("id", SqlType::Simple(SimpleType::Int), false),
            ("name", SqlType::Simple(SimpleType::Text), false),
            (
                "total",
                SqlType::Numeric {
                    base: NumericType::Numeric,
                    precision_scale: Some((10, 2))
                },
                true
            ),
        ]
    );

    assert_eq!(query.variables.len(), 1);
    let variable = &query.variables[0];
    assert_eq!(variable.key, VariableKey::Indexed(1));
    assert_eq!(variable.data_type, SqlType::Simple(SimpleType::Int));
    assert!(!variable.nullable);
}

#[test]
fn resolved_query_serializes_for_the_printer() {
    let query = resolve("SELECT u.name FROM users AS u WHERE u.id = $1");
    let json = serde_json::to_value(&query).expect("serializable");

    assert_eq!(json["kind"], "Select");
    assert_eq!(json["columns"][0]["column"], "name");
    assert_eq!(json["columns"][0]["type"], "TEXT");
    assert_eq!(json["variables"][0]["type"], "INT");
    assert_eq!(
        json["statement"],
        "SELECT u.name FROM users AS u WHERE u.id = $1"
    );
}

#[test]
fn insert_document_resolves_without_columns() {
    let query = resolve("INSERT INTO orders (user_id, total) VALUES ($1, $2);");
    assert_eq!(query.kind, QueryKind::Insert);
    assert!(query.columns.is_none());
    assert_eq!(query.variables.len(), 2);
}

#[test]
fn one_failing_document_does_not_poison_the_schema() {
    let schema = schema();
    let bad = typedsql_core::resolve_query_document(&schema, "bad", "SELECT missing FROM users");
    assert!(bad.is_err());
    let good = typedsql_core::resolve_query_document(&schema, "good", "SELECT id FROM users");
    assert!(good.is_ok());
}
