#![allow(dead_code)]

use typedsql_core::ast::{
    CreateTableStatement, InsertStatement, SelectStatement, UpdateStatement,
};
use typedsql_core::{resolve_query_document, Error, Parser, ResolvedQuery, Schema, Statement};

/// The schema every resolver test runs against.
pub const TEST_SCHEMA: &str = "
    CREATE TABLE users (
        id serial PRIMARY KEY,
        name text NOT NULL,
        email text
    );
    CREATE TABLE orders (
        id serial PRIMARY KEY,
        user_id int REFERENCES users(id),
        total numeric(10, 2) NOT NULL
    );
    CREATE TABLE items (
        id serial PRIMARY KEY,
        order_id int NOT NULL REFERENCES orders(id),
        label varchar(64)
    );
";

pub fn schema() -> Schema {
    Schema::parse(TEST_SCHEMA).unwrap_or_else(|e| panic!("failed to build test schema: {e}"))
}

pub fn parse(sql: &str) -> Statement {
    Parser::parse(sql).unwrap_or_else(|e| panic!("failed to parse: {sql}\nerror: {e}"))
}

pub fn parse_err(sql: &str) -> Error {
    Parser::parse(sql).expect_err(&format!("expected parse error for: {sql}"))
}

pub fn parse_select(sql: &str) -> SelectStatement {
    match parse(sql) {
        Statement::Select(s) => s,
        other => panic!("expected SELECT, got {other:?}"),
    }
}

pub fn parse_insert(sql: &str) -> InsertStatement {
    match parse(sql) {
        Statement::Insert(i) => i,
        other => panic!("expected INSERT, got {other:?}"),
    }
}

pub fn parse_update(sql: &str) -> UpdateStatement {
    match parse(sql) {
        Statement::Update(u) => u,
        other => panic!("expected UPDATE, got {other:?}"),
    }
}

pub fn parse_create(sql: &str) -> CreateTableStatement {
    match parse(sql) {
        Statement::CreateTable(c) => c,
        other => panic!("expected CREATE TABLE, got {other:?}"),
    }
}

pub fn resolve(sql: &str) -> ResolvedQuery {
    resolve_query_document(&schema(), "query", sql)
        .unwrap_or_else(|e| panic!("failed to resolve: {sql}\nerror: {e}"))
}

pub fn resolve_err(sql: &str) -> Error {
    resolve_query_document(&schema(), "query", sql)
        .expect_err(&format!("expected resolve error for: {sql}"))
}

/// Verifies that rendering is a fixed point of the parser: parse(sql)
/// renders to a string that re-parses and renders identically.
pub fn round_trip(sql: &str) {
    let first = parse(sql).to_string();
    let second = parse(&first).to_string();
    assert_eq!(
        first, second,
        "round-trip failed.\n  input:  {sql}\n  first:  {first}\n  second: {second}"
    );
}
