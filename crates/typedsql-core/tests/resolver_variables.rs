//! Tests for variable collection and type inference across SELECT,
//! INSERT, and UPDATE statements.

mod common;
use common::*;

use typedsql_core::ast::{NumericType, SimpleType, SqlType};
use typedsql_core::{Error, VariableKey};

#[test]
fn variable_infers_type_from_opposite_column() {
    let query = resolve("SELECT id FROM users WHERE id = $1");
    assert_eq!(query.variables.len(), 1);
    let variable = &query.variables[0];
    assert_eq!(variable.key, VariableKey::Indexed(1));
    assert_eq!(variable.data_type, SqlType::Simple(SimpleType::Int));
    assert!(!variable.nullable);
    assert_eq!(variable.occurrences, 1);
}

#[test]
fn variable_on_the_left_infers_from_the_right() {
    let query = resolve("SELECT id FROM users WHERE :name = name");
    let variable = &query.variables[0];
    assert_eq!(variable.key, VariableKey::Named(String::from("name")));
    assert_eq!(variable.data_type, SqlType::Simple(SimpleType::Text));
}

#[test]
fn repeated_variable_unifies_with_occurrence_count() {
    let query = resolve("SELECT id FROM users WHERE name = :v AND email = :v");
    assert_eq!(query.variables.len(), 1);
    let variable = &query.variables[0];
    assert_eq!(variable.occurrences, 2);
    assert_eq!(variable.data_type, SqlType::Simple(SimpleType::Text));
}

#[test]
fn conflicting_inferences_fail() {
    let err = resolve_err("SELECT id FROM users WHERE id = :v AND name = :v");
    let Error::VariableTypeConflict {
        variable,
        first,
        second,
        ..
    } = err
    else {
        panic!("expected type conflict, got {err:?}");
    };
    assert_eq!(variable, ":v");
    assert_eq!(first, SqlType::Simple(SimpleType::Int));
    assert_eq!(second, SqlType::Simple(SimpleType::Text));
}

#[test]
fn variable_without_context_fails() {
    let err = resolve_err("SELECT id FROM users WHERE :a = :b");
    assert!(matches!(err, Error::UnresolvedVariableType { variable, .. } if variable == ":a"));
}

#[test]
fn variables_keep_first_occurrence_order() {
    let query =
        resolve("SELECT id FROM users WHERE name = :second AND id = $1 AND email = :second");
    let keys: Vec<String> = query.variables.iter().map(|v| v.key.to_string()).collect();
    assert_eq!(keys, vec![":second", "$1"]);
}

#[test]
fn variable_nullability_mirrors_the_compared_column() {
    let query = resolve("SELECT id FROM users WHERE email = :email AND name = :name");
    let email = &query.variables[0];
    assert!(email.nullable);
    let name = &query.variables[1];
    assert!(!name.nullable);
}

#[test]
fn variable_in_join_condition_is_typed() {
    let query = resolve(
        "SELECT u.id FROM users u LEFT JOIN orders o ON o.user_id = u.id WHERE o.total = :total",
    );
    let variable = &query.variables[0];
    assert_eq!(
        variable.data_type,
        SqlType::Numeric {
            base: NumericType::Numeric,
            precision_scale: Some((10, 2))
        }
    );
    // orders is the join's inner side, so the compared column is nullable.
    assert!(variable.nullable);
}

#[test]
fn variable_nested_in_arithmetic_infers_from_sibling_column() {
    let query = resolve("SELECT id FROM orders WHERE total = total + :delta");
    let variable = &query.variables[0];
    assert_eq!(variable.key, VariableKey::Named(String::from("delta")));
    assert_eq!(
        variable.data_type,
        SqlType::Numeric {
            base: NumericType::Numeric,
            precision_scale: Some((10, 2))
        }
    );
}

#[test]
fn insert_variables_take_the_addressed_column_type() {
    let query = resolve("INSERT INTO users (name, email) VALUES (:name, :email)");
    assert!(query.columns.is_none());
    assert_eq!(query.variables.len(), 2);
    assert_eq!(query.variables[0].data_type, SqlType::Simple(SimpleType::Text));
    assert!(!query.variables[0].nullable);
    assert!(query.variables[1].nullable);
}

#[test]
fn insert_without_column_list_uses_declaration_order() {
    let query = resolve("INSERT INTO users VALUES ($1, $2, $3)");
    let types: Vec<SqlType> = query.variables.iter().map(|v| v.data_type).collect();
    assert_eq!(
        types,
        vec![
            SqlType::Simple(SimpleType::Int),
            SqlType::Simple(SimpleType::Text),
            SqlType::Simple(SimpleType::Text),
        ]
    );
}

#[test]
fn insert_multi_row_reuses_positions() {
    let query = resolve("INSERT INTO users (name) VALUES (:a), (:b)");
    assert_eq!(query.variables.len(), 2);
    assert!(query
        .variables
        .iter()
        .all(|v| v.data_type == SqlType::Simple(SimpleType::Text)));
}

#[test]
fn insert_into_unknown_column_fails() {
    let err = resolve_err("INSERT INTO users (nickname) VALUES (:n)");
    assert!(matches!(err, Error::UnknownColumn { column, .. } if column == "nickname"));
}

#[test]
fn update_assignment_types_its_variable() {
    let query = resolve("UPDATE users SET email = :email WHERE id = $1");
    assert_eq!(query.variables.len(), 2);
    let email = &query.variables[0];
    assert_eq!(email.key, VariableKey::Named(String::from("email")));
    assert_eq!(email.data_type, SqlType::Simple(SimpleType::Text));
    assert!(email.nullable);
    let id = &query.variables[1];
    assert_eq!(id.key, VariableKey::Indexed(1));
    assert_eq!(id.data_type, SqlType::Simple(SimpleType::Int));
}

#[test]
fn update_where_sees_the_table_alias() {
    let query = resolve("UPDATE users AS u SET name = :name WHERE u.id = $1");
    assert_eq!(query.variables.len(), 2);
    assert_eq!(
        query.variables[1].data_type,
        SqlType::Simple(SimpleType::Int)
    );
}

#[test]
fn update_of_unknown_column_fails() {
    let err = resolve_err("UPDATE users SET nickname = :n");
    assert!(matches!(err, Error::UnknownColumn { column, .. } if column == "nickname"));
}

#[test]
fn boolean_operand_variable_is_a_bool() {
    let query = resolve("SELECT id FROM users WHERE :active AND id = $1");
    let active = &query.variables[0];
    assert_eq!(active.data_type, SqlType::Simple(SimpleType::Bool));
}
