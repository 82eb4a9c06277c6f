//! # typedsql-core
//!
//! A schema-validated SQL front-end for typed query generation.
//!
//! The crate turns textual SQL (`CREATE TABLE` declarations plus
//! parameterized `SELECT` / `INSERT` / `UPDATE` statements) into a fully
//! typed description of each query: its output columns (name, type,
//! nullability) and its bound variables (name or position, inferred type,
//! nullability). A downstream code printer turns that description into
//! typed accessors; this crate performs no I/O and emits no code.
//!
//! ## Pipeline
//!
//! ```rust
//! use typedsql_core::{resolve_query_document, Schema};
//!
//! let schema = Schema::parse(
//!     "CREATE TABLE users (id serial PRIMARY KEY, name text NOT NULL, email text);",
//! )?;
//! let query = resolve_query_document(
//!     &schema,
//!     "find_user",
//!     "SELECT u.id, u.name FROM users AS u WHERE u.id = $1",
//! )?;
//!
//! let columns = query.columns.as_ref().expect("SELECT has columns");
//! assert_eq!(columns.len(), 2);
//! assert!(!columns[0].nullable);
//! assert_eq!(query.variables.len(), 1);
//! # Ok::<(), typedsql_core::Error>(())
//! ```
//!
//! A [`Schema`] is built once per run and is immutable afterwards; sharing
//! it by reference across threads is safe, and resolving many query
//! documents in parallel needs no coordination beyond that shared
//! reference.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod registry;
pub mod resolve;
pub mod schema;

pub use ast::{SqlType, Statement};
pub use error::{Error, Result};
pub use lexer::{Cursor, Token, TokenKind, TokenStream};
pub use parser::Parser;
pub use resolve::{
    parse_query_document, resolve_query, resolve_query_document, ColumnResolved, QueryKind,
    ResolvedQuery, VariableKey, VariableResolved,
};
pub use schema::Schema;
