//! Abstract syntax tree for the supported SQL subset.
//!
//! Every node family is a closed enum; consumers match exhaustively.
//! Nodes are immutable once constructed and carry a [`crate::lexer::Cursor`]
//! where diagnostics need one.

mod ddl;
mod display;
mod expression;
mod ident;
mod statement;

pub use ddl::{
    ColumnDef, Constraint, NumericType, PrimaryKeyTableConstraint, SimpleType, SizedType, SqlType,
    TableItem, TypeFamily,
};
pub use expression::{ArithOp, BoolOp, ColumnRef, CompareOp, Expr, When};
pub use ident::Ident;
pub use statement::{
    AlterTableStatement, Assignment, CreateTableStatement, InsertStatement, SelectItem,
    SelectStatement, Statement, TableExpr, TableRef, UpdateStatement,
};
