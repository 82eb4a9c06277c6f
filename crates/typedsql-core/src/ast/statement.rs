//! SQL statement AST types.

use crate::lexer::Cursor;

use super::ddl::TableItem;
use super::expression::{ColumnRef, Expr};
use super::ident::Ident;

/// A possibly schema-qualified table name.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRef {
    /// Schema qualifier, if written.
    pub schema: Option<Ident>,
    /// The table name.
    pub name: Ident,
    /// Position of the first part of the reference.
    pub cursor: Cursor,
}

/// A table expression in a FROM clause: a table, an aliased table, or a
/// left-leaning chain of LEFT JOINs.
#[derive(Debug, Clone, PartialEq)]
pub enum TableExpr {
    /// A plain table reference.
    Table(TableRef),
    /// `table AS alias` (or `table alias`).
    Alias {
        /// The underlying table.
        table: TableRef,
        /// The binding name.
        alias: Ident,
    },
    /// `left LEFT JOIN right ON condition`.
    LeftJoin {
        /// Everything joined so far.
        left: Box<TableExpr>,
        /// The newly joined side; its columns become nullable.
        right: Box<TableExpr>,
        /// The ON condition.
        condition: Expr,
    },
}

impl TableExpr {
    /// The source position of the expression (its leftmost table).
    #[must_use]
    pub fn cursor(&self) -> Cursor {
        match self {
            Self::Table(table) => table.cursor,
            Self::Alias { table, .. } => table.cursor,
            Self::LeftJoin { left, .. } => left.cursor(),
        }
    }
}

/// One item of a SELECT list.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
    /// `*`.
    All {
        /// Source position of the star.
        cursor: Cursor,
    },
    /// `table.*` or `schema.table.*`.
    AllFromTable {
        /// Schema qualifier, if written.
        schema: Option<Ident>,
        /// The table or alias whose columns are selected.
        table: Ident,
        /// Source position of the reference.
        cursor: Cursor,
    },
    /// A column reference.
    Column(ColumnRef),
    /// A column reference renamed with `AS`.
    ColumnAlias {
        /// The column being selected.
        column: ColumnRef,
        /// The output name.
        alias: Ident,
    },
}

/// A `SELECT` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    /// The select list, in output order.
    pub items: Vec<SelectItem>,
    /// The FROM entries; comma-separated entries are independent trees.
    pub from: Vec<TableExpr>,
    /// The WHERE predicate, if any.
    pub where_clause: Option<Expr>,
}

/// An `INSERT INTO` statement with one or more VALUES rows.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    /// The target table.
    pub table: TableRef,
    /// The explicit column list, if written.
    pub columns: Option<Vec<Ident>>,
    /// The VALUES rows.
    pub rows: Vec<Vec<Expr>>,
}

/// One `column = expr` assignment of an UPDATE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// The assigned column.
    pub column: Ident,
    /// The new value.
    pub value: Expr,
}

/// An `UPDATE` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    /// The target table.
    pub table: TableRef,
    /// The binding alias, if written.
    pub alias: Option<Ident>,
    /// The SET assignments, in order.
    pub assignments: Vec<Assignment>,
    /// The WHERE predicate, if any.
    pub where_clause: Option<Expr>,
}

/// A `CREATE TABLE` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableStatement {
    /// The declared table.
    pub table: TableRef,
    /// Column definitions and table constraints, in declaration order.
    pub items: Vec<TableItem>,
}

/// An `ALTER TABLE` statement. Only the table name is parsed; alterations
/// themselves are not modeled.
#[derive(Debug, Clone, PartialEq)]
pub struct AlterTableStatement {
    /// The altered table.
    pub table: TableRef,
}

/// A SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// SELECT statement.
    Select(SelectStatement),
    /// INSERT statement.
    Insert(InsertStatement),
    /// UPDATE statement.
    Update(UpdateStatement),
    /// CREATE TABLE statement.
    CreateTable(CreateTableStatement),
    /// ALTER TABLE statement (stub).
    AlterTable(AlterTableStatement),
    /// An empty statement (a document segment with no tokens).
    Empty,
}

impl Statement {
    /// Returns true for the empty no-op statement.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// A representative source position for diagnostics, where one exists.
    #[must_use]
    pub fn cursor(&self) -> Option<Cursor> {
        match self {
            Self::Select(select) => select.from.first().map(TableExpr::cursor),
            Self::Insert(insert) => Some(insert.table.cursor),
            Self::Update(update) => Some(update.table.cursor),
            Self::CreateTable(create) => Some(create.table.cursor),
            Self::AlterTable(alter) => Some(alter.table.cursor),
            Self::Empty => None,
        }
    }
}
