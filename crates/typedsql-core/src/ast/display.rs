//! Rendering of AST nodes back to parameterized SQL text.
//!
//! The output is a fixed point of the parser: parsing the rendered text
//! yields a tree that renders to the same text again. Parentheses are
//! reinserted from operator precedence rather than kept from the source.

use core::fmt;

use crate::lexer::NumberValue;

use super::ddl::{ColumnDef, Constraint, PrimaryKeyTableConstraint, TableItem};
use super::expression::{ArithOp, BoolOp, ColumnRef, Expr};
use super::statement::{
    AlterTableStatement, CreateTableStatement, InsertStatement, SelectItem, SelectStatement,
    Statement, TableExpr, TableRef, UpdateStatement,
};

fn write_separated<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    separator: &str,
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Binding strength used to decide where parentheses are required;
/// higher binds tighter. Atoms are tighter than any operator.
const fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Bool { op: BoolOp::Or, .. } => 1,
        Expr::Bool { op: BoolOp::And, .. } => 2,
        Expr::Compare { .. } => 3,
        Expr::Arith {
            op: ArithOp::Add | ArithOp::Sub,
            ..
        } => 4,
        Expr::Arith {
            op: ArithOp::Mul | ArithOp::Div,
            ..
        } => 5,
        _ => u8::MAX,
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, operand: &Expr, parenthesize: bool) -> fmt::Result {
    if parenthesize {
        write!(f, "({operand})")
    } else {
        write!(f, "{operand}")
    }
}

fn write_binary(
    f: &mut fmt::Formatter<'_>,
    parent: u8,
    left: &Expr,
    op: &str,
    right: &Expr,
) -> fmt::Result {
    // Left-associative grammar: the left child may share the parent's
    // precedence, the right child must bind strictly tighter.
    write_operand(f, left, precedence(left) < parent)?;
    write!(f, " {op} ")?;
    write_operand(f, right, precedence(right) <= parent)
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String { value, .. } => write!(f, "'{}'", value.replace('\'', "''")),
            Self::Number { value, .. } => match value {
                NumberValue::Integer(n) => write!(f, "{n}"),
                NumberValue::Float(x) => write!(f, "{x}"),
            },
            Self::Boolean { value, .. } => f.write_str(if *value { "TRUE" } else { "FALSE" }),
            Self::Null { .. } => f.write_str("NULL"),
            Self::NamedVariable { name, .. } => write!(f, ":{name}"),
            Self::IndexedVariable { position, .. } => write!(f, "${position}"),
            Self::Column(column) => write!(f, "{column}"),
            Self::Bool { left, op, right } => {
                write_binary(f, precedence(self), left, op.as_str(), right)
            }
            Self::Compare { left, op, right } => {
                write_binary(f, precedence(self), left, op.as_str(), right)
            }
            Self::Arith { left, op, right } => {
                write_binary(f, precedence(self), left, op.as_str(), right)
            }
            Self::Case {
                operand,
                whens,
                else_clause,
            } => {
                f.write_str("CASE")?;
                if let Some(term) = operand {
                    write!(f, " {term}")?;
                }
                for when in whens {
                    write!(f, " WHEN {} THEN {}", when.condition, when.then)?;
                }
                if let Some(else_clause) = else_clause {
                    write!(f, " ELSE {else_clause}")?;
                }
                f.write_str(" END")
            }
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(schema) = &self.schema {
            write!(f, "{schema}.")?;
        }
        if let Some(table) = &self.table {
            write!(f, "{table}.")?;
        }
        write!(f, "{}", self.column)
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(schema) = &self.schema {
            write!(f, "{schema}.")?;
        }
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for TableExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table(table) => write!(f, "{table}"),
            Self::Alias { table, alias } => write!(f, "{table} AS {alias}"),
            Self::LeftJoin {
                left,
                right,
                condition,
            } => write!(f, "{left} LEFT JOIN {right} ON {condition}"),
        }
    }
}

impl fmt::Display for SelectItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All { .. } => f.write_str("*"),
            Self::AllFromTable { schema, table, .. } => {
                if let Some(schema) = schema {
                    write!(f, "{schema}.")?;
                }
                write!(f, "{table}.*")
            }
            Self::Column(column) => write!(f, "{column}"),
            Self::ColumnAlias { column, alias } => write!(f, "{column} AS {alias}"),
        }
    }
}

impl fmt::Display for SelectStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SELECT ")?;
        write_separated(f, &self.items, ", ")?;
        f.write_str(" FROM ")?;
        write_separated(f, &self.from, ", ")?;
        if let Some(where_clause) = &self.where_clause {
            write!(f, " WHERE {where_clause}")?;
        }
        Ok(())
    }
}

impl fmt::Display for InsertStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "INSERT INTO {}", self.table)?;
        if let Some(columns) = &self.columns {
            f.write_str(" (")?;
            write_separated(f, columns, ", ")?;
            f.write_str(")")?;
        }
        f.write_str(" VALUES ")?;
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str("(")?;
            write_separated(f, row, ", ")?;
            f.write_str(")")?;
        }
        Ok(())
    }
}

impl fmt::Display for UpdateStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UPDATE {}", self.table)?;
        if let Some(alias) = &self.alias {
            write!(f, " AS {alias}")?;
        }
        f.write_str(" SET ")?;
        for (i, assignment) in self.assignments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} = {}", assignment.column, assignment.value)?;
        }
        if let Some(where_clause) = &self.where_clause {
            write!(f, " WHERE {where_clause}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotNull => f.write_str("NOT NULL"),
            Self::PrimaryKey => f.write_str("PRIMARY KEY"),
            Self::Unique => f.write_str("UNIQUE"),
            Self::Reference(target) => {
                f.write_str("REFERENCES ")?;
                if let Some(schema) = &target.schema {
                    write!(f, "{schema}.")?;
                }
                if let Some(table) = &target.table {
                    write!(f, "{table}")?;
                }
                write!(f, "({})", target.column)
            }
        }
    }
}

impl fmt::Display for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.data_type)?;
        for constraint in &self.constraints {
            write!(f, " {constraint}")?;
        }
        Ok(())
    }
}

impl fmt::Display for PrimaryKeyTableConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PRIMARY KEY (")?;
        write_separated(f, &self.columns, ", ")?;
        f.write_str(")")
    }
}

impl fmt::Display for TableItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(column) => write!(f, "{column}"),
            Self::PrimaryKey(pk) => write!(f, "{pk}"),
        }
    }
}

impl fmt::Display for CreateTableStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CREATE TABLE {} (", self.table)?;
        write_separated(f, &self.items, ", ")?;
        f.write_str(")")
    }
}

impl fmt::Display for AlterTableStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ALTER TABLE {}", self.table)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select(select) => write!(f, "{select}"),
            Self::Insert(insert) => write!(f, "{insert}"),
            Self::Update(update) => write!(f, "{update}"),
            Self::CreateTable(create) => write!(f, "{create}"),
            Self::AlterTable(alter) => write!(f, "{alter}"),
            Self::Empty => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{ArithOp, BoolOp, CompareOp, Ident};
    use crate::lexer::Cursor;

    use super::*;

    fn column(name: &str) -> Expr {
        Expr::Column(ColumnRef {
            schema: None,
            table: None,
            column: Ident::new(name, Cursor::start()),
            cursor: Cursor::start(),
        })
    }

    fn number(n: i64) -> Expr {
        Expr::Number {
            value: NumberValue::Integer(n),
            cursor: Cursor::start(),
        }
    }

    #[test]
    fn test_precedence_inserts_parens_only_where_needed() {
        // a + b * 2 keeps its shape without parentheses.
        let tight_right = Expr::Arith {
            left: Box::new(column("a")),
            op: ArithOp::Add,
            right: Box::new(Expr::Arith {
                left: Box::new(column("b")),
                op: ArithOp::Mul,
                right: Box::new(number(2)),
            }),
        };
        assert_eq!(tight_right.to_string(), "a + b * 2");

        // (a + b) * 2 needs them back.
        let loose_left = Expr::Arith {
            left: Box::new(Expr::Arith {
                left: Box::new(column("a")),
                op: ArithOp::Add,
                right: Box::new(column("b")),
            }),
            op: ArithOp::Mul,
            right: Box::new(number(2)),
        };
        assert_eq!(loose_left.to_string(), "(a + b) * 2");
    }

    #[test]
    fn test_boolean_comparison_nesting() {
        let expr = Expr::Bool {
            left: Box::new(Expr::Compare {
                left: Box::new(column("a")),
                op: CompareOp::Eq,
                right: Box::new(number(1)),
            }),
            op: BoolOp::And,
            right: Box::new(Expr::Compare {
                left: Box::new(column("b")),
                op: CompareOp::GtEq,
                right: Box::new(number(2)),
            }),
        };
        assert_eq!(expr.to_string(), "a = 1 AND b >= 2");
    }

    #[test]
    fn test_string_escaping() {
        let expr = Expr::String {
            value: String::from("it's"),
            cursor: Cursor::start(),
        };
        assert_eq!(expr.to_string(), "'it''s'");
    }
}
