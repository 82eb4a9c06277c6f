//! Expression AST types.

use crate::lexer::{Cursor, NumberValue};

use super::ident::Ident;

/// Boolean connectives, the loosest-binding operator family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    /// AND.
    And,
    /// OR.
    Or,
}

impl BoolOp {
    /// Returns the SQL spelling of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `=`.
    Eq,
    /// `<>`.
    NotEq,
    /// `<`.
    Lt,
    /// `<=`.
    LtEq,
    /// `>`.
    Gt,
    /// `>=`.
    GtEq,
}

impl CompareOp {
    /// Returns the SQL spelling of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
        }
    }
}

/// Value (arithmetic) operators, the tightest-binding family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    /// `+`.
    Add,
    /// `-`.
    Sub,
    /// `*`.
    Mul,
    /// `/`.
    Div,
}

impl ArithOp {
    /// Returns the SQL spelling of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }
}

/// A possibly qualified column reference (`column`, `table.column`, or
/// `schema.table.column`).
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRef {
    /// Schema qualifier, if written.
    pub schema: Option<Ident>,
    /// Table or alias qualifier, if written.
    pub table: Option<Ident>,
    /// The column name.
    pub column: Ident,
    /// Position of the first part of the reference.
    pub cursor: Cursor,
}

/// One `WHEN condition THEN result` branch of a CASE expression.
#[derive(Debug, Clone, PartialEq)]
pub struct When {
    /// The branch condition (or comparison value in operand form).
    pub condition: Expr,
    /// The branch result.
    pub then: Expr,
}

/// An SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// String literal.
    String {
        /// The literal value, unescaped.
        value: String,
        /// Source position.
        cursor: Cursor,
    },
    /// Numeric literal.
    Number {
        /// The literal value.
        value: NumberValue,
        /// Source position.
        cursor: Cursor,
    },
    /// TRUE or FALSE.
    Boolean {
        /// The literal value.
        value: bool,
        /// Source position.
        cursor: Cursor,
    },
    /// NULL.
    Null {
        /// Source position.
        cursor: Cursor,
    },
    /// Named variable `:name`.
    NamedVariable {
        /// The variable name.
        name: String,
        /// Source position.
        cursor: Cursor,
    },
    /// Indexed variable `$n`.
    IndexedVariable {
        /// The 1-based position.
        position: u32,
        /// Source position.
        cursor: Cursor,
    },
    /// A column reference.
    Column(ColumnRef),
    /// A boolean operation (AND / OR).
    Bool {
        /// Left operand.
        left: Box<Expr>,
        /// Operator.
        op: BoolOp,
        /// Right operand.
        right: Box<Expr>,
    },
    /// A comparison.
    Compare {
        /// Left operand.
        left: Box<Expr>,
        /// Operator.
        op: CompareOp,
        /// Right operand.
        right: Box<Expr>,
    },
    /// A value operation (arithmetic).
    Arith {
        /// Left operand.
        left: Box<Expr>,
        /// Operator.
        op: ArithOp,
        /// Right operand.
        right: Box<Expr>,
    },
    /// A CASE expression, with or without a leading operand.
    Case {
        /// The operand of a simple CASE, absent in the searched form.
        operand: Option<Box<Expr>>,
        /// The WHEN branches, in order.
        whens: Vec<When>,
        /// The ELSE result, if any.
        else_clause: Option<Box<Expr>>,
    },
}

impl Expr {
    /// The source position of the expression (its leftmost node).
    #[must_use]
    pub fn cursor(&self) -> Cursor {
        match self {
            Self::String { cursor, .. }
            | Self::Number { cursor, .. }
            | Self::Boolean { cursor, .. }
            | Self::Null { cursor }
            | Self::NamedVariable { cursor, .. }
            | Self::IndexedVariable { cursor, .. } => *cursor,
            Self::Column(column) => column.cursor,
            Self::Bool { left, .. } | Self::Compare { left, .. } | Self::Arith { left, .. } => {
                left.cursor()
            }
            Self::Case {
                operand, whens, ..
            } => operand.as_ref().map_or_else(
                || whens.first().map_or_else(Cursor::start, |w| w.condition.cursor()),
                |term| term.cursor(),
            ),
        }
    }

    /// Whether the expression is a named or indexed variable.
    #[must_use]
    pub const fn is_variable(&self) -> bool {
        matches!(
            self,
            Self::NamedVariable { .. } | Self::IndexedVariable { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_of_binary_is_leftmost() {
        let expr = Expr::Compare {
            left: Box::new(Expr::Number {
                value: NumberValue::Integer(1),
                cursor: Cursor::new(2, 5),
            }),
            op: CompareOp::Eq,
            right: Box::new(Expr::Null {
                cursor: Cursor::new(2, 9),
            }),
        };
        assert_eq!(expr.cursor(), Cursor::new(2, 5));
    }

    #[test]
    fn test_is_variable() {
        let var = Expr::IndexedVariable {
            position: 1,
            cursor: Cursor::start(),
        };
        assert!(var.is_variable());
        assert!(!Expr::Null { cursor: Cursor::start() }.is_variable());
    }
}
