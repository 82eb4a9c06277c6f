//! Binding-power tables for operator-precedence expression parsing.
//!
//! Precedence, loosest to tightest: `OR` < `AND` < comparisons < `+ -`
//! < `* /`. Every binary operator is left-associative (the left binding
//! power is below the right one).

use crate::ast::{ArithOp, BoolOp, CompareOp};

/// A binary operator, tagged by family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// AND / OR.
    Bool(BoolOp),
    /// Comparisons.
    Compare(CompareOp),
    /// Arithmetic.
    Arith(ArithOp),
}

/// Returns `(left, right)` binding power; higher binds tighter.
#[must_use]
pub const fn binding_power(op: BinaryOperator) -> (u8, u8) {
    match op {
        BinaryOperator::Bool(BoolOp::Or) => (1, 2),
        BinaryOperator::Bool(BoolOp::And) => (3, 4),
        BinaryOperator::Compare(_) => (5, 6),
        BinaryOperator::Arith(ArithOp::Add | ArithOp::Sub) => (7, 8),
        BinaryOperator::Arith(ArithOp::Mul | ArithOp::Div) => (9, 10),
    }
}

/// Maps an operator symbol token to its operator. `*` is not listed here:
/// the star token is context-sensitive and the parser decides whether it is
/// a wildcard or multiplication.
#[must_use]
pub fn operator_from_symbol(symbol: &str) -> Option<BinaryOperator> {
    match symbol {
        "=" => Some(BinaryOperator::Compare(CompareOp::Eq)),
        "<>" => Some(BinaryOperator::Compare(CompareOp::NotEq)),
        "<" => Some(BinaryOperator::Compare(CompareOp::Lt)),
        "<=" => Some(BinaryOperator::Compare(CompareOp::LtEq)),
        ">" => Some(BinaryOperator::Compare(CompareOp::Gt)),
        ">=" => Some(BinaryOperator::Compare(CompareOp::GtEq)),
        "+" => Some(BinaryOperator::Arith(ArithOp::Add)),
        "-" => Some(BinaryOperator::Arith(ArithOp::Sub)),
        "/" => Some(BinaryOperator::Arith(ArithOp::Div)),
        _ => None,
    }
}
