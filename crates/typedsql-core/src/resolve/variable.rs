//! Variable collection and type inference.
//!
//! Walks a statement's expressions, visiting every named and indexed
//! variable in traversal order. A variable's type comes from the opposite
//! operand of the smallest binary operation enclosing it (a column's type,
//! looked up in the tables in scope), or from the addressed column in
//! INSERT value lists and UPDATE assignments. The same name or position
//! seen twice is one logical variable and must stay type-compatible.

use core::fmt;

use serde::Serialize;

use crate::ast::{Expr, SimpleType, SqlType};
use crate::error::{Error, Result};
use crate::lexer::Cursor;

use super::column::lookup_column;
use super::table::ResolvedTable;

/// The identity of a variable: its name, or its 1-based position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum VariableKey {
    /// A `:name` variable.
    Named(String),
    /// A `$n` variable.
    Indexed(u32),
}

impl fmt::Display for VariableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, ":{name}"),
            Self::Indexed(position) => write!(f, "${position}"),
        }
    }
}

/// One distinct variable of a query, with its inferred type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableResolved {
    /// The variable's identity.
    pub key: VariableKey,
    /// The inferred type.
    #[serde(rename = "type")]
    pub data_type: SqlType,
    /// Mirrors the nullability of the column the variable is compared or
    /// assigned against.
    pub nullable: bool,
    /// How many places reference the variable (diagnostic only).
    pub occurrences: u32,
}

struct PendingVariable {
    key: VariableKey,
    data_type: Option<SqlType>,
    nullable: bool,
    occurrences: u32,
    first_seen: Cursor,
}

/// Accumulates variables across a statement walk, unifying repeated
/// occurrences in first-seen order.
pub(crate) struct VariableCollector<'t> {
    tables: &'t [ResolvedTable],
    variables: Vec<PendingVariable>,
}

impl<'t> VariableCollector<'t> {
    pub(crate) const fn new(tables: &'t [ResolvedTable]) -> Self {
        Self {
            tables,
            variables: Vec::new(),
        }
    }

    /// Finishes the walk; every variable must have a type by now.
    pub(crate) fn finish(self) -> Result<Vec<VariableResolved>> {
        self.variables
            .into_iter()
            .map(|pending| match pending.data_type {
                Some(data_type) => Ok(VariableResolved {
                    key: pending.key,
                    data_type,
                    nullable: pending.nullable,
                    occurrences: pending.occurrences,
                }),
                None => Err(Error::UnresolvedVariableType {
                    variable: pending.key.to_string(),
                    cursor: pending.first_seen,
                }),
            })
            .collect()
    }

    /// Records one occurrence of a variable, with the type its context
    /// inferred (if any), unifying with earlier occurrences.
    fn record(
        &mut self,
        key: VariableKey,
        cursor: Cursor,
        inferred: Option<(SqlType, bool)>,
    ) -> Result<()> {
        if let Some(existing) = self.variables.iter_mut().find(|v| v.key == key) {
            existing.occurrences += 1;
            if let Some((data_type, nullable)) = inferred {
                match existing.data_type {
                    Some(previous) if !previous.is_compatible_with(data_type) => {
                        return Err(Error::VariableTypeConflict {
                            variable: key.to_string(),
                            first: previous,
                            second: data_type,
                            cursor,
                        });
                    }
                    Some(_) => {}
                    None => {
                        existing.data_type = Some(data_type);
                        existing.nullable = nullable;
                    }
                }
            }
            return Ok(());
        }

        let (data_type, nullable) = match inferred {
            Some((data_type, nullable)) => (Some(data_type), nullable),
            None => (None, false),
        };
        self.variables.push(PendingVariable {
            key,
            data_type,
            nullable,
            occurrences: 1,
            first_seen: cursor,
        });
        Ok(())
    }

    /// Walks an expression tree, inferring types for every variable that
    /// sits directly under a binary operation.
    pub(crate) fn walk_expr(&mut self, expr: &Expr) -> Result<()> {
        match expr {
            Expr::Bool { left, right, .. } => {
                // A variable used directly as a boolean operand must be a
                // boolean itself.
                let bool_type = Some((SqlType::Simple(SimpleType::Bool), false));
                self.walk_operand(left, bool_type)?;
                self.walk_operand(right, bool_type)
            }
            Expr::Compare { left, right, .. } | Expr::Arith { left, right, .. } => {
                let left_inferred = if left.is_variable() {
                    self.operand_type(right)?
                } else {
                    None
                };
                self.walk_operand(left, left_inferred)?;
                let right_inferred = if right.is_variable() {
                    self.operand_type(left)?
                } else {
                    None
                };
                self.walk_operand(right, right_inferred)
            }
            Expr::Case {
                operand,
                whens,
                else_clause,
            } => {
                if let Some(operand) = operand {
                    self.walk_expr(operand)?;
                }
                for when in whens {
                    self.walk_expr(&when.condition)?;
                    self.walk_expr(&when.then)?;
                }
                if let Some(else_clause) = else_clause {
                    self.walk_expr(else_clause)?;
                }
                Ok(())
            }
            Expr::NamedVariable { .. } | Expr::IndexedVariable { .. } => {
                // No enclosing context; the occurrence is recorded and the
                // type must come from another occurrence.
                self.walk_operand(expr, None)
            }
            Expr::String { .. }
            | Expr::Number { .. }
            | Expr::Boolean { .. }
            | Expr::Null { .. }
            | Expr::Column(_) => Ok(()),
        }
    }

    /// Visits one operand; `inferred` applies only when the operand is
    /// itself a variable, everything else recurses.
    pub(crate) fn walk_operand(
        &mut self,
        expr: &Expr,
        inferred: Option<(SqlType, bool)>,
    ) -> Result<()> {
        match expr {
            Expr::NamedVariable { name, cursor } => {
                self.record(VariableKey::Named(name.clone()), *cursor, inferred)
            }
            Expr::IndexedVariable { position, cursor } => {
                self.record(VariableKey::Indexed(*position), *cursor, inferred)
            }
            _ => self.walk_expr(expr),
        }
    }

    /// The type and join-adjusted nullability of an operand, when the
    /// operand is a column reference; other operand shapes infer nothing.
    fn operand_type(&self, expr: &Expr) -> Result<Option<(SqlType, bool)>> {
        match expr {
            Expr::Column(column) => {
                let (table, resolved) = lookup_column(self.tables, column)?;
                Ok(Some((resolved.data_type, table.column_nullable(resolved))))
            }
            _ => Ok(None),
        }
    }
}
