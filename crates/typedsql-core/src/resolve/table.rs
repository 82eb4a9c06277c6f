//! FROM-clause resolution: binding table expressions to schema tables and
//! propagating LEFT JOIN nullability.

use tracing::trace;

use crate::ast::{Ident, SqlType, TableExpr, TableRef};
use crate::error::{Error, Result};
use crate::schema::Schema;

/// One column of a table in scope, with its schema-declared nullability.
/// Join-induced nullability lives on the owning [`ResolvedTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTableColumn {
    /// The column name.
    pub name: Ident,
    /// The column type.
    pub data_type: SqlType,
    /// The schema-declared nullability, before join adjustment.
    pub nullable_base: bool,
}

/// A table in scope for one query: the alias its columns are visible
/// under, the schema table it came from, and whether a LEFT JOIN forced
/// all of its columns nullable.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTable {
    /// The visible binding name (the alias, or the table name itself).
    pub alias: Ident,
    /// The name of the schema table backing this binding.
    pub source: Ident,
    /// The columns, in declaration order.
    pub columns: Vec<ResolvedTableColumn>,
    /// True when the table sits on the inner side of a LEFT JOIN; every
    /// column is then nullable regardless of its declaration. Once set it
    /// is never cleared, so the rule holds transitively through join
    /// chains.
    pub nullable_override: bool,
}

impl ResolvedTable {
    /// Finds a column by identifier.
    #[must_use]
    pub fn column(&self, name: &Ident) -> Option<&ResolvedTableColumn> {
        self.columns.iter().find(|c| c.name.matches(name))
    }

    /// The join-adjusted nullability of one of this table's columns.
    #[must_use]
    pub const fn column_nullable(&self, column: &ResolvedTableColumn) -> bool {
        column.nullable_base || self.nullable_override
    }
}

/// Resolves a query's FROM entries against the schema.
///
/// The result preserves FROM-clause left-to-right order; that order
/// drives both `*` expansion and unqualified-name resolution. Comma
/// separated entries resolve independently, but share one alias scope.
///
/// # Errors
///
/// Fails with [`Error::UnknownTable`] for a table the schema does not
/// know and [`Error::DuplicateAlias`] when one binding name is used
/// twice.
pub fn resolve_from(schema: &Schema, from: &[TableExpr]) -> Result<Vec<ResolvedTable>> {
    let mut tables = Vec::new();
    for entry in from {
        resolve_entry(schema, entry, &mut tables)?;
    }

    for (i, table) in tables.iter().enumerate() {
        if tables[..i].iter().any(|prev| prev.alias.matches(&table.alias)) {
            return Err(Error::DuplicateAlias {
                alias: table.alias.value.clone(),
                cursor: table.alias.cursor,
            });
        }
    }

    Ok(tables)
}

fn resolve_entry(
    schema: &Schema,
    expr: &TableExpr,
    out: &mut Vec<ResolvedTable>,
) -> Result<()> {
    match expr {
        TableExpr::Table(table) => {
            out.push(resolve_table(schema, table, None)?);
            Ok(())
        }
        TableExpr::Alias { table, alias } => {
            out.push(resolve_table(schema, table, Some(alias))?);
            Ok(())
        }
        TableExpr::LeftJoin { left, right, .. } => {
            resolve_entry(schema, left, out)?;
            let right_start = out.len();
            resolve_entry(schema, right, out)?;
            // Everything the join brought in on its right side becomes
            // nullable, including tables already marked by an inner join
            // chain.
            for table in &mut out[right_start..] {
                table.nullable_override = true;
            }
            Ok(())
        }
    }
}

fn resolve_table(
    schema: &Schema,
    table: &TableRef,
    alias: Option<&Ident>,
) -> Result<ResolvedTable> {
    let Some(found) = schema.table(&table.name) else {
        return Err(Error::UnknownTable {
            table: table.name.value.clone(),
            cursor: table.cursor,
        });
    };
    trace!(table = %found.name.value, alias = alias.map(|a| a.value.as_str()), "table in scope");

    Ok(ResolvedTable {
        alias: alias.cloned().unwrap_or_else(|| table.name.clone()),
        source: found.name.clone(),
        columns: found
            .columns
            .iter()
            .map(|column| ResolvedTableColumn {
                name: column.name.clone(),
                data_type: column.data_type,
                nullable_base: column.nullable,
            })
            .collect(),
        nullable_override: false,
    })
}
