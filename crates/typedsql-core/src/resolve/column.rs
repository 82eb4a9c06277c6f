//! SELECT-list expansion into concrete, typed output columns.

use serde::Serialize;

use crate::ast::{ColumnRef, Ident, SelectItem, SqlType};
use crate::error::{Error, Result};

use super::table::{ResolvedTable, ResolvedTableColumn};

/// One output column of a SELECT, in select-list order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnResolved {
    /// The alias of the table the column comes from.
    pub table: String,
    /// The column name.
    pub column: String,
    /// The `AS` output name, if one was given.
    pub alias: Option<String>,
    /// The column type.
    #[serde(rename = "type")]
    pub data_type: SqlType,
    /// Join-adjusted nullability.
    pub nullable: bool,
}

/// Expands a SELECT item list against the tables in scope.
///
/// # Errors
///
/// Fails with [`Error::UnknownTable`] for a `table.*` item whose alias is
/// not in scope, [`Error::UnknownColumn`] for a reference matching no
/// table, and [`Error::AmbiguousColumn`] for an unqualified reference
/// matching more than one.
pub fn resolve_select_items(
    tables: &[ResolvedTable],
    items: &[SelectItem],
) -> Result<Vec<ColumnResolved>> {
    let mut columns = Vec::new();
    for item in items {
        match item {
            SelectItem::All { .. } => {
                for table in tables {
                    expand_table(table, &mut columns);
                }
            }
            SelectItem::AllFromTable { table, .. } => {
                let found = tables
                    .iter()
                    .find(|t| t.alias.matches(table))
                    .ok_or_else(|| Error::UnknownTable {
                        table: table.value.clone(),
                        cursor: table.cursor,
                    })?;
                expand_table(found, &mut columns);
            }
            SelectItem::Column(column) => {
                columns.push(resolve_output_column(tables, column, None)?);
            }
            SelectItem::ColumnAlias { column, alias } => {
                columns.push(resolve_output_column(tables, column, Some(alias))?);
            }
        }
    }
    Ok(columns)
}

fn expand_table(table: &ResolvedTable, out: &mut Vec<ColumnResolved>) {
    for column in &table.columns {
        out.push(ColumnResolved {
            table: table.alias.value.clone(),
            column: column.name.value.clone(),
            alias: None,
            data_type: column.data_type,
            nullable: table.column_nullable(column),
        });
    }
}

fn resolve_output_column(
    tables: &[ResolvedTable],
    column: &ColumnRef,
    alias: Option<&Ident>,
) -> Result<ColumnResolved> {
    let (table, resolved) = lookup_column(tables, column)?;
    Ok(ColumnResolved {
        table: table.alias.value.clone(),
        column: resolved.name.value.clone(),
        alias: alias.map(|a| a.value.clone()),
        data_type: resolved.data_type,
        nullable: table.column_nullable(resolved),
    })
}

/// Finds the table and column a reference points at.
///
/// A qualified reference must name a binding in scope; an unqualified one
/// must match exactly one column across all tables in scope. Shared with
/// the variable resolver, which types variables by their opposite column
/// operand.
pub(crate) fn lookup_column<'t>(
    tables: &'t [ResolvedTable],
    column: &ColumnRef,
) -> Result<(&'t ResolvedTable, &'t ResolvedTableColumn)> {
    if let Some(qualifier) = &column.table {
        let table = tables
            .iter()
            .find(|t| t.alias.matches(qualifier))
            .ok_or_else(|| Error::UnknownTable {
                table: qualifier.value.clone(),
                cursor: column.cursor,
            })?;
        let resolved = table
            .column(&column.column)
            .ok_or_else(|| Error::UnknownColumn {
                column: column.column.value.clone(),
                cursor: column.cursor,
            })?;
        Ok((table, resolved))
    } else {
        let mut matches = tables
            .iter()
            .filter_map(|t| t.column(&column.column).map(|c| (t, c)));
        let Some(first) = matches.next() else {
            return Err(Error::UnknownColumn {
                column: column.column.value.clone(),
                cursor: column.cursor,
            });
        };
        if matches.next().is_some() {
            return Err(Error::AmbiguousColumn {
                column: column.column.value.clone(),
                cursor: column.cursor,
            });
        }
        Ok(first)
    }
}
