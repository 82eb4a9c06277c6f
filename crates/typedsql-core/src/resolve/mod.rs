//! Query resolution: from a parsed statement and a schema to the typed,
//! validated description the code printer consumes.

mod column;
mod table;
mod variable;

use serde::ser::Serializer;
use serde::Serialize;
use tracing::debug;

use crate::ast::{InsertStatement, Statement, TableExpr, UpdateStatement};
use crate::error::{Error, Result};
use crate::parser::Parser;
use crate::schema::{Schema, TableSchema};

pub use column::{resolve_select_items, ColumnResolved};
pub use table::{resolve_from, ResolvedTable, ResolvedTableColumn};
pub use variable::{VariableKey, VariableResolved};

use variable::VariableCollector;

/// The kind of statement a resolved query came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QueryKind {
    /// A SELECT query.
    Select,
    /// An INSERT statement.
    Insert,
    /// An UPDATE statement.
    Update,
}

/// The fully resolved description of one query: its output columns (for
/// SELECT), its typed variables, and the statement itself for
/// serialization back to parameterized SQL text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedQuery {
    /// What kind of statement was resolved.
    pub kind: QueryKind,
    /// The caller-supplied query name.
    pub name: String,
    /// Output columns, present only for SELECT.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<ColumnResolved>>,
    /// Distinct variables in first-occurrence order.
    pub variables: Vec<VariableResolved>,
    /// The resolved statement; serializes as SQL text.
    #[serde(serialize_with = "serialize_statement_sql")]
    pub statement: Statement,
}

fn serialize_statement_sql<S: Serializer>(
    statement: &Statement,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(statement)
}

/// Parses a query document, which must hold exactly one non-empty
/// statement, and that statement must be SELECT, INSERT, or UPDATE.
///
/// # Errors
///
/// Fails with [`Error::InvalidQueryDocument`] on a statement-count or
/// statement-kind violation, or with any parse error from the document.
pub fn parse_query_document(sql: &str) -> Result<Statement> {
    let statements = Parser::new(sql).parse_document()?;

    let mut found: Option<Statement> = None;
    for statement in statements {
        if statement.is_empty() {
            continue;
        }
        if found.is_some() {
            return Err(Error::InvalidQueryDocument {
                reason: String::from("expected exactly one statement, found more"),
                cursor: statement.cursor(),
            });
        }
        found = Some(statement);
    }

    let Some(statement) = found else {
        return Err(Error::InvalidQueryDocument {
            reason: String::from("document contains no statement"),
            cursor: None,
        });
    };

    match statement {
        Statement::Select(_) | Statement::Insert(_) | Statement::Update(_) => Ok(statement),
        other => Err(Error::InvalidQueryDocument {
            reason: String::from("expected a SELECT, INSERT, or UPDATE statement"),
            cursor: other.cursor(),
        }),
    }
}

/// Resolves one query against the schema. `name` is supplied by the
/// caller (the core derives nothing from file names).
///
/// # Errors
///
/// Any resolution error aborts the query; no partial result is returned.
pub fn resolve_query(
    schema: &Schema,
    name: impl Into<String>,
    statement: Statement,
) -> Result<ResolvedQuery> {
    let name = name.into();
    let (kind, columns, variables) = match &statement {
        Statement::Select(select) => {
            let tables = resolve_from(schema, &select.from)?;
            let columns = resolve_select_items(&tables, &select.items)?;

            let mut collector = VariableCollector::new(&tables);
            for entry in &select.from {
                walk_join_conditions(&mut collector, entry)?;
            }
            if let Some(where_clause) = &select.where_clause {
                collector.walk_expr(where_clause)?;
            }
            (QueryKind::Select, Some(columns), collector.finish()?)
        }
        Statement::Insert(insert) => {
            let variables = resolve_insert_variables(schema, insert)?;
            (QueryKind::Insert, None, variables)
        }
        Statement::Update(update) => {
            let variables = resolve_update_variables(schema, update)?;
            (QueryKind::Update, None, variables)
        }
        other => {
            return Err(Error::InvalidQueryDocument {
                reason: String::from("only SELECT, INSERT, and UPDATE queries can be resolved"),
                cursor: other.cursor(),
            });
        }
    };

    debug!(
        query = %name,
        ?kind,
        columns = columns.as_ref().map_or(0, Vec::len),
        variables = variables.len(),
        "resolved query"
    );

    Ok(ResolvedQuery {
        kind,
        name,
        columns,
        variables,
        statement,
    })
}

/// Parses and resolves a query document in one step.
///
/// # Errors
///
/// Propagates every parse and resolution error of the document.
pub fn resolve_query_document(schema: &Schema, name: &str, sql: &str) -> Result<ResolvedQuery> {
    let statement = parse_query_document(sql)?;
    resolve_query(schema, name, statement)
}

fn walk_join_conditions(collector: &mut VariableCollector<'_>, entry: &TableExpr) -> Result<()> {
    if let TableExpr::LeftJoin {
        left,
        right,
        condition,
    } = entry
    {
        walk_join_conditions(collector, left)?;
        walk_join_conditions(collector, right)?;
        collector.walk_expr(condition)?;
    }
    Ok(())
}

fn resolve_insert_variables(
    schema: &Schema,
    insert: &InsertStatement,
) -> Result<Vec<VariableResolved>> {
    let table = lookup_target_table(schema, &insert.table.name, insert.table.cursor)?;

    // The column addressed by each value-list position: the explicit
    // column list when present, the table's declaration order otherwise.
    let targets: Vec<&crate::schema::SchemaColumn> = match &insert.columns {
        Some(columns) => columns
            .iter()
            .map(|ident| {
                table.column(ident).ok_or_else(|| Error::UnknownColumn {
                    column: ident.value.clone(),
                    cursor: ident.cursor,
                })
            })
            .collect::<Result<_>>()?,
        None => table.columns.iter().collect(),
    };

    let mut collector = VariableCollector::new(&[]);
    for row in &insert.rows {
        for (position, expr) in row.iter().enumerate() {
            let inferred = targets
                .get(position)
                .map(|column| (column.data_type, column.nullable));
            collector.walk_operand(expr, inferred)?;
        }
    }
    collector.finish()
}

fn resolve_update_variables(
    schema: &Schema,
    update: &UpdateStatement,
) -> Result<Vec<VariableResolved>> {
    let table = lookup_target_table(schema, &update.table.name, update.table.cursor)?;

    // The target table is the only one in scope for the WHERE clause,
    // visible under its alias when one was written.
    let scope = [ResolvedTable {
        alias: update
            .alias
            .clone()
            .unwrap_or_else(|| update.table.name.clone()),
        source: table.name.clone(),
        columns: table
            .columns
            .iter()
            .map(|column| ResolvedTableColumn {
                name: column.name.clone(),
                data_type: column.data_type,
                nullable_base: column.nullable,
            })
            .collect(),
        nullable_override: false,
    }];

    let mut collector = VariableCollector::new(&scope);
    for assignment in &update.assignments {
        let column = table
            .column(&assignment.column)
            .ok_or_else(|| Error::UnknownColumn {
                column: assignment.column.value.clone(),
                cursor: assignment.column.cursor,
            })?;
        collector.walk_operand(&assignment.value, Some((column.data_type, column.nullable)))?;
    }
    if let Some(where_clause) = &update.where_clause {
        collector.walk_expr(where_clause)?;
    }
    collector.finish()
}

fn lookup_target_table<'s>(
    schema: &'s Schema,
    name: &crate::ast::Ident,
    cursor: crate::lexer::Cursor,
) -> Result<&'s TableSchema> {
    schema.table(name).ok_or_else(|| Error::UnknownTable {
        table: name.value.clone(),
        cursor,
    })
}
