//! Schema construction from parsed `CREATE TABLE` statements.
//!
//! A [`Schema`] is built once per generation run, is read-only afterwards,
//! and is shared by reference across any number of query resolutions.

use tracing::debug;

use crate::ast::{
    Constraint, CreateTableStatement, Ident, SqlType, Statement, TableItem,
};
use crate::error::{Error, Result};
use crate::parser::Parser;

/// One column of a known table, with its join-independent nullability.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaColumn {
    /// The column name.
    pub name: Ident,
    /// The declared type, with serial pseudo-types desugared to integers.
    pub data_type: SqlType,
    /// False iff the column carries NOT NULL / PRIMARY KEY or appears in a
    /// table-level primary key.
    pub nullable: bool,
    /// The declared constraints, in source order.
    pub constraints: Vec<Constraint>,
}

/// A known table: its name and ordered columns.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    /// The table name.
    pub name: Ident,
    /// The columns, in declaration order.
    pub columns: Vec<SchemaColumn>,
}

impl TableSchema {
    /// Finds a column by identifier.
    #[must_use]
    pub fn column(&self, name: &Ident) -> Option<&SchemaColumn> {
        self.columns.iter().find(|c| c.name.matches(name))
    }
}

/// The set of known tables, built from all schema documents of a run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Schema {
    tables: Vec<TableSchema>,
}

impl Schema {
    /// Folds a batch of parsed `CREATE TABLE` statements into a schema.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::DuplicateTable`] when two statements declare the
    /// same table name. `REFERENCES` targets are not validated; schema
    /// files are trusted input.
    pub fn build(statements: impl IntoIterator<Item = CreateTableStatement>) -> Result<Self> {
        let mut schema = Self::default();
        for statement in statements {
            schema.add_table(statement)?;
        }
        Ok(schema)
    }

    /// Parses one schema document (a sequence of `CREATE TABLE` statements)
    /// and builds a schema from it.
    ///
    /// # Errors
    ///
    /// Fails on lexical or grammatical errors, on duplicate tables, and
    /// with [`Error::InvalidQueryDocument`] when the document holds a
    /// statement that is not a `CREATE TABLE`.
    pub fn parse(sql: &str) -> Result<Self> {
        let statements = Parser::new(sql).parse_document()?;
        let mut creates = Vec::new();
        for statement in statements {
            match statement {
                Statement::CreateTable(create) => creates.push(create),
                Statement::Empty => {}
                other => {
                    return Err(Error::InvalidQueryDocument {
                        reason: String::from(
                            "schema documents may only contain CREATE TABLE statements",
                        ),
                        cursor: other.cursor(),
                    });
                }
            }
        }
        Self::build(creates)
    }

    fn add_table(&mut self, statement: CreateTableStatement) -> Result<()> {
        let name = statement.table.name.clone();
        if self.table(&name).is_some() {
            return Err(Error::DuplicateTable {
                table: name.value,
                cursor: statement.table.cursor,
            });
        }

        // Columns named by a table-level PRIMARY KEY are not nullable even
        // without their own constraint.
        let key_columns: Vec<&Ident> = statement
            .items
            .iter()
            .filter_map(|item| match item {
                TableItem::PrimaryKey(pk) => Some(pk.columns.iter()),
                TableItem::Column(_) => None,
            })
            .flatten()
            .collect();

        let columns: Vec<SchemaColumn> = statement
            .items
            .iter()
            .filter_map(|item| match item {
                TableItem::Column(def) => Some(def),
                TableItem::PrimaryKey(_) => None,
            })
            .map(|def| {
                let in_table_key = key_columns.iter().any(|key| key.matches(&def.name));
                SchemaColumn {
                    name: def.name.clone(),
                    data_type: def.data_type.desugar_serial(),
                    nullable: !def.declares_not_null() && !in_table_key,
                    constraints: def.constraints.clone(),
                }
            })
            .collect();

        debug!(table = %name.value, columns = columns.len(), "added table to schema");
        self.tables.push(TableSchema { name, columns });
        Ok(())
    }

    /// Finds a table by identifier.
    #[must_use]
    pub fn table(&self, name: &Ident) -> Option<&TableSchema> {
        self.tables.iter().find(|t| t.name.matches(name))
    }

    /// All known tables, in declaration order.
    #[must_use]
    pub fn tables(&self) -> &[TableSchema] {
        &self.tables
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::SimpleType;

    use super::*;

    fn schema(sql: &str) -> Schema {
        Schema::parse(sql).unwrap_or_else(|e| panic!("failed to build schema: {e}"))
    }

    #[test]
    fn test_nullability_follows_constraints() {
        let schema = schema(
            "CREATE TABLE t (
                a int,
                b int NOT NULL,
                c int PRIMARY KEY,
                d int UNIQUE,
                e int NOT NULL UNIQUE
            )",
        );
        let table = schema.tables().first().expect("table");
        let nullable: Vec<bool> = table.columns.iter().map(|c| c.nullable).collect();
        assert_eq!(nullable, vec![true, false, false, true, false]);
    }

    #[test]
    fn test_table_level_primary_key_forces_not_null() {
        let schema = schema("CREATE TABLE t (a int, b int, c int, PRIMARY KEY (a, b))");
        let table = schema.tables().first().expect("table");
        let nullable: Vec<bool> = table.columns.iter().map(|c| c.nullable).collect();
        assert_eq!(nullable, vec![false, false, true]);
    }

    #[test]
    fn test_serial_columns_become_integers() {
        let schema = schema("CREATE TABLE t (id serial PRIMARY KEY, big bigserial)");
        let table = schema.tables().first().expect("table");
        assert_eq!(table.columns[0].data_type, SqlType::Simple(SimpleType::Int));
        assert_eq!(
            table.columns[1].data_type,
            SqlType::Simple(SimpleType::BigInt)
        );
    }

    #[test]
    fn test_duplicate_table_is_rejected() {
        let err = Schema::parse("CREATE TABLE t (a int); CREATE TABLE T (b int)")
            .expect_err("duplicate table");
        assert!(matches!(err, Error::DuplicateTable { table, .. } if table == "t"));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let schema = schema("CREATE TABLE Users (id int)");
        let ident = Ident::new("USERS", crate::lexer::Cursor::start());
        assert!(schema.table(&ident).is_some());
    }
}
