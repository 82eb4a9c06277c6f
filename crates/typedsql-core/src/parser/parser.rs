//! Recursive-descent parser for the supported SQL subset.

use crate::ast::{
    AlterTableStatement, ArithOp, Assignment, BoolOp, ColumnDef, ColumnRef, Constraint,
    CreateTableStatement, Expr, Ident, InsertStatement, PrimaryKeyTableConstraint, SelectItem,
    SelectStatement, SqlType, Statement, TableExpr, TableItem, TableRef, UpdateStatement, When,
};
use crate::error::{Error, Result};
use crate::lexer::{Cursor, NumberValue, TokenKind, TokenStream};
use crate::registry::{Keyword, Registry, TypeClass};

use super::pratt::{binding_power, operator_from_symbol, BinaryOperator};

/// SQL parser. Owns its token stream; every parse method advances it and
/// never backtracks further than the one-token lookahead.
pub struct Parser<'a> {
    stream: TokenStream<'a>,
    registry: &'static Registry,
}

impl<'a> Parser<'a> {
    /// Creates a parser over the given input, using the built-in keyword
    /// and data-type registries.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self::with_registry(input, Registry::global())
    }

    /// Creates a parser with an explicit registry.
    #[must_use]
    pub const fn with_registry(input: &'a str, registry: &'static Registry) -> Self {
        Self {
            stream: TokenStream::new(input),
            registry,
        }
    }

    /// Parses the entire input as exactly one statement; a trailing
    /// semicolon and trailing comments are allowed.
    ///
    /// # Errors
    ///
    /// Returns the first lexical or grammatical error, with its cursor.
    pub fn parse(input: &'a str) -> Result<Statement> {
        let mut parser = Self::new(input);
        let statement = parser.parse_statement()?;
        parser.skip_comments()?;
        if parser.eat_punctuation(';')? {
            parser.skip_comments()?;
        }
        if parser.stream.eof() {
            Ok(statement)
        } else {
            Err(parser.error_unexpected())
        }
    }

    /// Parses a document: a sequence of `;`-separated statements.
    ///
    /// A segment with no tokens between separators parses to
    /// [`Statement::Empty`]; an all-whitespace document yields no
    /// statements at all.
    ///
    /// # Errors
    ///
    /// Returns the first lexical or grammatical error, with its cursor.
    pub fn parse_document(&mut self) -> Result<Vec<Statement>> {
        let mut statements = Vec::new();
        loop {
            self.skip_comments()?;
            if self.stream.eof() {
                break;
            }
            if self.eat_punctuation(';')? {
                statements.push(Statement::Empty);
                continue;
            }
            statements.push(self.parse_statement()?);
            self.skip_comments()?;
            if self.stream.eof() {
                break;
            }
            self.expect_punctuation(';')?;
        }
        Ok(statements)
    }

    /// Parses a single statement, dispatching on the leading keyword.
    ///
    /// # Errors
    ///
    /// Returns the first lexical or grammatical error, with its cursor.
    pub fn parse_statement(&mut self) -> Result<Statement> {
        match self.peek_keyword()? {
            Some(Keyword::Select) => Ok(Statement::Select(self.parse_select_statement()?)),
            Some(Keyword::Insert) => Ok(Statement::Insert(self.parse_insert_statement()?)),
            Some(Keyword::Update) => Ok(Statement::Update(self.parse_update_statement()?)),
            Some(Keyword::Create) => Ok(Statement::CreateTable(self.parse_create_statement()?)),
            Some(Keyword::Alter) => Ok(Statement::AlterTable(self.parse_alter_statement()?)),
            _ => Err(self.error_unexpected()),
        }
    }

    // --- statements ---

    fn parse_select_statement(&mut self) -> Result<SelectStatement> {
        self.expect_keyword(Keyword::Select)?;
        let items = self.parse_comma_separated(Self::parse_select_item)?;
        self.expect_keyword(Keyword::From)?;
        let from = self.parse_comma_separated(Self::parse_from_entry)?;
        let where_clause = if self.eat_keyword(Keyword::Where)? {
            Some(self.parse_expression(0)?)
        } else {
            None
        };
        Ok(SelectStatement {
            items,
            from,
            where_clause,
        })
    }

    fn parse_select_item(&mut self) -> Result<SelectItem> {
        self.skip_comments()?;
        if self.eat_star()? {
            return Ok(SelectItem::All {
                cursor: self.stream.cursor(),
            });
        }

        let first = self.parse_identifier(false)?;
        let cursor = first.cursor;
        let column = if self.eat_punctuation('.')? {
            if self.eat_star()? {
                return Ok(SelectItem::AllFromTable {
                    schema: None,
                    table: first,
                    cursor,
                });
            }
            let second = self.parse_identifier(true)?;
            if self.eat_punctuation('.')? {
                if self.eat_star()? {
                    return Ok(SelectItem::AllFromTable {
                        schema: Some(first),
                        table: second,
                        cursor,
                    });
                }
                let third = self.parse_identifier(true)?;
                ColumnRef {
                    schema: Some(first),
                    table: Some(second),
                    column: third,
                    cursor,
                }
            } else {
                ColumnRef {
                    schema: None,
                    table: Some(first),
                    column: second,
                    cursor,
                }
            }
        } else {
            ColumnRef {
                schema: None,
                table: None,
                column: first,
                cursor,
            }
        };

        if self.eat_keyword(Keyword::As)? {
            let alias = self.parse_identifier(false)?;
            Ok(SelectItem::ColumnAlias { column, alias })
        } else {
            Ok(SelectItem::Column(column))
        }
    }

    fn parse_from_entry(&mut self) -> Result<TableExpr> {
        self.skip_comments()?;
        let mut table = self.parse_table_or_alias()?;
        while self.eat_keyword(Keyword::Left)? {
            self.expect_keyword(Keyword::Join)?;
            let right = self.parse_table_or_alias()?;
            self.expect_keyword(Keyword::On)?;
            let condition = self.parse_expression(0)?;
            table = TableExpr::LeftJoin {
                left: Box::new(table),
                right: Box::new(right),
                condition,
            };
        }
        Ok(table)
    }

    fn parse_table_or_alias(&mut self) -> Result<TableExpr> {
        let table = self.parse_table_ref()?;
        if self.eat_keyword(Keyword::As)? {
            let alias = self.parse_identifier(true)?;
            Ok(TableExpr::Alias { table, alias })
        } else if self.peek_is_plain_identifier()? {
            let alias = self.parse_identifier(false)?;
            Ok(TableExpr::Alias { table, alias })
        } else {
            Ok(TableExpr::Table(table))
        }
    }

    fn parse_insert_statement(&mut self) -> Result<InsertStatement> {
        self.expect_keyword(Keyword::Insert)?;
        self.expect_keyword(Keyword::Into)?;
        let table = self.parse_table_ref()?;

        let columns = if self.eat_punctuation('(')? {
            let columns = self.parse_comma_separated(|p| p.parse_identifier(false))?;
            self.expect_punctuation(')')?;
            Some(columns)
        } else {
            None
        };

        self.expect_keyword(Keyword::Values)?;
        let rows = self.parse_comma_separated(Self::parse_value_row)?;

        Ok(InsertStatement {
            table,
            columns,
            rows,
        })
    }

    fn parse_value_row(&mut self) -> Result<Vec<Expr>> {
        self.expect_punctuation('(')?;
        let row = self.parse_comma_separated(|p| p.parse_expression(0))?;
        self.expect_punctuation(')')?;
        Ok(row)
    }

    fn parse_update_statement(&mut self) -> Result<UpdateStatement> {
        self.expect_keyword(Keyword::Update)?;
        let table = self.parse_table_ref()?;
        let alias = if self.eat_keyword(Keyword::As)? {
            Some(self.parse_identifier(true)?)
        } else {
            None
        };

        self.expect_keyword(Keyword::Set)?;
        let assignments = self.parse_comma_separated(Self::parse_assignment)?;
        let where_clause = if self.eat_keyword(Keyword::Where)? {
            Some(self.parse_expression(0)?)
        } else {
            None
        };

        Ok(UpdateStatement {
            table,
            alias,
            assignments,
            where_clause,
        })
    }

    fn parse_assignment(&mut self) -> Result<Assignment> {
        let column = self.parse_identifier(false)?;
        self.expect_operator("=")?;
        let value = self.parse_expression(0)?;
        Ok(Assignment { column, value })
    }

    fn parse_create_statement(&mut self) -> Result<CreateTableStatement> {
        self.expect_keyword(Keyword::Create)?;
        self.expect_keyword(Keyword::Table)?;
        let table = self.parse_table_ref()?;
        self.expect_punctuation('(')?;
        let items = self.parse_comma_separated(Self::parse_table_item)?;
        self.expect_punctuation(')')?;
        Ok(CreateTableStatement { table, items })
    }

    fn parse_table_item(&mut self) -> Result<TableItem> {
        self.skip_comments()?;
        if self.is_keyword(Keyword::Primary)? {
            let cursor = self.peek_cursor()?;
            self.expect_keyword(Keyword::Primary)?;
            self.expect_keyword(Keyword::Key)?;
            self.expect_punctuation('(')?;
            let columns = self.parse_comma_separated(|p| p.parse_identifier(false))?;
            self.expect_punctuation(')')?;
            Ok(TableItem::PrimaryKey(PrimaryKeyTableConstraint {
                columns,
                cursor,
            }))
        } else {
            Ok(TableItem::Column(self.parse_column_def()?))
        }
    }

    fn parse_column_def(&mut self) -> Result<ColumnDef> {
        let name = self.parse_identifier(false)?;
        let cursor = name.cursor;
        let data_type = self.parse_data_type()?;
        let constraints = self.parse_constraints()?;
        Ok(ColumnDef {
            name,
            data_type,
            constraints,
            cursor,
        })
    }

    fn parse_data_type(&mut self) -> Result<SqlType> {
        self.skip_comments()?;
        let class = match &self.stream.maybe_peek()?.kind {
            TokenKind::Identifier(word) => self.registry.type_class(word),
            _ => None,
        };
        let Some(class) = class else {
            return Err(self.error_expected_data_type());
        };
        self.stream.next()?;

        Ok(match class {
            TypeClass::NoParams(simple) => SqlType::Simple(simple),
            TypeClass::IntParam(base) => {
                let length = if self.eat_punctuation('(')? {
                    let length = self.parse_int_param::<u32>()?;
                    self.expect_punctuation(')')?;
                    Some(length)
                } else {
                    None
                };
                SqlType::Sized { base, length }
            }
            TypeClass::Numeric(base) => {
                let precision_scale = if self.eat_punctuation('(')? {
                    let precision = self.parse_int_param::<u16>()?;
                    self.expect_punctuation(',')?;
                    let scale = self.parse_int_param::<u16>()?;
                    self.expect_punctuation(')')?;
                    Some((precision, scale))
                } else {
                    None
                };
                SqlType::Numeric {
                    base,
                    precision_scale,
                }
            }
        })
    }

    fn parse_constraints(&mut self) -> Result<Vec<Constraint>> {
        let mut constraints = Vec::new();
        loop {
            self.skip_comments()?;
            match self.peek_keyword()? {
                Some(Keyword::Not) => {
                    self.expect_keyword(Keyword::Not)?;
                    self.expect_keyword(Keyword::Null)?;
                    constraints.push(Constraint::NotNull);
                }
                Some(Keyword::Primary) => {
                    self.expect_keyword(Keyword::Primary)?;
                    self.expect_keyword(Keyword::Key)?;
                    constraints.push(Constraint::PrimaryKey);
                }
                Some(Keyword::Unique) => {
                    self.expect_keyword(Keyword::Unique)?;
                    constraints.push(Constraint::Unique);
                }
                Some(Keyword::References) => {
                    self.expect_keyword(Keyword::References)?;
                    constraints.push(Constraint::Reference(self.parse_reference_target()?));
                }
                _ => break,
            }
        }
        Ok(constraints)
    }

    fn parse_reference_target(&mut self) -> Result<ColumnRef> {
        let first = self.parse_identifier(false)?;
        let cursor = first.cursor;
        let (schema, table) = if self.eat_punctuation('.')? {
            let second = self.parse_identifier(true)?;
            (Some(first), second)
        } else {
            (None, first)
        };
        self.expect_punctuation('(')?;
        let column = self.parse_identifier(false)?;
        self.expect_punctuation(')')?;
        Ok(ColumnRef {
            schema,
            table: Some(table),
            column,
            cursor,
        })
    }

    fn parse_alter_statement(&mut self) -> Result<AlterTableStatement> {
        self.expect_keyword(Keyword::Alter)?;
        self.expect_keyword(Keyword::Table)?;
        let table = self.parse_table_ref()?;
        Ok(AlterTableStatement { table })
    }

    // --- expressions ---

    /// Parses an expression by precedence climbing; `min_bp` is the lowest
    /// binding power this call may consume.
    fn parse_expression(&mut self, min_bp: u8) -> Result<Expr> {
        let mut lhs = self.parse_term()?;
        loop {
            let Some(op) = self.peek_binary_operator()? else {
                break;
            };
            let (l_bp, r_bp) = binding_power(op);
            if l_bp < min_bp {
                break;
            }
            self.stream.next()?;
            let rhs = self.parse_expression(r_bp)?;
            lhs = match op {
                BinaryOperator::Bool(op) => Expr::Bool {
                    left: Box::new(lhs),
                    op,
                    right: Box::new(rhs),
                },
                BinaryOperator::Compare(op) => Expr::Compare {
                    left: Box::new(lhs),
                    op,
                    right: Box::new(rhs),
                },
                BinaryOperator::Arith(op) => Expr::Arith {
                    left: Box::new(lhs),
                    op,
                    right: Box::new(rhs),
                },
            };
        }
        Ok(lhs)
    }

    fn peek_binary_operator(&mut self) -> Result<Option<BinaryOperator>> {
        self.skip_comments()?;
        Ok(match &self.stream.maybe_peek()?.kind {
            TokenKind::Operator(symbol) => operator_from_symbol(symbol),
            TokenKind::Star => Some(BinaryOperator::Arith(ArithOp::Mul)),
            TokenKind::Identifier(word) => match self.registry.keyword(word) {
                Some(Keyword::And) => Some(BinaryOperator::Bool(BoolOp::And)),
                Some(Keyword::Or) => Some(BinaryOperator::Bool(BoolOp::Or)),
                _ => None,
            },
            _ => None,
        })
    }

    /// Parses an atomic term: a literal, a variable, a column reference, a
    /// CASE expression, or a parenthesized sub-expression.
    fn parse_term(&mut self) -> Result<Expr> {
        self.skip_comments()?;
        match &self.stream.maybe_peek()?.kind {
            TokenKind::String(_)
            | TokenKind::Number(_)
            | TokenKind::NamedVariable(_)
            | TokenKind::IndexedVariable(_) => {
                let token = self.stream.next()?;
                match token.kind {
                    TokenKind::String(value) => Ok(Expr::String {
                        value,
                        cursor: token.cursor,
                    }),
                    TokenKind::Number(value) => Ok(Expr::Number {
                        value,
                        cursor: token.cursor,
                    }),
                    TokenKind::NamedVariable(name) => Ok(Expr::NamedVariable {
                        name,
                        cursor: token.cursor,
                    }),
                    TokenKind::IndexedVariable(position) => Ok(Expr::IndexedVariable {
                        position,
                        cursor: token.cursor,
                    }),
                    kind => Err(Error::UnexpectedToken {
                        found: kind.to_string(),
                        cursor: token.cursor,
                    }),
                }
            }
            TokenKind::Punctuation('(') => {
                self.stream.next()?;
                let expr = self.parse_expression(0)?;
                self.expect_punctuation(')')?;
                Ok(expr)
            }
            TokenKind::QuotedIdentifier(_) => Ok(Expr::Column(self.parse_column_ref()?)),
            TokenKind::Identifier(word) => match self.registry.keyword(word) {
                None => Ok(Expr::Column(self.parse_column_ref()?)),
                Some(Keyword::True) => {
                    let token = self.stream.next()?;
                    Ok(Expr::Boolean {
                        value: true,
                        cursor: token.cursor,
                    })
                }
                Some(Keyword::False) => {
                    let token = self.stream.next()?;
                    Ok(Expr::Boolean {
                        value: false,
                        cursor: token.cursor,
                    })
                }
                Some(Keyword::Null) => {
                    let token = self.stream.next()?;
                    Ok(Expr::Null {
                        cursor: token.cursor,
                    })
                }
                Some(Keyword::Case) => self.parse_case(),
                Some(_) => Err(self.error_unexpected()),
            },
            _ => Err(self.error_unexpected()),
        }
    }

    fn parse_case(&mut self) -> Result<Expr> {
        self.expect_keyword(Keyword::Case)?;
        let operand = if self.is_keyword(Keyword::When)? {
            None
        } else {
            Some(Box::new(self.parse_term()?))
        };

        let mut whens = Vec::new();
        while self.eat_keyword(Keyword::When)? {
            let condition = self.parse_expression(0)?;
            self.expect_keyword(Keyword::Then)?;
            let then = self.parse_term()?;
            whens.push(When { condition, then });
        }
        if whens.is_empty() {
            return Err(self.error_expected_keyword(Keyword::When));
        }

        let else_clause = if self.eat_keyword(Keyword::Else)? {
            Some(Box::new(self.parse_expression(0)?))
        } else {
            None
        };
        self.expect_keyword(Keyword::End)?;

        Ok(Expr::Case {
            operand,
            whens,
            else_clause,
        })
    }

    fn parse_column_ref(&mut self) -> Result<ColumnRef> {
        let first = self.parse_identifier(false)?;
        let cursor = first.cursor;
        if self.eat_punctuation('.')? {
            let second = self.parse_identifier(true)?;
            if self.eat_punctuation('.')? {
                let third = self.parse_identifier(true)?;
                Ok(ColumnRef {
                    schema: Some(first),
                    table: Some(second),
                    column: third,
                    cursor,
                })
            } else {
                Ok(ColumnRef {
                    schema: None,
                    table: Some(first),
                    column: second,
                    cursor,
                })
            }
        } else {
            Ok(ColumnRef {
                schema: None,
                table: None,
                column: first,
                cursor,
            })
        }
    }

    // --- shared pieces ---

    fn parse_table_ref(&mut self) -> Result<TableRef> {
        let first = self.parse_identifier(false)?;
        let cursor = first.cursor;
        if self.eat_punctuation('.')? {
            let name = self.parse_identifier(true)?;
            Ok(TableRef {
                schema: Some(first),
                name,
                cursor,
            })
        } else {
            Ok(TableRef {
                schema: None,
                name: first,
                cursor,
            })
        }
    }

    fn parse_comma_separated<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Result<T>,
    ) -> Result<Vec<T>> {
        let mut items = vec![item(self)?];
        while self.eat_punctuation(',')? {
            items.push(item(self)?);
        }
        Ok(items)
    }

    fn parse_identifier(&mut self, allow_keyword: bool) -> Result<Ident> {
        self.skip_comments()?;
        let acceptable = match &self.stream.maybe_peek()?.kind {
            TokenKind::Identifier(word) => allow_keyword || !self.registry.is_keyword(word),
            TokenKind::QuotedIdentifier(_) => true,
            _ => false,
        };
        if !acceptable {
            return Err(self.error_unexpected());
        }
        let token = self.stream.next()?;
        match token.kind {
            TokenKind::Identifier(word) => Ok(Ident::new(word, token.cursor)),
            TokenKind::QuotedIdentifier(word) => Ok(Ident::quoted(word, token.cursor)),
            kind => Err(Error::UnexpectedToken {
                found: kind.to_string(),
                cursor: token.cursor,
            }),
        }
    }

    /// Parses an integer literal that must fit the parameter type; a
    /// decimal literal is rejected.
    fn parse_int_param<T: TryFrom<i64>>(&mut self) -> Result<T> {
        self.skip_comments()?;
        let token = self.stream.next()?;
        match token.kind {
            TokenKind::Number(NumberValue::Integer(n)) => {
                T::try_from(n).map_err(|_| Error::UnexpectedToken {
                    found: n.to_string(),
                    cursor: token.cursor,
                })
            }
            kind => Err(Error::UnexpectedToken {
                found: kind.to_string(),
                cursor: token.cursor,
            }),
        }
    }

    fn skip_comments(&mut self) -> Result<()> {
        while self.stream.maybe_peek()?.kind.is_comment() {
            self.stream.next()?;
        }
        Ok(())
    }

    fn peek_keyword(&mut self) -> Result<Option<Keyword>> {
        self.skip_comments()?;
        match &self.stream.maybe_peek()?.kind {
            TokenKind::Identifier(word) => Ok(self.registry.keyword(word)),
            _ => Ok(None),
        }
    }

    fn peek_is_plain_identifier(&mut self) -> Result<bool> {
        self.skip_comments()?;
        Ok(match &self.stream.maybe_peek()?.kind {
            TokenKind::Identifier(word) => !self.registry.is_keyword(word),
            TokenKind::QuotedIdentifier(_) => true,
            _ => false,
        })
    }

    fn peek_cursor(&mut self) -> Result<Cursor> {
        self.skip_comments()?;
        Ok(self.stream.maybe_peek()?.cursor)
    }

    fn is_keyword(&mut self, keyword: Keyword) -> Result<bool> {
        Ok(self.peek_keyword()? == Some(keyword))
    }

    fn eat_keyword(&mut self, keyword: Keyword) -> Result<bool> {
        if self.is_keyword(keyword)? {
            self.stream.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<()> {
        if self.eat_keyword(keyword)? {
            Ok(())
        } else {
            Err(self.error_expected_keyword(keyword))
        }
    }

    fn is_punctuation(&mut self, ch: char) -> Result<bool> {
        self.skip_comments()?;
        Ok(matches!(
            self.stream.maybe_peek()?.kind,
            TokenKind::Punctuation(c) if c == ch
        ))
    }

    fn eat_punctuation(&mut self, ch: char) -> Result<bool> {
        if self.is_punctuation(ch)? {
            self.stream.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_punctuation(&mut self, ch: char) -> Result<()> {
        if self.eat_punctuation(ch)? {
            Ok(())
        } else {
            Err(self.error_expected_punctuation(ch))
        }
    }

    fn expect_operator(&mut self, symbol: &str) -> Result<()> {
        self.skip_comments()?;
        let matches = matches!(
            self.stream.maybe_peek()?.kind,
            TokenKind::Operator(s) if s == symbol
        );
        if matches {
            self.stream.next()?;
            Ok(())
        } else {
            let (found, cursor) = self.found_and_cursor();
            Err(Error::ExpectedPunctuation {
                punctuation: symbol.chars().next().unwrap_or(' '),
                found,
                cursor,
            })
        }
    }

    fn eat_star(&mut self) -> Result<bool> {
        self.skip_comments()?;
        if matches!(self.stream.maybe_peek()?.kind, TokenKind::Star) {
            self.stream.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    // --- error construction ---

    fn found_and_cursor(&mut self) -> (String, Cursor) {
        match self.stream.maybe_peek() {
            Ok(token) if token.is_eof() => (String::from("<end of input>"), self.stream.cursor()),
            Ok(token) => (token.kind.to_string(), token.cursor),
            Err(_) => (String::from("<invalid token>"), self.stream.cursor()),
        }
    }

    fn error_unexpected(&mut self) -> Error {
        match self.stream.maybe_peek() {
            Ok(token) if token.is_eof() => Error::UnexpectedEndOfInput {
                cursor: self.stream.cursor(),
            },
            Ok(token) => Error::UnexpectedToken {
                found: token.kind.to_string(),
                cursor: token.cursor,
            },
            Err(err) => err,
        }
    }

    fn error_expected_keyword(&mut self, keyword: Keyword) -> Error {
        let (found, cursor) = self.found_and_cursor();
        Error::ExpectedKeyword {
            keyword,
            found,
            cursor,
        }
    }

    fn error_expected_punctuation(&mut self, punctuation: char) -> Error {
        let (found, cursor) = self.found_and_cursor();
        Error::ExpectedPunctuation {
            punctuation,
            found,
            cursor,
        }
    }

    fn error_expected_data_type(&mut self) -> Error {
        let (found, cursor) = self.found_and_cursor();
        Error::ExpectedDataType { found, cursor }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{ArithOp, BoolOp, CompareOp};

    use super::*;

    fn parse(sql: &str) -> Statement {
        Parser::parse(sql).unwrap_or_else(|e| panic!("failed to parse {sql:?}: {e}"))
    }

    fn parse_expr(sql: &str) -> Expr {
        let statement = parse(&format!("SELECT x FROM t WHERE {sql}"));
        match statement {
            Statement::Select(select) => select.where_clause.expect("where clause"),
            other => panic!("expected SELECT, got {other:?}"),
        }
    }

    #[test]
    fn test_simple_select() {
        let statement = parse("SELECT id, name FROM users");
        let Statement::Select(select) = statement else {
            panic!("expected SELECT");
        };
        assert_eq!(select.items.len(), 2);
        assert_eq!(select.from.len(), 1);
        assert!(select.where_clause.is_none());
    }

    #[test]
    fn test_expression_precedence() {
        // AND binds tighter than OR, comparisons tighter than AND.
        let expr = parse_expr("a = 1 OR b = 2 AND c = 3");
        let Expr::Bool {
            op: BoolOp::Or,
            right,
            ..
        } = expr
        else {
            panic!("expected OR at the top");
        };
        assert!(matches!(
            *right,
            Expr::Bool {
                op: BoolOp::And,
                ..
            }
        ));
    }

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        let expr = parse_expr("a + b * 2 = 10");
        let Expr::Compare {
            op: CompareOp::Eq,
            left,
            ..
        } = expr
        else {
            panic!("expected comparison at the top");
        };
        let Expr::Arith {
            op: ArithOp::Add,
            right,
            ..
        } = *left
        else {
            panic!("expected addition under the comparison");
        };
        assert!(matches!(
            *right,
            Expr::Arith {
                op: ArithOp::Mul,
                ..
            }
        ));
    }

    #[test]
    fn test_parenthesized_grouping() {
        let expr = parse_expr("(a + b) * 2 = 10");
        let Expr::Compare { left, .. } = expr else {
            panic!("expected comparison at the top");
        };
        assert!(matches!(
            *left,
            Expr::Arith {
                op: ArithOp::Mul,
                ..
            }
        ));
    }

    #[test]
    fn test_left_join_chain_is_left_leaning() {
        let statement = parse(
            "SELECT a.x FROM a LEFT JOIN b ON b.a_id = a.id LEFT JOIN c ON c.b_id = b.id",
        );
        let Statement::Select(select) = statement else {
            panic!("expected SELECT");
        };
        let TableExpr::LeftJoin { left, right, .. } = &select.from[0] else {
            panic!("expected join at the top");
        };
        assert!(matches!(**left, TableExpr::LeftJoin { .. }));
        assert!(matches!(**right, TableExpr::Table(_)));
    }

    #[test]
    fn test_case_expression() {
        let expr = parse_expr("CASE WHEN a = 1 THEN 'one' ELSE 'other' END = b");
        let Expr::Compare { left, .. } = expr else {
            panic!("expected comparison");
        };
        let Expr::Case {
            operand,
            whens,
            else_clause,
        } = *left
        else {
            panic!("expected CASE");
        };
        assert!(operand.is_none());
        assert_eq!(whens.len(), 1);
        assert!(else_clause.is_some());
    }

    #[test]
    fn test_named_and_indexed_variables() {
        let expr = parse_expr("id = $1 AND name = :name");
        let Expr::Bool { left, right, .. } = expr else {
            panic!("expected AND");
        };
        let Expr::Compare { right: first, .. } = *left else {
            panic!("expected comparison");
        };
        assert!(matches!(*first, Expr::IndexedVariable { position: 1, .. }));
        let Expr::Compare { right: second, .. } = *right else {
            panic!("expected comparison");
        };
        assert!(matches!(*second, Expr::NamedVariable { ref name, .. } if name == "name"));
    }

    #[test]
    fn test_create_table_with_constraints() {
        let statement = parse(
            "CREATE TABLE users (id serial PRIMARY KEY, name text NOT NULL, org uuid REFERENCES orgs(id))",
        );
        let Statement::CreateTable(create) = statement else {
            panic!("expected CREATE TABLE");
        };
        assert_eq!(create.items.len(), 3);
        let TableItem::Column(org) = &create.items[2] else {
            panic!("expected column def");
        };
        assert!(matches!(org.constraints[0], Constraint::Reference(_)));
    }

    #[test]
    fn test_insert_with_multiple_rows() {
        let statement = parse("INSERT INTO t (a, b) VALUES (1, 'x'), (2, 'y')");
        let Statement::Insert(insert) = statement else {
            panic!("expected INSERT");
        };
        assert_eq!(insert.columns.as_ref().map(Vec::len), Some(2));
        assert_eq!(insert.rows.len(), 2);
    }

    #[test]
    fn test_update_with_assignments() {
        let statement = parse("UPDATE users SET name = :name, email = :email WHERE id = $1");
        let Statement::Update(update) = statement else {
            panic!("expected UPDATE");
        };
        assert_eq!(update.assignments.len(), 2);
        assert!(update.where_clause.is_some());
    }

    #[test]
    fn test_document_with_empty_segments() {
        let statements = Parser::new("CREATE TABLE a (x int);; CREATE TABLE b (y int);")
            .parse_document()
            .expect("document");
        assert_eq!(statements.len(), 3);
        assert!(statements[1].is_empty());
    }

    #[test]
    fn test_missing_from_is_expected_keyword() {
        let err = Parser::parse("SELECT id").expect_err("missing FROM");
        assert!(matches!(
            err,
            Error::ExpectedKeyword {
                keyword: Keyword::From,
                ..
            }
        ));
    }

    #[test]
    fn test_keyword_cannot_be_bare_identifier() {
        let err = Parser::parse("SELECT select FROM t").expect_err("keyword as identifier");
        assert!(matches!(err, Error::UnexpectedToken { .. }));
    }

    #[test]
    fn test_numeric_parameter_must_be_integer() {
        let err = Parser::parse("CREATE TABLE t (v varchar(2.5))").expect_err("decimal length");
        assert!(matches!(err, Error::UnexpectedToken { .. }));
    }

    #[test]
    fn test_trailing_comment_is_allowed() {
        let statement = parse("SELECT id FROM users -- the lot\n");
        assert!(matches!(statement, Statement::Select(_)));
    }
}
