//! SQL tokenizer and the one-token-lookahead stream the parser consumes.

use crate::error::{Error, Result};

use super::{Cursor, NumberValue, Token, TokenKind};

/// Low-level scanner that walks the input character by character, tracking
/// line and column.
struct Scanner<'a> {
    input: &'a str,
    pos: usize,
    line: u32,
    column: u32,
}

impl<'a> Scanner<'a> {
    const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the character after the current one without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    const fn cursor(&self) -> Cursor {
        Cursor::new(self.line, self.column)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    /// Scans an identifier (letters, digits, underscore).
    fn scan_identifier(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.advance();
        }
        String::from(&self.input[start..self.pos])
    }

    /// Scans a number; integer unless a fractional part or exponent appears.
    fn scan_number(&mut self, cursor: Cursor) -> Result<NumberValue> {
        let start = self.pos;
        let mut is_float = false;

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        if self.peek().is_some_and(|c| c == 'e' || c == 'E') {
            is_float = true;
            self.advance();
            if self.peek().is_some_and(|c| c == '+' || c == '-') {
                self.advance();
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let text = &self.input[start..self.pos];
        if is_float {
            text.parse::<f64>()
                .map(NumberValue::Float)
                .map_err(|_| Error::UnexpectedToken {
                    found: String::from(text),
                    cursor,
                })
        } else {
            text.parse::<i64>()
                .map(NumberValue::Integer)
                .map_err(|_| Error::UnexpectedToken {
                    found: String::from(text),
                    cursor,
                })
        }
    }

    /// Scans a single-quoted string literal, `''` unescaping to `'`.
    fn scan_string(&mut self, cursor: Cursor) -> Result<String> {
        self.advance(); // opening quote
        let mut value = String::new();
        loop {
            match self.peek() {
                Some('\'') => {
                    if self.peek_next() == Some('\'') {
                        value.push('\'');
                        self.advance();
                        self.advance();
                    } else {
                        self.advance();
                        return Ok(value);
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
                None => return Err(Error::UnexpectedEndOfInput { cursor }),
            }
        }
    }

    /// Scans a double-quoted identifier, case and spacing kept verbatim.
    fn scan_quoted_identifier(&mut self, cursor: Cursor) -> Result<String> {
        self.advance(); // opening quote
        let start = self.pos;
        loop {
            match self.peek() {
                Some('"') => {
                    let value = String::from(&self.input[start..self.pos]);
                    self.advance();
                    return Ok(value);
                }
                Some(_) => {
                    self.advance();
                }
                None => return Err(Error::UnexpectedEndOfInput { cursor }),
            }
        }
    }

    /// Scans a `--` line comment (the leading dashes are already known to
    /// be present).
    fn scan_comment(&mut self) -> String {
        self.advance();
        self.advance();
        let start = self.pos;
        while self.peek().is_some_and(|c| c != '\n') {
            self.advance();
        }
        String::from(&self.input[start..self.pos])
    }

    /// Scans the next token, or the `Eof` sentinel once input is exhausted.
    fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();
        let cursor = self.cursor();

        let Some(c) = self.peek() else {
            return Ok(Token::new(TokenKind::Eof, cursor));
        };

        let kind = match c {
            '(' | ')' | ',' | '.' | ';' => {
                self.advance();
                TokenKind::Punctuation(c)
            }
            '*' => {
                self.advance();
                TokenKind::Star
            }
            '+' => {
                self.advance();
                TokenKind::Operator("+")
            }
            '/' => {
                self.advance();
                TokenKind::Operator("/")
            }
            '-' => {
                if self.peek_next() == Some('-') {
                    TokenKind::Comment(self.scan_comment())
                } else {
                    self.advance();
                    TokenKind::Operator("-")
                }
            }
            '=' => {
                self.advance();
                TokenKind::Operator("=")
            }
            '<' => {
                self.advance();
                if self.peek() == Some('>') {
                    self.advance();
                    TokenKind::Operator("<>")
                } else if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::Operator("<=")
                } else {
                    TokenKind::Operator("<")
                }
            }
            '>' => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::Operator(">=")
                } else {
                    TokenKind::Operator(">")
                }
            }
            ':' => {
                self.advance();
                if self.peek().is_some_and(|c| c.is_alphabetic() || c == '_') {
                    TokenKind::NamedVariable(self.scan_identifier())
                } else {
                    return Err(Error::Lex { ch: ':', cursor });
                }
            }
            '$' => {
                self.advance();
                if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    let digits = self.scan_identifier();
                    let position = digits.parse::<u32>().map_err(|_| Error::UnexpectedToken {
                        found: format!("${digits}"),
                        cursor,
                    })?;
                    TokenKind::IndexedVariable(position)
                } else {
                    return Err(Error::Lex { ch: '$', cursor });
                }
            }
            '\'' => TokenKind::String(self.scan_string(cursor)?),
            '"' => TokenKind::QuotedIdentifier(self.scan_quoted_identifier(cursor)?),
            c if c.is_ascii_digit() => TokenKind::Number(self.scan_number(cursor)?),
            c if c.is_alphabetic() || c == '_' => TokenKind::Identifier(self.scan_identifier()),
            _ => return Err(Error::Lex { ch: c, cursor }),
        };

        Ok(Token::new(kind, cursor))
    }
}

/// A lazily lexed token stream with one-token lookahead.
///
/// `next` consumes; `peek` looks ahead and fails at end of input while
/// `maybe_peek` returns the `Eof` sentinel instead. `cursor` reports the
/// position of the most recently consumed token, which the parser attaches
/// to AST nodes for diagnostics.
pub struct TokenStream<'a> {
    scanner: Scanner<'a>,
    peeked: Option<Token>,
    last_cursor: Cursor,
}

impl<'a> TokenStream<'a> {
    /// Creates a stream over the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            scanner: Scanner::new(input),
            peeked: None,
            last_cursor: Cursor::start(),
        }
    }

    /// Returns the next token without consuming it; at end of input the
    /// `Eof` sentinel is returned rather than an error.
    pub fn maybe_peek(&mut self) -> Result<&Token> {
        if self.peeked.is_none() {
            self.peeked = Some(self.scanner.next_token()?);
        }
        match self.peeked.as_ref() {
            Some(token) => Ok(token),
            // The lookahead was filled just above.
            None => Err(Error::UnexpectedEndOfInput {
                cursor: self.last_cursor,
            }),
        }
    }

    /// Returns the next token without consuming it.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::UnexpectedEndOfInput`] when the input is
    /// exhausted, or with a lex error for an unrecognized character.
    pub fn peek(&mut self) -> Result<&Token> {
        let last = self.last_cursor;
        let token = self.maybe_peek()?;
        if token.is_eof() {
            return Err(Error::UnexpectedEndOfInput { cursor: last });
        }
        Ok(token)
    }

    /// Consumes and returns the next token.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::UnexpectedEndOfInput`] when the input is
    /// exhausted, or with a lex error for an unrecognized character.
    pub fn next(&mut self) -> Result<Token> {
        if self.peeked.is_none() {
            self.peeked = Some(self.scanner.next_token()?);
        }
        match self.peeked.take() {
            Some(token) if token.is_eof() => {
                self.peeked = Some(token);
                Err(Error::UnexpectedEndOfInput {
                    cursor: self.last_cursor,
                })
            }
            Some(token) => {
                self.last_cursor = token.cursor;
                Ok(token)
            }
            // The lookahead was filled just above.
            None => Err(Error::UnexpectedEndOfInput {
                cursor: self.last_cursor,
            }),
        }
    }

    /// Returns true once every token has been consumed.
    ///
    /// A pending lex error does not count as end of input; it surfaces on
    /// the next `peek`/`next` call instead.
    pub fn eof(&mut self) -> bool {
        matches!(self.maybe_peek(), Ok(token) if token.is_eof())
    }

    /// The position of the most recently consumed token.
    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.last_cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &str) -> Vec<TokenKind> {
        let mut stream = TokenStream::new(input);
        let mut kinds = Vec::new();
        while !stream.eof() {
            kinds.push(stream.next().expect("token").kind);
        }
        kinds
    }

    #[test]
    fn test_empty_input() {
        let mut stream = TokenStream::new("   \n\t ");
        assert!(stream.eof());
        assert!(matches!(
            stream.next(),
            Err(Error::UnexpectedEndOfInput { .. })
        ));
    }

    #[test]
    fn test_identifiers_and_punctuation() {
        assert_eq!(
            collect("users.id, name"),
            vec![
                TokenKind::Identifier(String::from("users")),
                TokenKind::Punctuation('.'),
                TokenKind::Identifier(String::from("id")),
                TokenKind::Punctuation(','),
                TokenKind::Identifier(String::from("name")),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            collect("42 3.14 1e3"),
            vec![
                TokenKind::Number(NumberValue::Integer(42)),
                TokenKind::Number(NumberValue::Float(3.14)),
                TokenKind::Number(NumberValue::Float(1e3)),
            ]
        );
    }

    #[test]
    fn test_string_with_escaped_quote() {
        assert_eq!(
            collect("'it''s'"),
            vec![TokenKind::String(String::from("it's"))]
        );
    }

    #[test]
    fn test_quoted_identifier_preserves_case_and_spacing() {
        assert_eq!(
            collect("\"Mixed Case\""),
            vec![TokenKind::QuotedIdentifier(String::from("Mixed Case"))]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            collect("= <> < <= > >= + - / *"),
            vec![
                TokenKind::Operator("="),
                TokenKind::Operator("<>"),
                TokenKind::Operator("<"),
                TokenKind::Operator("<="),
                TokenKind::Operator(">"),
                TokenKind::Operator(">="),
                TokenKind::Operator("+"),
                TokenKind::Operator("-"),
                TokenKind::Operator("/"),
                TokenKind::Star,
            ]
        );
    }

    #[test]
    fn test_variables() {
        assert_eq!(
            collect(":name $1 $12"),
            vec![
                TokenKind::NamedVariable(String::from("name")),
                TokenKind::IndexedVariable(1),
                TokenKind::IndexedVariable(12),
            ]
        );
    }

    #[test]
    fn test_line_comment_is_a_token() {
        assert_eq!(
            collect("id -- trailing note\nname"),
            vec![
                TokenKind::Identifier(String::from("id")),
                TokenKind::Comment(String::from(" trailing note")),
                TokenKind::Identifier(String::from("name")),
            ]
        );
    }

    #[test]
    fn test_unrecognized_character() {
        let mut stream = TokenStream::new("id ^ name");
        stream.next().expect("id");
        let err = stream.next().expect_err("lex error");
        assert!(matches!(err, Error::Lex { ch: '^', cursor } if cursor == Cursor::new(1, 4)));
    }

    #[test]
    fn test_cursor_tracks_lines_and_columns() {
        let mut stream = TokenStream::new("SELECT\n  id");
        let select = stream.next().expect("select");
        assert_eq!(select.cursor, Cursor::new(1, 1));
        let id = stream.next().expect("id");
        assert_eq!(id.cursor, Cursor::new(2, 3));
        assert_eq!(stream.cursor(), Cursor::new(2, 3));
    }

    #[test]
    fn test_bare_colon_is_a_lex_error() {
        let mut stream = TokenStream::new(": x");
        assert!(matches!(stream.next(), Err(Error::Lex { ch: ':', .. })));
    }
}
