//! Token types for the SQL lexer.

use core::fmt;

use super::Cursor;

/// A numeric literal value, split the way SQL distinguishes them: an
/// integer unless a fractional part or exponent is present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberValue {
    /// Integer literal (e.g., 42).
    Integer(i64),
    /// Float literal (e.g., 3.14 or 1e10).
    Float(f64),
}

impl fmt::Display for NumberValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
        }
    }
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Bare identifier or keyword (e.g., `users`, `SELECT`); the parser
    /// decides which via the keyword registry.
    Identifier(String),
    /// Double-quoted identifier with case and spacing preserved verbatim.
    QuotedIdentifier(String),
    /// Numeric literal.
    Number(NumberValue),
    /// Single-quoted string literal.
    String(String),
    /// One of `(` `)` `,` `.` `;`.
    Punctuation(char),
    /// Binary operator symbol: `=`, `<>`, `<`, `<=`, `>`, `>=`, `+`, `-`, `/`.
    Operator(&'static str),
    /// `*`, kept separate from operators because its meaning is
    /// context-sensitive (wildcard in a select list, multiplication in an
    /// expression).
    Star,
    /// Named variable `:name`.
    NamedVariable(String),
    /// Indexed variable `$n`.
    IndexedVariable(u32),
    /// A `--` line comment; tokenized but invisible to the grammar.
    Comment(String),
    /// End of input sentinel.
    Eof,
}

impl TokenKind {
    /// Returns true for comment tokens.
    #[must_use]
    pub const fn is_comment(&self) -> bool {
        matches!(self, Self::Comment(_))
    }

    /// Returns true for the end-of-input sentinel.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(s) => f.write_str(s),
            Self::QuotedIdentifier(s) => write!(f, "\"{s}\""),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "'{s}'"),
            Self::Punctuation(c) => write!(f, "{c}"),
            Self::Operator(op) => f.write_str(op),
            Self::Star => f.write_str("*"),
            Self::NamedVariable(name) => write!(f, ":{name}"),
            Self::IndexedVariable(n) => write!(f, "${n}"),
            Self::Comment(_) => f.write_str("--"),
            Self::Eof => f.write_str("<end of input>"),
        }
    }
}

/// A token with the position it starts at.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The position of the token's first character.
    pub cursor: Cursor,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, cursor: Cursor) -> Self {
        Self { kind, cursor }
    }

    /// Returns true if this is the end-of-input sentinel.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        self.kind.is_eof()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_display() {
        assert_eq!(TokenKind::Punctuation('(').to_string(), "(");
        assert_eq!(TokenKind::NamedVariable(String::from("id")).to_string(), ":id");
        assert_eq!(TokenKind::IndexedVariable(2).to_string(), "$2");
        assert_eq!(TokenKind::Operator("<>").to_string(), "<>");
    }

    #[test]
    fn test_number_value_display() {
        assert_eq!(NumberValue::Integer(42).to_string(), "42");
        assert_eq!(NumberValue::Float(0.5).to_string(), "0.5");
    }
}
