//! Error types for parsing and resolution.
//!
//! Every error that carries a [`Cursor`] can be rendered by callers as
//! `file X, line L column C: message`; the core itself never touches the
//! file system and leaves the `file X` part to its caller.

use crate::ast::SqlType;
use crate::lexer::Cursor;
use crate::registry::Keyword;

/// Errors produced by the lexer, the parser, the schema builder, and the
/// query resolvers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The lexer hit a character it has no rule for.
    #[error("unrecognized character `{ch}` at {cursor}")]
    Lex {
        /// The offending character.
        ch: char,
        /// Where it was found.
        cursor: Cursor,
    },

    /// The token stream ran out while more input was required.
    #[error("unexpected end of input after {cursor}")]
    UnexpectedEndOfInput {
        /// Position of the last consumed token.
        cursor: Cursor,
    },

    /// A token that no grammar rule accepts at this point.
    #[error("unexpected token `{found}` at {cursor}")]
    UnexpectedToken {
        /// Rendering of the offending token.
        found: String,
        /// Where it was found.
        cursor: Cursor,
    },

    /// A specific keyword was required.
    #[error("expected keyword {keyword}, found `{found}` at {cursor}")]
    ExpectedKeyword {
        /// The keyword the grammar called for.
        keyword: Keyword,
        /// Rendering of the actual token.
        found: String,
        /// Where it was found.
        cursor: Cursor,
    },

    /// A specific punctuation token was required.
    #[error("expected `{punctuation}`, found `{found}` at {cursor}")]
    ExpectedPunctuation {
        /// The punctuation the grammar called for.
        punctuation: char,
        /// Rendering of the actual token.
        found: String,
        /// Where it was found.
        cursor: Cursor,
    },

    /// A data type name was required (in a column definition).
    #[error("expected a data type, found `{found}` at {cursor}")]
    ExpectedDataType {
        /// Rendering of the actual token.
        found: String,
        /// Where it was found.
        cursor: Cursor,
    },

    /// Two `CREATE TABLE` statements declare the same table name.
    #[error("duplicate table `{table}` at {cursor}")]
    DuplicateTable {
        /// The colliding table name.
        table: String,
        /// Position of the second declaration.
        cursor: Cursor,
    },

    /// A FROM clause or column qualifier names a table the schema does not
    /// know (or an alias that is not in scope).
    #[error("unknown table `{table}` at {cursor}")]
    UnknownTable {
        /// The unresolved table or alias name.
        table: String,
        /// Where it was referenced.
        cursor: Cursor,
    },

    /// The same alias is bound twice in one FROM clause.
    #[error("duplicate alias `{alias}` at {cursor}")]
    DuplicateAlias {
        /// The colliding alias.
        alias: String,
        /// Position of the second binding.
        cursor: Cursor,
    },

    /// A column reference matches no table in scope.
    #[error("unknown column `{column}` at {cursor}")]
    UnknownColumn {
        /// The unresolved column name.
        column: String,
        /// Where it was referenced.
        cursor: Cursor,
    },

    /// An unqualified column reference matches more than one table in scope.
    #[error("ambiguous column `{column}` at {cursor}")]
    AmbiguousColumn {
        /// The ambiguous column name.
        column: String,
        /// Where it was referenced.
        cursor: Cursor,
    },

    /// One variable was inferred with two incompatible types.
    #[error("variable `{variable}` used as {second} at {cursor} but previously inferred as {first}")]
    VariableTypeConflict {
        /// The variable, rendered as `:name` or `$n`.
        variable: String,
        /// The type from the earlier occurrence.
        first: SqlType,
        /// The conflicting type.
        second: SqlType,
        /// Position of the conflicting occurrence.
        cursor: Cursor,
    },

    /// A variable appears in no context that determines its type.
    #[error("cannot infer a type for variable `{variable}` at {cursor}")]
    UnresolvedVariableType {
        /// The variable, rendered as `:name` or `$n`.
        variable: String,
        /// Position of its first occurrence.
        cursor: Cursor,
    },

    /// A query document does not hold exactly one supported statement.
    #[error("invalid query document: {reason}")]
    InvalidQueryDocument {
        /// What was wrong with the document.
        reason: String,
        /// Position of the offending statement, where one exists.
        cursor: Option<Cursor>,
    },
}

impl Error {
    /// Returns the source position attached to this error, if any.
    #[must_use]
    pub const fn cursor(&self) -> Option<Cursor> {
        match self {
            Self::Lex { cursor, .. }
            | Self::UnexpectedEndOfInput { cursor }
            | Self::UnexpectedToken { cursor, .. }
            | Self::ExpectedKeyword { cursor, .. }
            | Self::ExpectedPunctuation { cursor, .. }
            | Self::ExpectedDataType { cursor, .. }
            | Self::DuplicateTable { cursor, .. }
            | Self::UnknownTable { cursor, .. }
            | Self::DuplicateAlias { cursor, .. }
            | Self::UnknownColumn { cursor, .. }
            | Self::AmbiguousColumn { cursor, .. }
            | Self::VariableTypeConflict { cursor, .. }
            | Self::UnresolvedVariableType { cursor, .. } => Some(*cursor),
            Self::InvalidQueryDocument { cursor, .. } => *cursor,
        }
    }
}

/// Result type for all parse and resolve operations.
pub type Result<T> = std::result::Result<T, Error>;
