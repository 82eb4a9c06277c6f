//! Identifiers with dual spelling: normalized for lookups, original for
//! diagnostics and output.

use core::fmt;

use crate::lexer::Cursor;

/// An identifier as it appeared in the source.
///
/// Unquoted identifiers are matched case-insensitively: `value` holds the
/// lowercased spelling used for schema lookups while `original` keeps the
/// source spelling. Quoted identifiers keep their exact spelling in both
/// fields and match exact-case only.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    /// Normalized (lowercased) spelling; exact spelling when quoted.
    pub value: String,
    /// The spelling as written in the source.
    pub original: String,
    /// Whether the identifier was double-quoted.
    pub quoted: bool,
    /// Position of the identifier's first character.
    pub cursor: Cursor,
}

impl Ident {
    /// Creates an unquoted identifier, normalizing the lookup spelling.
    #[must_use]
    pub fn new(original: impl Into<String>, cursor: Cursor) -> Self {
        let original = original.into();
        Self {
            value: original.to_lowercase(),
            original,
            quoted: false,
            cursor,
        }
    }

    /// Creates a quoted identifier; spelling is preserved verbatim.
    #[must_use]
    pub fn quoted(original: impl Into<String>, cursor: Cursor) -> Self {
        let original = original.into();
        Self {
            value: original.clone(),
            original,
            quoted: true,
            cursor,
        }
    }

    /// Whether this identifier names the same thing as `other`.
    ///
    /// Unquoted spellings are normalized at construction, so comparing the
    /// `value` fields gives case-insensitive matching for unquoted names
    /// and exact-case matching as soon as a side is quoted.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.value == other.value
    }

    /// Whether this identifier matches a plain (unquoted, normalized) name.
    #[must_use]
    pub fn matches_str(&self, name: &str) -> bool {
        if self.quoted {
            self.value == name
        } else {
            self.value.eq_ignore_ascii_case(name)
        }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quoted {
            write!(f, "\"{}\"", self.original)
        } else {
            f.write_str(&self.original)
        }
    }
}
