//! DDL AST types: data types, constraints, and column definitions.

use core::fmt;

use serde::Serialize;

use crate::lexer::Cursor;

use super::expression::ColumnRef;
use super::ident::Ident;

/// Data types that take no parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SimpleType {
    /// BOOL / BOOLEAN.
    Bool,
    /// SMALLINT.
    SmallInt,
    /// INT / INTEGER.
    Int,
    /// BIGINT.
    BigInt,
    /// REAL.
    Real,
    /// TEXT.
    Text,
    /// UUID.
    Uuid,
    /// DATE.
    Date,
    /// TIME.
    Time,
    /// TIMESTAMP.
    Timestamp,
    /// TIMESTAMPTZ.
    TimestampTz,
    /// JSON.
    Json,
    /// JSONB.
    Jsonb,
    /// BYTEA.
    Bytea,
    /// SMALLSERIAL (integer-backed, auto-incrementing).
    SmallSerial,
    /// SERIAL.
    Serial,
    /// BIGSERIAL.
    BigSerial,
}

impl SimpleType {
    /// Returns the SQL spelling of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "BOOL",
            Self::SmallInt => "SMALLINT",
            Self::Int => "INT",
            Self::BigInt => "BIGINT",
            Self::Real => "REAL",
            Self::Text => "TEXT",
            Self::Uuid => "UUID",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Timestamp => "TIMESTAMP",
            Self::TimestampTz => "TIMESTAMPTZ",
            Self::Json => "JSON",
            Self::Jsonb => "JSONB",
            Self::Bytea => "BYTEA",
            Self::SmallSerial => "SMALLSERIAL",
            Self::Serial => "SERIAL",
            Self::BigSerial => "BIGSERIAL",
        }
    }
}

/// Data types that take one optional integer parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SizedType {
    /// CHAR(n).
    Char,
    /// VARCHAR(n).
    VarChar,
    /// BIT(n).
    Bit,
    /// VARBIT(n).
    VarBit,
}

impl SizedType {
    /// Returns the SQL spelling of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Char => "CHAR",
            Self::VarChar => "VARCHAR",
            Self::Bit => "BIT",
            Self::VarBit => "VARBIT",
        }
    }
}

/// Data types that take optional (precision, scale) parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NumericType {
    /// NUMERIC(p, s).
    Numeric,
    /// DECIMAL(p, s).
    Decimal,
}

impl NumericType {
    /// Returns the SQL spelling of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Numeric => "NUMERIC",
            Self::Decimal => "DECIMAL",
        }
    }
}

/// Scalar type families, used to decide whether two inferred variable types
/// are compatible (lengths, precision, and serial-ness are not identity).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFamily {
    /// Booleans.
    Boolean,
    /// Whole-number types, including the serial variants.
    Integer,
    /// Binary floating point.
    Float,
    /// Arbitrary-precision decimals.
    Decimal,
    /// Character data.
    Text,
    /// UUIDs.
    Uuid,
    /// Calendar dates.
    Date,
    /// Times of day.
    Time,
    /// Timestamps with or without time zone.
    Timestamp,
    /// JSON documents.
    Json,
    /// Raw bytes.
    Bytes,
    /// Bit strings.
    Bits,
}

/// A SQL scalar type, as parsed from a column definition and as reported in
/// resolved output columns and variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    /// A type without parameters (e.g., `TEXT`, `UUID`, `BOOL`).
    Simple(SimpleType),
    /// A type with an optional integer parameter (e.g., `VARCHAR(255)`).
    Sized {
        /// The base type.
        base: SizedType,
        /// The declared length, if any.
        length: Option<u32>,
    },
    /// A decimal type with optional precision and scale.
    Numeric {
        /// The base type (NUMERIC or DECIMAL).
        base: NumericType,
        /// Declared `(precision, scale)`, if any.
        precision_scale: Option<(u16, u16)>,
    },
}

impl SqlType {
    /// The scalar family this type belongs to.
    #[must_use]
    pub const fn family(self) -> TypeFamily {
        match self {
            Self::Simple(simple) => match simple {
                SimpleType::Bool => TypeFamily::Boolean,
                SimpleType::SmallInt
                | SimpleType::Int
                | SimpleType::BigInt
                | SimpleType::SmallSerial
                | SimpleType::Serial
                | SimpleType::BigSerial => TypeFamily::Integer,
                SimpleType::Real => TypeFamily::Float,
                SimpleType::Text => TypeFamily::Text,
                SimpleType::Uuid => TypeFamily::Uuid,
                SimpleType::Date => TypeFamily::Date,
                SimpleType::Time => TypeFamily::Time,
                SimpleType::Timestamp | SimpleType::TimestampTz => TypeFamily::Timestamp,
                SimpleType::Json | SimpleType::Jsonb => TypeFamily::Json,
                SimpleType::Bytea => TypeFamily::Bytes,
            },
            Self::Sized { base, .. } => match base {
                SizedType::Char | SizedType::VarChar => TypeFamily::Text,
                SizedType::Bit | SizedType::VarBit => TypeFamily::Bits,
            },
            Self::Numeric { .. } => TypeFamily::Decimal,
        }
    }

    /// Whether a variable inferred as `self` may also be used where `other`
    /// is expected.
    #[must_use]
    pub const fn is_compatible_with(self, other: Self) -> bool {
        matches!(
            (self.family(), other.family()),
            (TypeFamily::Boolean, TypeFamily::Boolean)
                | (TypeFamily::Integer, TypeFamily::Integer)
                | (TypeFamily::Float, TypeFamily::Float)
                | (TypeFamily::Decimal, TypeFamily::Decimal)
                | (TypeFamily::Text, TypeFamily::Text)
                | (TypeFamily::Uuid, TypeFamily::Uuid)
                | (TypeFamily::Date, TypeFamily::Date)
                | (TypeFamily::Time, TypeFamily::Time)
                | (TypeFamily::Timestamp, TypeFamily::Timestamp)
                | (TypeFamily::Json, TypeFamily::Json)
                | (TypeFamily::Bytes, TypeFamily::Bytes)
                | (TypeFamily::Bits, TypeFamily::Bits)
        )
    }

    /// Rewrites the serial pseudo-types to the integer types that back
    /// them; every other type is returned unchanged.
    #[must_use]
    pub const fn desugar_serial(self) -> Self {
        match self {
            Self::Simple(SimpleType::SmallSerial) => Self::Simple(SimpleType::SmallInt),
            Self::Simple(SimpleType::Serial) => Self::Simple(SimpleType::Int),
            Self::Simple(SimpleType::BigSerial) => Self::Simple(SimpleType::BigInt),
            other => other,
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple(simple) => f.write_str(simple.as_str()),
            Self::Sized { base, length } => match length {
                Some(n) => write!(f, "{}({n})", base.as_str()),
                None => f.write_str(base.as_str()),
            },
            Self::Numeric {
                base,
                precision_scale,
            } => match precision_scale {
                Some((p, s)) => write!(f, "{}({p}, {s})", base.as_str()),
                None => f.write_str(base.as_str()),
            },
        }
    }
}

impl Serialize for SqlType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A constraint attached to a single column definition.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// NOT NULL.
    NotNull,
    /// PRIMARY KEY.
    PrimaryKey,
    /// UNIQUE.
    Unique,
    /// REFERENCES table(column).
    Reference(ColumnRef),
}

/// One column of a `CREATE TABLE` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    /// Column name.
    pub name: Ident,
    /// Declared data type.
    pub data_type: SqlType,
    /// Constraints, in declaration order.
    pub constraints: Vec<Constraint>,
    /// Position of the column name.
    pub cursor: Cursor,
}

impl ColumnDef {
    /// Whether the column declares NOT NULL or PRIMARY KEY directly.
    #[must_use]
    pub fn declares_not_null(&self) -> bool {
        self.constraints
            .iter()
            .any(|c| matches!(c, Constraint::NotNull | Constraint::PrimaryKey))
    }
}

/// A table-level `PRIMARY KEY (col, ...)` constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryKeyTableConstraint {
    /// The key columns.
    pub columns: Vec<Ident>,
    /// Position of the PRIMARY keyword.
    pub cursor: Cursor,
}

/// One item inside the parentheses of a `CREATE TABLE` statement.
#[derive(Debug, Clone, PartialEq)]
pub enum TableItem {
    /// A column definition.
    Column(ColumnDef),
    /// A table-level primary key.
    PrimaryKey(PrimaryKeyTableConstraint),
}
