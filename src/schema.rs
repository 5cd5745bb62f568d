//! Column and data type definitions shared by the parser and the row store.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataType {
    /// Signed 64-bit integer.
    Integer,
    /// IEEE-754 double.
    Float,
    /// UTF-8 text.
    Text,
    /// Boolean.
    Boolean,
}

impl DataType {
    /// Parses a data type from its uppercased keyword spelling.
    #[must_use]
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "INTEGER" => Some(Self::Integer),
            "FLOAT" => Some(Self::Float),
            "TEXT" => Some(Self::Text),
            "BOOLEAN" => Some(Self::Boolean),
            _ => None,
        }
    }

    /// Returns the SQL keyword spelling.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Float => "FLOAT",
            Self::Text => "TEXT",
            Self::Boolean => "BOOLEAN",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A column declared in `CREATE TABLE`.
///
/// `primary_key` implies both `unique` and `not_null`; at most one primary
/// key column per table is expected, but that isn't structurally enforced
/// here (see the design notes on why).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name, unique within its table.
    pub name: String,
    /// Declared type.
    pub dtype: DataType,
    /// Whether this column is the primary key.
    pub primary_key: bool,
    /// Whether this column has a UNIQUE constraint.
    pub unique: bool,
    /// Whether this column is NOT NULL.
    pub not_null: bool,
}

impl Column {
    /// Creates a column, folding `primary_key` into `unique`/`not_null`
    /// the way the engine's other constructors expect.
    #[must_use]
    pub fn new(name: impl Into<String>, dtype: DataType) -> Self {
        Self {
            name: name.into(),
            dtype,
            primary_key: false,
            unique: false,
            not_null: false,
        }
    }

    /// Marks the column as the primary key (implies unique + not null).
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.unique = true;
        self.not_null = true;
        self
    }

    /// Marks the column as UNIQUE.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Marks the column as NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Whether an ordered index should be maintained for this column.
    #[must_use]
    pub const fn is_indexed(&self) -> bool {
        self.unique
    }
}
