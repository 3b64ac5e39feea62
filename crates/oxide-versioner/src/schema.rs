//! Schema object descriptions.
//!
//! These are immutable values a migration builds and hands to the
//! [`DdlGenerator`](crate::generator::DdlGenerator). They carry no dialect
//! knowledge; each dialect decides how (and whether) to render them.

use serde::{Deserialize, Serialize};

/// Portable column types, mirroring the ANSI/JDBC type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// Single bit.
    Bit,
    /// Boolean.
    Boolean,
    /// 8-bit integer.
    TinyInt,
    /// 16-bit integer.
    SmallInt,
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    BigInt,
    /// Single precision float.
    Real,
    /// Float with optional precision.
    Float,
    /// Double precision float.
    Double,
    /// Exact numeric with precision and scale.
    Numeric,
    /// Exact decimal with precision and scale.
    Decimal,
    /// Fixed-length character string.
    Char,
    /// Variable-length character string.
    Varchar,
    /// Long variable-length character string.
    LongVarchar,
    /// Character large object.
    Clob,
    /// Date only.
    Date,
    /// Time only.
    Time,
    /// Date and time.
    Timestamp,
    /// Fixed-length binary.
    Binary,
    /// Variable-length binary.
    VarBinary,
    /// Long variable-length binary.
    LongVarBinary,
    /// Binary large object.
    Blob,
}

impl ColumnType {
    /// Returns true for the exact numeric types, which always accept a
    /// precision/scale clause.
    #[must_use]
    pub const fn is_exact_numeric(self) -> bool {
        matches!(self, Self::Numeric | Self::Decimal)
    }
}

/// Behavior of a foreign key when the referenced row is deleted or updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CascadeRule {
    /// No referential action.
    #[default]
    None,
    /// Cascade the change to referencing rows.
    Cascade,
    /// Set the referencing columns to NULL.
    SetNull,
}

impl CascadeRule {
    /// Returns the SQL action keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::None => "NO ACTION",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
        }
    }
}

/// Description of a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Portable type.
    pub column_type: ColumnType,
    /// Length for length-bearing types.
    pub length: Option<u32>,
    /// Whether the column allows NULL values.
    pub nullable: bool,
    /// Whether this column is part of the primary key.
    pub primary_key: bool,
    /// Default value, rendered as a quoted literal.
    pub default: Option<String>,
    /// Whether this column auto-increments.
    pub autoincrement: bool,
    /// Precision for numeric types.
    pub precision: Option<u32>,
    /// Scale for numeric types. Requires `precision`.
    pub scale: Option<u32>,
}

impl Column {
    /// Creates a nullable column with no length, default or key flags.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            length: None,
            nullable: true,
            primary_key: false,
            default: None,
            autoincrement: false,
            precision: None,
            scale: None,
        }
    }

    /// Sets the length.
    #[must_use]
    pub fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    /// Sets the column as NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Sets the column as nullable.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Marks the column as (part of) the primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the column to auto-increment.
    #[must_use]
    pub fn autoincrement(mut self) -> Self {
        self.autoincrement = true;
        self
    }

    /// Sets the precision.
    #[must_use]
    pub fn precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Sets the scale.
    #[must_use]
    pub fn scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self
    }
}

/// Description of a table to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Table name.
    pub name: String,
    /// Columns in declaration order.
    pub columns: Vec<Column>,
}

impl Table {
    /// Creates a table with no columns.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Creates a table from a list of columns.
    #[must_use]
    pub fn with_columns(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Adds a column.
    #[must_use]
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Returns the primary key columns in declaration order.
    pub fn primary_key_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.primary_key)
    }

    /// Gets a column by name.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Description of an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    /// Index name.
    pub name: String,
    /// Owning table.
    pub table: String,
    /// Indexed columns in order.
    pub columns: Vec<String>,
    /// Whether this is a unique index.
    pub unique: bool,
    /// Whether this index backs the primary key.
    pub primary_key: bool,
}

impl Index {
    /// Creates a non-unique index.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            table: table.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            unique: false,
            primary_key: false,
        }
    }

    /// Marks the index as unique.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Marks the index as the primary key index.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }
}

/// Description of a foreign key constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Constraint name.
    pub name: String,
    /// Referencing table.
    pub child_table: String,
    /// Referencing columns.
    pub child_columns: Vec<String>,
    /// Referenced table.
    pub parent_table: String,
    /// Referenced columns.
    pub parent_columns: Vec<String>,
    /// Rule applied when the parent row is deleted.
    pub on_delete: CascadeRule,
    /// Rule applied when the parent key is updated.
    pub on_update: CascadeRule,
}

impl ForeignKey {
    /// Creates a foreign key with no cascade rules.
    #[must_use]
    pub fn new<C, P, S, T>(
        name: impl Into<String>,
        child_table: impl Into<String>,
        child_columns: C,
        parent_table: impl Into<String>,
        parent_columns: P,
    ) -> Self
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
        P: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            name: name.into(),
            child_table: child_table.into(),
            child_columns: child_columns.into_iter().map(Into::into).collect(),
            parent_table: parent_table.into(),
            parent_columns: parent_columns.into_iter().map(Into::into).collect(),
            on_delete: CascadeRule::None,
            on_update: CascadeRule::None,
        }
    }

    /// Sets the delete rule.
    #[must_use]
    pub fn on_delete(mut self, rule: CascadeRule) -> Self {
        self.on_delete = rule;
        self
    }

    /// Sets the update rule.
    #[must_use]
    pub fn on_update(mut self, rule: CascadeRule) -> Self {
        self.on_update = rule;
        self
    }
}
