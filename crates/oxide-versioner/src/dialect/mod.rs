//! Database dialects.
//!
//! Each supported product is one variant of the closed [`Dialect`]
//! enumeration. Per-product knowledge lives in the submodules as a
//! [`Features`] table plus a type-name mapping; the generator consults them
//! and matches on the variant where statement syntax diverges.

mod derby;
mod generic;
mod h2;
mod mysql;
mod oracle;
mod postgres;
mod sqlite;
mod sqlserver;

use serde::{Deserialize, Serialize};

use crate::schema::{CascadeRule, ColumnType};

/// How a dialect expresses an auto-incrementing column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoIncrement {
    /// Not expressible; the request is dropped with a warning.
    Unsupported,
    /// A keyword placed after the NOT NULL/DEFAULT modifiers.
    Keyword(&'static str),
    /// A keyword that is only legal directly after an inline `PRIMARY KEY`.
    PrimaryKeySuffix(&'static str),
    /// The integer type itself is swapped for a serial pseudo-type.
    SerialType,
}

/// Static capabilities of a dialect.
#[derive(Debug, Clone, Copy)]
pub struct Features {
    /// Human readable dialect name, used in warnings and errors.
    pub name: &'static str,
    /// Opening and closing identifier quote.
    pub quote: (char, char),
    /// Auto-increment support.
    pub autoincrement: AutoIncrement,
    /// Whether `ADD COLUMN` accepts a position.
    pub column_position: bool,
    /// Keyword used by `ALTER TABLE .. <kw> <column>`.
    pub add_column: &'static str,
    /// Maximum number of primary key columns.
    pub max_primary_key_columns: Option<usize>,
    /// Maximum number of columns in an index.
    pub max_index_columns: Option<usize>,
    /// Cascade rules accepted in `ON DELETE`.
    pub delete_rules: &'static [CascadeRule],
    /// Cascade rules accepted in `ON UPDATE`.
    pub update_rules: &'static [CascadeRule],
    /// Whether a primary key constraint creates its own index.
    pub creates_primary_key_index: bool,
    /// Types rendered with a `(length)` clause.
    pub length_types: &'static [ColumnType],
    /// Types besides NUMERIC/DECIMAL rendered with a `(precision, scale)` clause.
    pub scale_types: &'static [ColumnType],
}

/// A supported database product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Dialect {
    /// ANSI fallback for unknown products.
    #[default]
    Generic,
    /// Apache Derby.
    Derby,
    /// H2.
    H2,
    /// MySQL and MariaDB.
    MySql,
    /// Oracle.
    Oracle,
    /// PostgreSQL.
    Postgres,
    /// SQLite.
    Sqlite,
    /// Microsoft SQL Server.
    SqlServer,
}

impl Dialect {
    /// All dialects.
    pub const ALL: [Self; 8] = [
        Self::Generic,
        Self::Derby,
        Self::H2,
        Self::MySql,
        Self::Oracle,
        Self::Postgres,
        Self::Sqlite,
        Self::SqlServer,
    ];

    /// Picks the dialect for a database product name as reported by the
    /// driver (`"PostgreSQL"`, `"MySQL"`, `"Apache Derby"`, ...).
    #[must_use]
    pub fn from_product_name(product: &str) -> Self {
        let product = product.to_ascii_lowercase().replace('_', " ");
        if product.contains("postgres") {
            Self::Postgres
        } else if product.contains("mysql") || product.contains("mariadb") {
            Self::MySql
        } else if product.contains("oracle") {
            Self::Oracle
        } else if product.contains("sqlite") {
            Self::Sqlite
        } else if product.contains("derby") {
            Self::Derby
        } else if product == "h2" || product.starts_with("h2 ") {
            Self::H2
        } else if product.contains("sql server") || product.contains("mssql") {
            Self::SqlServer
        } else {
            Self::Generic
        }
    }

    /// Returns the capability table.
    #[must_use]
    pub fn features(self) -> &'static Features {
        match self {
            Self::Generic => &generic::FEATURES,
            Self::Derby => &derby::FEATURES,
            Self::H2 => &h2::FEATURES,
            Self::MySql => &mysql::FEATURES,
            Self::Oracle => &oracle::FEATURES,
            Self::Postgres => &postgres::FEATURES,
            Self::Sqlite => &sqlite::FEATURES,
            Self::SqlServer => &sqlserver::FEATURES,
        }
    }

    /// Returns the dialect name.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.features().name
    }

    /// Returns the native type name for a portable column type.
    #[must_use]
    pub fn type_name(self, column_type: ColumnType) -> &'static str {
        match self {
            Self::Generic => generic::type_name(column_type),
            Self::Derby => derby::type_name(column_type),
            Self::H2 => h2::type_name(column_type),
            Self::MySql => mysql::type_name(column_type),
            Self::Oracle => oracle::type_name(column_type),
            Self::Postgres => postgres::type_name(column_type),
            Self::Sqlite => sqlite::type_name(column_type),
            Self::SqlServer => sqlserver::type_name(column_type),
        }
    }

    /// Returns the serial pseudo-type replacing an auto-incrementing column
    /// type, for dialects that work that way.
    #[must_use]
    pub fn serial_type(self, column_type: ColumnType) -> Option<&'static str> {
        match self.features().autoincrement {
            AutoIncrement::SerialType => postgres::serial_type(column_type),
            _ => None,
        }
    }

    /// Whether the type takes a `(length)` clause.
    #[must_use]
    pub fn needs_length(self, column_type: ColumnType) -> bool {
        self.features().length_types.contains(&column_type)
    }

    /// Whether the type takes a `(precision, scale)` clause.
    #[must_use]
    pub fn accepts_scale(self, column_type: ColumnType) -> bool {
        column_type.is_exact_numeric() || self.features().scale_types.contains(&column_type)
    }

    /// Whether `ON DELETE <rule>` can be emitted.
    #[must_use]
    pub fn supports_delete_rule(self, rule: CascadeRule) -> bool {
        self.features().delete_rules.contains(&rule)
    }

    /// Whether `ON UPDATE <rule>` can be emitted.
    #[must_use]
    pub fn supports_update_rule(self, rule: CascadeRule) -> bool {
        self.features().update_rules.contains(&rule)
    }

    /// Quotes an identifier.
    #[must_use]
    pub fn quote_identifier(self, name: &str) -> String {
        let (open, close) = self.features().quote;
        let escaped = name.replace(close, &format!("{close}{close}"));
        format!("{open}{escaped}{close}")
    }

    /// Quotes a string literal.
    #[must_use]
    pub fn quote_literal(self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Turns a product name into the tag used to qualify dialect-specific
/// migrations: spaces become underscores.
#[must_use]
pub fn product_tag(product: &str) -> String {
    product.trim().replace(' ', "_")
}
