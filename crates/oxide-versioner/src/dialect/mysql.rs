//! MySQL and MariaDB.
//!
//! MySQL is the only mainstream dialect that can place a new column with
//! `FIRST`/`AFTER`. It also accepts `(precision, scale)` on FLOAT and DOUBLE.

use super::{AutoIncrement, Features};
use crate::schema::{CascadeRule, ColumnType};

pub(super) const FEATURES: Features = Features {
    name: "MySQL",
    quote: ('`', '`'),
    autoincrement: AutoIncrement::Keyword("AUTO_INCREMENT"),
    column_position: true,
    add_column: "ADD COLUMN",
    max_primary_key_columns: Some(16),
    max_index_columns: Some(16),
    delete_rules: &[CascadeRule::Cascade, CascadeRule::SetNull],
    update_rules: &[CascadeRule::Cascade, CascadeRule::SetNull],
    creates_primary_key_index: false,
    length_types: &[
        ColumnType::Bit,
        ColumnType::Char,
        ColumnType::Varchar,
        ColumnType::Binary,
        ColumnType::VarBinary,
    ],
    scale_types: &[ColumnType::Float, ColumnType::Double],
};

pub(super) const fn type_name(column_type: ColumnType) -> &'static str {
    match column_type {
        ColumnType::Bit => "BIT",
        ColumnType::Boolean => "BOOLEAN",
        ColumnType::TinyInt => "TINYINT",
        ColumnType::SmallInt => "SMALLINT",
        ColumnType::Integer => "INT",
        ColumnType::BigInt => "BIGINT",
        ColumnType::Real | ColumnType::Float => "FLOAT",
        ColumnType::Double => "DOUBLE",
        ColumnType::Numeric => "NUMERIC",
        ColumnType::Decimal => "DECIMAL",
        ColumnType::Char => "CHAR",
        ColumnType::Varchar => "VARCHAR",
        ColumnType::LongVarchar | ColumnType::Clob => "LONGTEXT",
        ColumnType::Date => "DATE",
        ColumnType::Time => "TIME",
        ColumnType::Timestamp => "DATETIME",
        ColumnType::Binary => "BINARY",
        ColumnType::VarBinary => "VARBINARY",
        ColumnType::LongVarBinary => "LONGBLOB",
        ColumnType::Blob => "BLOB",
    }
}
