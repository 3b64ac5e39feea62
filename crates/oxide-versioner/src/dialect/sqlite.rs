//! SQLite.
//!
//! SQLite only knows storage classes, so every type collapses to one of
//! INTEGER, REAL, NUMERIC, TEXT or BLOB and no length is rendered.
//! `AUTOINCREMENT` is only legal as `INTEGER PRIMARY KEY AUTOINCREMENT`.

use super::{AutoIncrement, Features};
use crate::schema::{CascadeRule, ColumnType};

pub(super) const FEATURES: Features = Features {
    name: "SQLite",
    quote: ('"', '"'),
    autoincrement: AutoIncrement::PrimaryKeySuffix("AUTOINCREMENT"),
    column_position: false,
    add_column: "ADD COLUMN",
    max_primary_key_columns: None,
    max_index_columns: None,
    delete_rules: &[CascadeRule::Cascade, CascadeRule::SetNull],
    update_rules: &[CascadeRule::Cascade, CascadeRule::SetNull],
    creates_primary_key_index: true,
    length_types: &[],
    scale_types: &[],
};

pub(super) const fn type_name(column_type: ColumnType) -> &'static str {
    match column_type {
        ColumnType::Bit
        | ColumnType::Boolean
        | ColumnType::TinyInt
        | ColumnType::SmallInt
        | ColumnType::Integer
        | ColumnType::BigInt => "INTEGER",
        ColumnType::Real | ColumnType::Float | ColumnType::Double => "REAL",
        ColumnType::Numeric | ColumnType::Decimal => "NUMERIC",
        ColumnType::Char
        | ColumnType::Varchar
        | ColumnType::LongVarchar
        | ColumnType::Clob
        | ColumnType::Date
        | ColumnType::Time
        | ColumnType::Timestamp => "TEXT",
        ColumnType::Binary
        | ColumnType::VarBinary
        | ColumnType::LongVarBinary
        | ColumnType::Blob => "BLOB",
    }
}
