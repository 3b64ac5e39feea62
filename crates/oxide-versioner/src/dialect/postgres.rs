//! PostgreSQL.
//!
//! Auto-increment swaps the integer type for its `SERIAL` pseudo-type.

use super::{AutoIncrement, Features};
use crate::schema::{CascadeRule, ColumnType};

pub(super) const FEATURES: Features = Features {
    name: "PostgreSQL",
    quote: ('"', '"'),
    autoincrement: AutoIncrement::SerialType,
    column_position: false,
    add_column: "ADD COLUMN",
    max_primary_key_columns: Some(32),
    max_index_columns: Some(32),
    delete_rules: &[CascadeRule::Cascade, CascadeRule::SetNull],
    update_rules: &[CascadeRule::Cascade, CascadeRule::SetNull],
    creates_primary_key_index: true,
    length_types: &[ColumnType::Char, ColumnType::Varchar],
    scale_types: &[],
};

pub(super) const fn type_name(column_type: ColumnType) -> &'static str {
    match column_type {
        ColumnType::Bit => "BIT",
        ColumnType::Boolean => "BOOLEAN",
        ColumnType::TinyInt | ColumnType::SmallInt => "SMALLINT",
        ColumnType::Integer => "INTEGER",
        ColumnType::BigInt => "BIGINT",
        ColumnType::Real => "REAL",
        ColumnType::Float | ColumnType::Double => "DOUBLE PRECISION",
        ColumnType::Numeric => "NUMERIC",
        ColumnType::Decimal => "DECIMAL",
        ColumnType::Char => "CHAR",
        ColumnType::Varchar => "VARCHAR",
        ColumnType::LongVarchar | ColumnType::Clob => "TEXT",
        ColumnType::Date => "DATE",
        ColumnType::Time => "TIME",
        ColumnType::Timestamp => "TIMESTAMP",
        ColumnType::Binary
        | ColumnType::VarBinary
        | ColumnType::LongVarBinary
        | ColumnType::Blob => "BYTEA",
    }
}

/// Returns the serial pseudo-type for an auto-incrementing integer column.
pub(super) const fn serial_type(column_type: ColumnType) -> Option<&'static str> {
    match column_type {
        ColumnType::TinyInt | ColumnType::SmallInt => Some("SMALLSERIAL"),
        ColumnType::Integer => Some("SERIAL"),
        ColumnType::BigInt => Some("BIGSERIAL"),
        _ => None,
    }
}
