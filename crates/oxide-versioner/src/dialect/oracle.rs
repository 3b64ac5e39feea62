//! Oracle.
//!
//! No autoincrement columns, no column positioning, no `ON UPDATE` actions.
//! Primary keys and indexes are limited to 32 columns.

use super::{AutoIncrement, Features};
use crate::schema::{CascadeRule, ColumnType};

pub(super) const FEATURES: Features = Features {
    name: "Oracle",
    quote: ('"', '"'),
    autoincrement: AutoIncrement::Unsupported,
    column_position: false,
    add_column: "ADD",
    max_primary_key_columns: Some(32),
    max_index_columns: Some(32),
    delete_rules: &[CascadeRule::Cascade, CascadeRule::SetNull],
    update_rules: &[],
    creates_primary_key_index: true,
    length_types: &[
        ColumnType::Char,
        ColumnType::Varchar,
        ColumnType::Binary,
        ColumnType::VarBinary,
    ],
    scale_types: &[],
};

pub(super) const fn type_name(column_type: ColumnType) -> &'static str {
    match column_type {
        ColumnType::Bit | ColumnType::Boolean => "NUMBER(1)",
        ColumnType::TinyInt => "NUMBER(3)",
        ColumnType::SmallInt => "SMALLINT",
        ColumnType::Integer => "INTEGER",
        ColumnType::BigInt => "NUMBER(19)",
        ColumnType::Real => "REAL",
        ColumnType::Float => "FLOAT",
        ColumnType::Double => "DOUBLE PRECISION",
        ColumnType::Numeric => "NUMBER",
        ColumnType::Decimal => "DECIMAL",
        ColumnType::Char => "CHAR",
        ColumnType::Varchar => "VARCHAR2",
        ColumnType::LongVarchar | ColumnType::Clob => "CLOB",
        ColumnType::Date | ColumnType::Time => "DATE",
        ColumnType::Timestamp => "TIMESTAMP",
        ColumnType::Binary | ColumnType::VarBinary => "RAW",
        ColumnType::LongVarBinary | ColumnType::Blob => "BLOB",
    }
}
