//! Apache Derby.
//!
//! Derby has no `ON UPDATE` actions besides `NO ACTION`/`RESTRICT` and caps
//! indexes at 16 columns. Binary data goes to `BLOB(n)`.

use super::{AutoIncrement, Features};
use crate::schema::{CascadeRule, ColumnType};

pub(super) const FEATURES: Features = Features {
    name: "Apache Derby",
    quote: ('"', '"'),
    autoincrement: AutoIncrement::Keyword("GENERATED BY DEFAULT AS IDENTITY"),
    column_position: false,
    add_column: "ADD COLUMN",
    max_primary_key_columns: Some(16),
    max_index_columns: Some(16),
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
        ColumnType::Bit | ColumnType::TinyInt | ColumnType::SmallInt => "SMALLINT",
        ColumnType::Boolean => "BOOLEAN",
        ColumnType::Integer => "INTEGER",
        ColumnType::BigInt => "BIGINT",
        ColumnType::Real => "REAL",
        ColumnType::Float => "FLOAT",
        ColumnType::Double => "DOUBLE",
        ColumnType::Numeric => "NUMERIC",
        ColumnType::Decimal => "DECIMAL",
        ColumnType::Char => "CHAR",
        ColumnType::Varchar => "VARCHAR",
        ColumnType::LongVarchar => "LONG VARCHAR",
        ColumnType::Clob => "CLOB",
        ColumnType::Date => "DATE",
        ColumnType::Time => "TIME",
        ColumnType::Timestamp => "TIMESTAMP",
        ColumnType::Binary
        | ColumnType::VarBinary
        | ColumnType::LongVarBinary
        | ColumnType::Blob => "BLOB",
    }
}
