//! H2.

use super::{AutoIncrement, Features};
use crate::schema::{CascadeRule, ColumnType};

pub(super) const FEATURES: Features = Features {
    name: "H2",
    quote: ('"', '"'),
    autoincrement: AutoIncrement::Keyword("AUTO_INCREMENT"),
    column_position: true,
    add_column: "ADD COLUMN",
    max_primary_key_columns: None,
    max_index_columns: None,
    delete_rules: &[CascadeRule::Cascade, CascadeRule::SetNull],
    update_rules: &[CascadeRule::Cascade, CascadeRule::SetNull],
    creates_primary_key_index: false,
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
        ColumnType::Bit | ColumnType::Boolean => "BOOLEAN",
        ColumnType::TinyInt => "TINYINT",
        ColumnType::SmallInt => "SMALLINT",
        ColumnType::Integer => "INT",
        ColumnType::BigInt => "BIGINT",
        ColumnType::Real => "REAL",
        ColumnType::Float => "FLOAT",
        ColumnType::Double => "DOUBLE",
        ColumnType::Numeric => "NUMERIC",
        ColumnType::Decimal => "DECIMAL",
        ColumnType::Char => "CHAR",
        ColumnType::Varchar => "VARCHAR",
        ColumnType::LongVarchar | ColumnType::Clob => "CLOB",
        ColumnType::Date => "DATE",
        ColumnType::Time => "TIME",
        ColumnType::Timestamp => "TIMESTAMP",
        ColumnType::Binary => "BINARY",
        ColumnType::VarBinary => "VARBINARY",
        ColumnType::LongVarBinary | ColumnType::Blob => "BLOB",
    }
}
