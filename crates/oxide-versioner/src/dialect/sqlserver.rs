//! Microsoft SQL Server.

use super::{AutoIncrement, Features};
use crate::schema::{CascadeRule, ColumnType};

pub(super) const FEATURES: Features = Features {
    name: "Microsoft SQL Server",
    quote: ('[', ']'),
    autoincrement: AutoIncrement::Keyword("IDENTITY(1,1)"),
    column_position: false,
    add_column: "ADD",
    max_primary_key_columns: Some(16),
    max_index_columns: Some(16),
    delete_rules: &[CascadeRule::Cascade, CascadeRule::SetNull],
    update_rules: &[CascadeRule::Cascade, CascadeRule::SetNull],
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
        ColumnType::Bit | ColumnType::Boolean => "BIT",
        ColumnType::TinyInt => "TINYINT",
        ColumnType::SmallInt => "SMALLINT",
        ColumnType::Integer => "INT",
        ColumnType::BigInt => "BIGINT",
        ColumnType::Real => "REAL",
        ColumnType::Float | ColumnType::Double => "FLOAT",
        ColumnType::Numeric => "NUMERIC",
        ColumnType::Decimal => "DECIMAL",
        ColumnType::Char => "CHAR",
        ColumnType::Varchar => "VARCHAR",
        ColumnType::LongVarchar | ColumnType::Clob => "VARCHAR(MAX)",
        ColumnType::Date => "DATE",
        ColumnType::Time => "TIME",
        ColumnType::Timestamp => "DATETIME2",
        ColumnType::Binary => "BINARY",
        ColumnType::VarBinary => "VARBINARY",
        ColumnType::LongVarBinary | ColumnType::Blob => "VARBINARY(MAX)",
    }
}
