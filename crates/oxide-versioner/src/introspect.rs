//! Table and index existence checks.
//!
//! Each dialect reads its own catalog. Table names are matched
//! case-insensitively; index names exactly.

use sqlx::AnyPool;
use tracing::debug;

use crate::dialect::Dialect;
use crate::error::{MigrateError, Result};

/// Builds and runs catalog lookups for one dialect.
#[derive(Debug, Clone, Copy)]
pub struct Introspector {
    dialect: Dialect,
}

impl Introspector {
    /// Creates an introspector for the given dialect.
    #[must_use]
    pub const fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// Returns the query whose result is non-empty iff `table` exists.
    #[must_use]
    pub fn table_exists_query(&self, table: &str) -> String {
        let name = self.dialect.quote_literal(&table.to_lowercase());
        match self.dialect {
            Dialect::Sqlite => format!(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND LOWER(name) = {name}"
            ),
            Dialect::Postgres => format!(
                "SELECT 1 FROM information_schema.tables \
                 WHERE table_schema = current_schema() AND LOWER(table_name) = {name}"
            ),
            Dialect::MySql => format!(
                "SELECT 1 FROM information_schema.tables \
                 WHERE table_schema = DATABASE() AND LOWER(table_name) = {name}"
            ),
            Dialect::Oracle => {
                format!("SELECT 1 FROM user_tables WHERE LOWER(table_name) = {name}")
            }
            Dialect::Derby => {
                format!("SELECT 1 FROM SYS.SYSTABLES WHERE LOWER(TABLENAME) = {name}")
            }
            Dialect::H2 | Dialect::SqlServer | Dialect::Generic => format!(
                "SELECT 1 FROM INFORMATION_SCHEMA.TABLES WHERE LOWER(TABLE_NAME) = {name}"
            ),
        }
    }

    /// Returns the query whose result is non-empty iff index `index` exists
    /// on `table`.
    pub fn index_exists_query(&self, index: &str, table: &str) -> Result<String> {
        let index = self.dialect.quote_literal(index);
        let table = self.dialect.quote_literal(&table.to_lowercase());
        let sql = match self.dialect {
            Dialect::Sqlite => format!(
                "SELECT 1 FROM sqlite_master \
                 WHERE type = 'index' AND name = {index} AND LOWER(tbl_name) = {table}"
            ),
            Dialect::Postgres => format!(
                "SELECT 1 FROM pg_indexes WHERE schemaname = current_schema() \
                 AND indexname = {index} AND LOWER(tablename) = {table}"
            ),
            Dialect::MySql => format!(
                "SELECT 1 FROM information_schema.statistics WHERE table_schema = DATABASE() \
                 AND index_name = {index} AND LOWER(table_name) = {table}"
            ),
            Dialect::Oracle => format!(
                "SELECT 1 FROM user_indexes \
                 WHERE index_name = {index} AND LOWER(table_name) = {table}"
            ),
            Dialect::Derby => format!(
                "SELECT 1 FROM SYS.SYSCONGLOMERATES c JOIN SYS.SYSTABLES t \
                 ON c.TABLEID = t.TABLEID \
                 WHERE c.CONGLOMERATENAME = {index} AND LOWER(t.TABLENAME) = {table}"
            ),
            Dialect::H2 => format!(
                "SELECT 1 FROM INFORMATION_SCHEMA.INDEXES \
                 WHERE INDEX_NAME = {index} AND LOWER(TABLE_NAME) = {table}"
            ),
            Dialect::SqlServer => format!(
                "SELECT 1 FROM sys.indexes i JOIN sys.tables t ON i.object_id = t.object_id \
                 WHERE i.name = {index} AND LOWER(t.name) = {table}"
            ),
            Dialect::Generic => {
                return Err(MigrateError::Unsupported {
                    dialect: self.dialect.name(),
                    feature: "index lookup".to_string(),
                })
            }
        };
        Ok(sql)
    }

    /// Reports whether `table` exists.
    pub async fn table_exists(&self, pool: &AnyPool, table: &str) -> Result<bool> {
        let sql = self.table_exists_query(table);
        debug!(sql = %sql, "Looking up table");
        let row = sqlx::query(&sql)
            .fetch_optional(pool)
            .await
            .map_err(|source| MigrateError::Introspection {
                object: format!("table {table}"),
                source,
            })?;
        Ok(row.is_some())
    }

    /// Reports whether index `index` exists on `table`.
    pub async fn index_exists(&self, pool: &AnyPool, index: &str, table: &str) -> Result<bool> {
        let sql = self.index_exists_query(index, table)?;
        debug!(sql = %sql, "Looking up index");
        let row = sqlx::query(&sql)
            .fetch_optional(pool)
            .await
            .map_err(|source| MigrateError::Introspection {
                object: format!("index {index}"),
                source,
            })?;
        Ok(row.is_some())
    }
}

/// Reports whether `table` exists in the database behind `pool`.
pub async fn table_exists(pool: &AnyPool, dialect: Dialect, table: &str) -> Result<bool> {
    Introspector::new(dialect).table_exists(pool, table).await
}

/// Reports whether index `index` exists on `table`.
pub async fn index_exists(pool: &AnyPool, dialect: Dialect, index: &str, table: &str) -> Result<bool> {
    Introspector::new(dialect)
        .index_exists(pool, index, table)
        .await
}
