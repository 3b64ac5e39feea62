//! Persisted schema version.
//!
//! The version lives in a one-row, one-column table. A database that has
//! never been managed gets the table (seeded with `0`) the first time the
//! version is read.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{AnyPool, Row};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::dialect::Dialect;
use crate::error::{MigrateError, Result};
use crate::generator::DdlGenerator;
use crate::introspect::Introspector;
use crate::schema::{Column, ColumnType, Table};

/// Name of the single column of the version table.
pub const VERSION_COLUMN: &str = "version";

/// Reads and writes the persisted schema version.
#[async_trait]
pub trait VersionStore: Send + Sync {
    /// Returns the persisted version, initializing the store if needed.
    async fn current_version(&self) -> Result<i64>;

    /// Persists `version`. Durable once this returns.
    async fn update_version(&self, version: i64) -> Result<()>;
}

/// Serializes version-table initialization.
///
/// One gate is shared by every store in the process. It is not keyed by
/// database: two stores pointing at different databases still initialize
/// one after the other. Holding the lock is the whole gate; initialization
/// never calls back into a store, so it can not re-enter.
#[derive(Debug, Default)]
pub struct InitGate {
    lock: Mutex<()>,
}

impl InitGate {
    /// Creates a shareable gate.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    async fn enter(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }

    /// Whether no initialization currently holds the gate.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.lock.try_lock().is_ok()
    }
}

/// Version store backed by a table in the managed database.
#[derive(Debug, Clone)]
pub struct SqlVersionStore {
    pool: AnyPool,
    table: String,
    dialect: Dialect,
    gate: Arc<InitGate>,
}

impl SqlVersionStore {
    /// Creates a store for `table`.
    pub fn new(
        pool: AnyPool,
        dialect: Dialect,
        table: impl Into<String>,
        gate: Arc<InitGate>,
    ) -> Self {
        Self {
            pool,
            table: table.into(),
            dialect,
            gate,
        }
    }

    /// Returns the version table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    fn store_error(&self, source: sqlx::Error) -> MigrateError {
        MigrateError::VersionStore {
            table: self.table.clone(),
            source,
        }
    }

    /// Creates and seeds the version table unless it exists already.
    pub async fn ensure_initialized(&self) -> Result<()> {
        let _gate = self.gate.enter().await;

        let introspector = Introspector::new(self.dialect);
        let exists = introspector
            .table_exists(&self.pool, &self.table)
            .await
            .map_err(|e| match e {
                MigrateError::Introspection { source, .. } => self.store_error(source),
                other => other,
            })?;
        if exists {
            return Ok(());
        }

        info!(table = %self.table, "Creating version table");

        let table =
            Table::new(&self.table).column(Column::new(VERSION_COLUMN, ColumnType::BigInt).not_null());
        let create = DdlGenerator::new(self.dialect).create_table(&table, None)?;
        let insert = format!(
            "INSERT INTO {} ({}) VALUES (0)",
            self.dialect.quote_identifier(&self.table),
            self.dialect.quote_identifier(VERSION_COLUMN)
        );

        let mut tx = self.pool.begin().await.map_err(|e| self.store_error(e))?;
        debug!(sql = %create, "Executing SQL");
        sqlx::query(&create.sql)
            .execute(&mut *tx)
            .await
            .map_err(|e| self.store_error(e))?;
        debug!(sql = %insert, "Executing SQL");
        sqlx::query(&insert)
            .execute(&mut *tx)
            .await
            .map_err(|e| self.store_error(e))?;
        tx.commit().await.map_err(|e| self.store_error(e))?;

        Ok(())
    }
}

#[async_trait]
impl VersionStore for SqlVersionStore {
    async fn current_version(&self) -> Result<i64> {
        self.ensure_initialized().await?;

        let sql = format!(
            "SELECT {} FROM {}",
            self.dialect.quote_identifier(VERSION_COLUMN),
            self.dialect.quote_identifier(&self.table)
        );
        let row = sqlx::query(&sql)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| self.store_error(e))?;

        match row {
            Some(row) => row.try_get::<i64, _>(0).map_err(|e| self.store_error(e)),
            None => Ok(0),
        }
    }

    async fn update_version(&self, version: i64) -> Result<()> {
        let table = self.dialect.quote_identifier(&self.table);
        let column = self.dialect.quote_identifier(VERSION_COLUMN);

        let mut tx = self.pool.begin().await.map_err(|e| self.store_error(e))?;
        let updated = sqlx::query(&format!("UPDATE {table} SET {column} = {version}"))
            .execute(&mut *tx)
            .await
            .map_err(|e| self.store_error(e))?;
        if updated.rows_affected() == 0 {
            sqlx::query(&format!("INSERT INTO {table} ({column}) VALUES ({version})"))
                .execute(&mut *tx)
                .await
                .map_err(|e| self.store_error(e))?;
        }
        tx.commit().await.map_err(|e| self.store_error(e))?;

        info!(table = %self.table, version, "Schema version updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::any::AnyPoolOptions;

    async fn create_test_pool() -> AnyPool {
        sqlx::any::install_default_drivers();
        AnyPoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory SQLite pool")
    }

    fn store(pool: &AnyPool) -> SqlVersionStore {
        SqlVersionStore::new(pool.clone(), Dialect::Sqlite, "version", InitGate::shared())
    }

    #[tokio::test]
    async fn test_fresh_database_reads_zero() {
        let pool = create_test_pool().await;
        let store = store(&pool);

        assert_eq!(store.current_version().await.unwrap(), 0);
        // Should be idempotent
        assert_eq!(store.current_version().await.unwrap(), 0);

        let rows = sqlx::query("SELECT version FROM version")
            .fetch_all(&pool)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_update_version() {
        let pool = create_test_pool().await;
        let store = store(&pool);

        store.current_version().await.unwrap();
        store.update_version(7).await.unwrap();
        assert_eq!(store.current_version().await.unwrap(), 7);

        store.update_version(3).await.unwrap();
        assert_eq!(store.current_version().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_update_inserts_missing_row() {
        let pool = create_test_pool().await;
        let store = store(&pool);

        store.current_version().await.unwrap();
        sqlx::query("DELETE FROM version").execute(&pool).await.unwrap();
        assert_eq!(store.current_version().await.unwrap(), 0);

        store.update_version(2).await.unwrap();
        assert_eq!(store.current_version().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_custom_table_name() {
        let pool = create_test_pool().await;
        let store = SqlVersionStore::new(
            pool.clone(),
            Dialect::Sqlite,
            "schema_version",
            InitGate::shared(),
        );

        store.current_version().await.unwrap();
        assert!(Introspector::new(Dialect::Sqlite)
            .table_exists(&pool, "schema_version")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_gate_blocks_while_held() {
        let gate = InitGate::shared();
        assert!(gate.is_idle());

        let held = gate.enter().await;
        assert!(!gate.is_idle());
        drop(held);

        assert!(gate.is_idle());
    }

    #[tokio::test]
    async fn test_gate_released_after_failure() {
        let pool = create_test_pool().await;
        let gate = InitGate::shared();
        // An empty table name fails validation inside the gate.
        let broken = SqlVersionStore::new(pool.clone(), Dialect::Sqlite, "", gate.clone());

        assert!(broken.current_version().await.is_err());
        assert!(gate.is_idle());

        let store = SqlVersionStore::new(pool, Dialect::Sqlite, "version", gate);
        assert_eq!(store.current_version().await.unwrap(), 0);
    }
}
