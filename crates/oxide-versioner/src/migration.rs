//! Migration units and the context they run in.

use async_trait::async_trait;
use sqlx::AnyPool;
use tracing::debug;

use crate::config::MigrateConfig;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::generator::{ColumnPosition, Ddl, DdlGenerator};
use crate::introspect::Introspector;
use crate::schema::{Column, ForeignKey, Index, Table};

/// One numbered schema change.
///
/// A fresh instance is built for every run, so `init` may stash state that
/// `up` or `down` reads.
///
/// # Example
///
/// ```rust,ignore
/// use oxide_versioner::prelude::*;
///
/// struct CreateUsers;
///
/// #[async_trait]
/// impl Migration for CreateUsers {
///     async fn up(&self, ctx: &MigrationContext) -> Result<()> {
///         ctx.create_table(
///             &Table::new("users")
///                 .column(Column::new("id", ColumnType::Integer).primary_key().autoincrement())
///                 .column(Column::new("name", ColumnType::Varchar).length(50).not_null()),
///             None,
///         )
///         .await
///     }
///
///     async fn down(&self, ctx: &MigrationContext) -> Result<()> {
///         ctx.drop_table("users").await
///     }
/// }
/// ```
#[async_trait]
pub trait Migration: Send + Sync {
    /// Called once before `up` or `down`.
    async fn init(&mut self, _ctx: &MigrationContext) -> Result<()> {
        Ok(())
    }

    /// Applies the change.
    async fn up(&self, ctx: &MigrationContext) -> Result<()>;

    /// Reverts the change.
    async fn down(&self, ctx: &MigrationContext) -> Result<()>;
}

/// What a running migration can see: the connection, the configuration and
/// a generator for the live dialect.
#[derive(Debug, Clone)]
pub struct MigrationContext {
    pool: AnyPool,
    config: MigrateConfig,
    product_name: String,
    generator: DdlGenerator,
}

impl MigrationContext {
    /// Creates a context. The dialect is derived from `product_name`.
    pub fn new(pool: AnyPool, config: MigrateConfig, product_name: impl Into<String>) -> Self {
        let product_name = product_name.into();
        let generator = DdlGenerator::new(Dialect::from_product_name(&product_name));
        Self {
            pool,
            config,
            product_name,
            generator,
        }
    }

    /// Returns the connection pool.
    #[must_use]
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &MigrateConfig {
        &self.config
    }

    /// Returns the database product name.
    #[must_use]
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// Returns the live dialect.
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.generator.dialect()
    }

    /// Returns the DDL generator for the live dialect.
    #[must_use]
    pub fn generator(&self) -> &DdlGenerator {
        &self.generator
    }

    /// Executes raw SQL and returns the number of affected rows.
    pub async fn execute(&self, sql: &str) -> Result<u64> {
        debug!(sql = %sql, "Executing SQL");
        let result = sqlx::query(sql).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn run(&self, ddl: Ddl) -> Result<()> {
        self.execute(&ddl.sql).await?;
        Ok(())
    }

    /// Creates a table.
    pub async fn create_table(&self, table: &Table, options: Option<&str>) -> Result<()> {
        self.run(self.generator.create_table(table, options)?).await
    }

    /// Drops a table.
    pub async fn drop_table(&self, table: &str) -> Result<()> {
        self.run(self.generator.drop_table(table)?).await
    }

    /// Adds a column at the end of the table.
    pub async fn add_column(&self, column: &Column, table: &str) -> Result<()> {
        self.add_column_at(column, table, &ColumnPosition::End).await
    }

    /// Adds a column at a position, where the dialect allows it.
    pub async fn add_column_at(
        &self,
        column: &Column,
        table: &str,
        position: &ColumnPosition,
    ) -> Result<()> {
        self.run(self.generator.add_column(column, table, position)?)
            .await
    }

    /// Changes a column definition.
    pub async fn alter_column(&self, column: &Column, table: &str) -> Result<()> {
        self.run(self.generator.alter_column(column, table)?).await
    }

    /// Drops a column.
    pub async fn drop_column(&self, column: &str, table: &str) -> Result<()> {
        self.run(self.generator.drop_column(column, table)?).await
    }

    /// Renames a column.
    pub async fn rename_column(&self, old_name: &str, new_name: &str, table: &str) -> Result<()> {
        self.run(self.generator.rename_column(old_name, new_name, table)?)
            .await
    }

    /// Renames a table.
    pub async fn rename_table(&self, old_name: &str, new_name: &str) -> Result<()> {
        self.run(self.generator.rename_table(old_name, new_name)?)
            .await
    }

    /// Creates an index.
    pub async fn add_index(&self, index: &Index) -> Result<()> {
        self.run(self.generator.add_index(index)?).await
    }

    /// Drops an index.
    pub async fn drop_index(&self, index: &str, table: &str) -> Result<()> {
        self.run(self.generator.drop_index(index, table)?).await
    }

    /// Adds a foreign key constraint.
    pub async fn add_foreign_key(&self, key: &ForeignKey) -> Result<()> {
        self.run(self.generator.add_foreign_key(key)?).await
    }

    /// Drops a foreign key constraint.
    pub async fn drop_foreign_key(&self, name: &str, table: &str) -> Result<()> {
        self.run(self.generator.drop_foreign_key(name, table)?)
            .await
    }

    /// Reports whether a table exists.
    pub async fn table_exists(&self, table: &str) -> Result<bool> {
        Introspector::new(self.dialect())
            .table_exists(&self.pool, table)
            .await
    }

    /// Reports whether an index exists on a table.
    pub async fn index_exists(&self, index: &str, table: &str) -> Result<bool> {
        Introspector::new(self.dialect())
            .index_exists(&self.pool, index, table)
            .await
    }
}
