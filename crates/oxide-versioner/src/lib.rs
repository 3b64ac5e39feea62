//! Numbered, dialect-aware schema migrations for Rust.
//!
//! `oxide-versioner` moves a relational database from the schema version it
//! records to a requested one by running numbered migrations in order:
//! - Migrations are registered explicitly under an ordinal, optionally with a
//!   variant for one database product
//! - The persisted version is updated even when a run fails halfway
//! - DDL is generated per dialect; features a dialect lacks are reported
//!   instead of silently producing broken SQL
//!
//! # Architecture
//!
//! - **Registry** - Ordinal to migration factory, with per-product variants
//! - **Engine** - Plans and runs migrations, persists the reached version
//! - **Version store** - One-row bookkeeping table, created on first use
//! - **Generator** - DDL synthesis for each supported dialect
//! - **Introspection** - Table and index existence checks
//!
//! # Example
//!
//! ```rust,ignore
//! use oxide_versioner::prelude::*;
//!
//! struct CreateUsers;
//!
//! #[async_trait]
//! impl Migration for CreateUsers {
//!     async fn up(&self, ctx: &MigrationContext) -> Result<()> {
//!         ctx.create_table(
//!             &Table::new("users")
//!                 .column(
//!                     Column::new("id", ColumnType::Integer)
//!                         .primary_key()
//!                         .autoincrement(),
//!                 )
//!                 .column(Column::new("name", ColumnType::Varchar).length(50).not_null()),
//!             None,
//!         )
//!         .await
//!     }
//!
//!     async fn down(&self, ctx: &MigrationContext) -> Result<()> {
//!         ctx.drop_table("users").await
//!     }
//! }
//!
//! let mut registry = MigrationRegistry::new();
//! registry.register(1, || CreateUsers)?;
//!
//! let engine = Engine::connect(pool, MigrateConfig::default(), registry, InitGate::shared()).await?;
//! engine.migrate_to_latest().await?;
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Migrate to the latest version
//! oxide-versioner --database sqlite:app.db
//!
//! # Migrate up or down to version 3
//! oxide-versioner 3 --database sqlite:app.db
//! ```

pub mod cli;
pub mod config;
pub mod dialect;
pub mod engine;
pub mod error;
pub mod generator;
pub mod introspect;
pub mod migration;
pub mod registry;
pub mod schema;
pub mod version;

/// Prelude for convenient imports.
pub mod prelude {
    pub use async_trait::async_trait;

    pub use crate::config::MigrateConfig;
    pub use crate::dialect::Dialect;
    pub use crate::engine::{Direction, Engine, MigrationReport};
    pub use crate::error::{MigrateError, Result};
    pub use crate::generator::{ColumnPosition, Ddl, DdlGenerator, Degradation};
    pub use crate::introspect::Introspector;
    pub use crate::migration::{Migration, MigrationContext};
    pub use crate::registry::MigrationRegistry;
    pub use crate::schema::{CascadeRule, Column, ColumnType, ForeignKey, Index, Table};
    pub use crate::version::{InitGate, SqlVersionStore, VersionStore};
}
