//! Example: Blog Application Migrations
//!
//! Registers three numbered migrations for a blog (users, posts, and an
//! Oracle-specific variant of the posts migration), migrates an in-memory
//! SQLite database up, prints the DDL each dialect would use, then rolls
//! everything back.
//!
//! Run with: cargo run --example blog_migrations -p oxide-versioner

use oxide_versioner::prelude::*;
use sqlx::any::AnyPoolOptions;

// =============================================================================
// Schema
// =============================================================================

fn users_table() -> Table {
    Table::new("users")
        .column(
            Column::new("id", ColumnType::Integer)
                .primary_key()
                .autoincrement(),
        )
        .column(Column::new("username", ColumnType::Varchar).length(100).not_null())
        .column(Column::new("email", ColumnType::Varchar).length(255).not_null())
        .column(
            Column::new("is_active", ColumnType::Boolean)
                .not_null()
                .default_value("1"),
        )
}

fn posts_table() -> Table {
    Table::new("posts")
        .column(
            Column::new("id", ColumnType::Integer)
                .primary_key()
                .autoincrement(),
        )
        .column(Column::new("author_id", ColumnType::Integer).not_null())
        .column(Column::new("title", ColumnType::Varchar).length(200).not_null())
        .column(Column::new("body", ColumnType::Clob))
}

fn posts_author_fk() -> ForeignKey {
    ForeignKey::new("fk_posts_author", "posts", ["author_id"], "users", ["id"])
        .on_delete(CascadeRule::Cascade)
        .on_update(CascadeRule::Cascade)
}

// =============================================================================
// Migration Definitions
// =============================================================================

/// Migration_1: users table.
struct CreateUsers;

#[async_trait]
impl Migration for CreateUsers {
    async fn up(&self, ctx: &MigrationContext) -> Result<()> {
        ctx.create_table(&users_table(), None).await?;
        ctx.add_index(&Index::new("idx_users_username", "users", ["username"]).unique())
            .await
    }

    async fn down(&self, ctx: &MigrationContext) -> Result<()> {
        ctx.drop_table("users").await
    }
}

/// Migration_2: posts table. SQLite cannot add a foreign key to an existing
/// table, so it goes without.
struct CreatePosts;

#[async_trait]
impl Migration for CreatePosts {
    async fn up(&self, ctx: &MigrationContext) -> Result<()> {
        ctx.create_table(&posts_table(), None).await?;
        if ctx.dialect() != Dialect::Sqlite {
            ctx.add_foreign_key(&posts_author_fk()).await?;
        }
        ctx.add_index(&Index::new("idx_posts_author", "posts", ["author_id"]))
            .await
    }

    async fn down(&self, ctx: &MigrationContext) -> Result<()> {
        ctx.drop_table("posts").await
    }
}

/// Migration_2$Oracle: Oracle keeps the sequence-backed id of its own.
struct CreatePostsOracle;

#[async_trait]
impl Migration for CreatePostsOracle {
    async fn up(&self, ctx: &MigrationContext) -> Result<()> {
        ctx.create_table(&posts_table(), None).await?;
        ctx.execute("CREATE SEQUENCE posts_seq").await?;
        ctx.add_foreign_key(&posts_author_fk()).await
    }

    async fn down(&self, ctx: &MigrationContext) -> Result<()> {
        ctx.execute("DROP SEQUENCE posts_seq").await?;
        ctx.drop_table("posts").await
    }
}

/// Migration_3: post slugs.
struct AddSlug;

#[async_trait]
impl Migration for AddSlug {
    async fn up(&self, ctx: &MigrationContext) -> Result<()> {
        ctx.add_column_at(
            &Column::new("slug", ColumnType::Varchar).length(200),
            "posts",
            &ColumnPosition::After("title".to_string()),
        )
        .await
    }

    async fn down(&self, ctx: &MigrationContext) -> Result<()> {
        ctx.drop_column("slug", "posts").await
    }
}

fn registry() -> Result<MigrationRegistry> {
    let mut registry = MigrationRegistry::new();
    registry.register(1, || CreateUsers)?;
    registry.register(2, || CreatePosts)?;
    registry.register_for(2, "Oracle", || CreatePostsOracle)?;
    registry.register(3, || AddSlug)?;
    Ok(registry)
}

// =============================================================================
// Main
// =============================================================================

fn print_ddl() -> Result<()> {
    for dialect in [Dialect::Sqlite, Dialect::Postgres, Dialect::MySql, Dialect::Oracle] {
        let generator = DdlGenerator::new(dialect);
        println!("-- {dialect}");
        let foreign_key = match generator.add_foreign_key(&posts_author_fk()) {
            Ok(ddl) => ddl,
            Err(e @ MigrateError::Unsupported { .. }) => Ddl {
                sql: format!("-- {e}"),
                degraded: Vec::new(),
            },
            Err(other) => return Err(other),
        };
        for ddl in [generator.create_table(&posts_table(), None)?, foreign_key] {
            println!("{ddl};");
            for degradation in &ddl.degraded {
                println!("--   note: {degradation}");
            }
        }
        println!();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    print_ddl()?;

    sqlx::any::install_default_drivers();
    let pool = AnyPoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    let engine = Engine::connect(
        pool,
        MigrateConfig::default(),
        registry()?,
        InitGate::shared(),
    )
    .await?;

    println!("Pending: {:?}", engine.pending(i64::MAX).await?);

    let report = engine.migrate_to_latest().await?;
    println!(
        "Migrated {} -> {}: {:?}",
        report.from, report.to, report.executed
    );

    let report = engine.migrate(0).await?;
    println!(
        "Rolled back {} -> {}: {:?}",
        report.from, report.to, report.executed
    );

    Ok(())
}
