//! Command-line entry point.
//!
//! The shipped binary has no migrations of its own. Applications register
//! theirs and call [`run`] from their own `main`:
//!
//! ```rust,ignore
//! use clap::Parser;
//! use oxide_versioner::cli::{self, Cli};
//! use oxide_versioner::registry::MigrationRegistry;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let cli = Cli::parse();
//!     let mut registry = MigrationRegistry::new();
//!     registry.register(1, || CreateUsers)?;
//!     cli::run(cli, registry).await?;
//!     println!("Done");
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use clap::Parser;
use sqlx::any::AnyPoolOptions;
use tracing::info;

use crate::config::MigrateConfig;
use crate::engine::{Engine, MigrationReport};
use crate::error::Result;
use crate::registry::MigrationRegistry;
use crate::version::InitGate;

/// Numbered, dialect-aware schema migrations.
#[derive(Debug, Parser)]
#[command(name = "oxide-versioner")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Version to migrate to (latest if not specified).
    #[arg(id = "target_version", value_name = "VERSION", allow_negative_numbers = true)]
    pub version: Option<i64>,

    /// Database URL.
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite:db.sqlite3")]
    pub database: String,

    /// JSON configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Prefix of migration names.
    #[arg(long)]
    pub base_name: Option<String>,

    /// First migration ordinal.
    #[arg(long)]
    pub start_index: Option<i64>,

    /// Name of the version table.
    #[arg(long)]
    pub version_table: Option<String>,

    /// Database product name, overriding the detected one.
    #[arg(long)]
    pub product_name: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Builds the configuration: the file (or defaults), then flags on top.
    pub fn resolve_config(&self) -> Result<MigrateConfig> {
        let mut config = match &self.config {
            Some(path) => MigrateConfig::from_json_file(path)?,
            None => MigrateConfig::default(),
        };

        if let Some(base_name) = &self.base_name {
            config.base_name.clone_from(base_name);
        }
        if let Some(start_index) = self.start_index {
            config.start_index = start_index;
        }
        if let Some(version_table) = &self.version_table {
            config.version_table.clone_from(version_table);
        }
        if let Some(product_name) = &self.product_name {
            config.product_name = Some(product_name.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

/// Connects to the database and migrates it to the requested version.
pub async fn run(cli: Cli, registry: MigrationRegistry) -> Result<MigrationReport> {
    let config = cli.resolve_config()?;

    sqlx::any::install_default_drivers();
    let pool = AnyPoolOptions::new()
        .max_connections(5)
        .connect(&cli.database)
        .await?;

    let engine = Engine::connect(pool, config, registry, InitGate::shared()).await?;
    let report = match cli.version {
        Some(target) => engine.migrate(target).await?,
        None => engine.migrate_to_latest().await?,
    };

    info!(
        from = report.from,
        to = report.to,
        executed = report.executed.len(),
        "Schema migrated"
    );
    Ok(report)
}
