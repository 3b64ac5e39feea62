//! oxide-versioner CLI
//!
//! Migrates a database to a version. This binary has an empty registry;
//! applications embed [`oxide_versioner::cli::run`] with their own.

use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use oxide_versioner::cli::{self, Cli};
use oxide_versioner::registry::MigrationRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    cli::run(cli, MigrationRegistry::new()).await?;
    println!("Done");

    Ok(())
}
