//! Merlinn Migrate — installs the records schema into SurrealDB.

mod config;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use merlinn_db::DbManager;
use tracing_subscriber::EnvFilter;

use crate::config::load_config;
use crate::error::MigrateError;

#[derive(Debug, Parser)]
#[command(name = "merlinn-migrate", about = "Apply pending Merlinn schema migrations")]
struct Args {
    /// Configuration file (TOML). Defaults to `merlinn.toml` if present.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("merlinn_db=info,merlinn_migrate=info")),
        )
        .json()
        .init();

    let args = Args::parse();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Migration failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<(), MigrateError> {
    let config = load_config(args.config.as_deref())?;
    let manager = DbManager::connect(&config.database).await?;

    merlinn_db::run_migrations(manager.client()).await?;

    tracing::info!("Schema is up to date");
    Ok(())
}
