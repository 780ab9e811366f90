//! Lexguard CLI - Command-line interface for the Lexguard compliance engine.

use clap::Parser;
use lexguard_cli::commands;
use lexguard_cli::{Cli, Command, Config, Formatter};
use lexguard_engine::ComplianceEngine;
use lexguard_store::SqliteStore;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Log to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lexguard=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> lexguard_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load config from the given path, or the default location
    let config = match &cli.config {
        Some(path) => Config::load_from(Path::new(path))?,
        None => {
            let path = Config::path()?;
            if path.exists() {
                Config::load_from(&path)?
            } else {
                // First run: write the defaults so they can be edited
                let cfg = Config::default();
                if let Err(e) = cfg.save_to(&path) {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to write default config");
                }
                cfg
            }
        }
    };

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    // Open the database
    let database_path = match cli.database {
        Some(path) => PathBuf::from(path),
        None => config.database_path()?,
    };
    if let Some(parent) = database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut store = SqliteStore::new(&database_path)?;

    match cli.command {
        Command::Analyze(args) => {
            let engine = ComplianceEngine::new(config.engine_config())?;
            commands::execute_analyze(args, &engine, &store, &formatter).await?;
        }
        Command::Import(args) => {
            commands::execute_import(args, &mut store, &formatter)?;
        }
        Command::Audit(args) => {
            commands::execute_audit(args, &store, &formatter)?;
        }
    }

    Ok(())
}
