//! Flightlog CLI - Import flight manifests and investigate co-travel.

use clap::Parser;
use flightlog_cli::commands;
use flightlog_cli::{Cli, Command, Config, Formatter};
use flightlog_store::SqliteStore;
use std::fs;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> flightlog_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    // Load or create config
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::path()?,
    };
    let config = if config_path.exists() {
        Config::load_from(&config_path)?
    } else {
        let cfg = Config::default();
        if let Err(e) = cfg.save_to(&config_path) {
            tracing::warn!("Could not write default config to {}: {}", config_path.display(), e);
        }
        cfg
    };

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let db_path = match cli.database {
        Some(path) => path,
        None => config.database_path()?,
    };
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    tracing::debug!("Opening database {}", db_path.display());
    let mut store = SqliteStore::new(&db_path)?;

    match cli.command {
        Command::Import(args) => commands::execute_import(args, &config, &mut store, &formatter)?,
        Command::Derive => commands::execute_derive(&mut store, &formatter)?,
        Command::Search(args) => commands::execute_search(args, &store, &formatter)?,
        Command::Investigate(args) => commands::execute_investigate(args, &store, &formatter)?,
        Command::Connections(args) => commands::execute_connections(args, &store, &formatter)?,
        Command::Stats(args) => commands::execute_stats(args, &store, &formatter)?,
        Command::Export(args) => commands::execute_export(args, &store, &formatter)?,
        Command::Alias(args) => commands::execute_alias(args, &mut store, &formatter)?,
    }

    Ok(())
}
