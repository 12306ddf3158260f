//! Import command implementation.

use crate::cli::ImportArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use flightlog_ingest::ImportPipeline;
use flightlog_store::SqliteStore;
use tracing::info;

/// Execute the import command.
pub fn execute_import(
    args: ImportArgs,
    config: &Config,
    store: &mut SqliteStore,
    formatter: &Formatter,
) -> Result<()> {
    if !args.file.is_file() {
        return Err(CliError::InvalidInput(format!(
            "Manifest file not found: {}",
            args.file.display()
        )));
    }

    let mut import_config = config.import.clone();
    if let Some(batch_size) = args.batch_size {
        import_config.batch_size = batch_size;
    }
    if let Some(source) = args.source {
        import_config.source_tag = Some(source);
    }

    info!("Importing {}", args.file.display());
    let stats = ImportPipeline::new(&mut *store, import_config).run_path(&args.file)?;
    println!("{}", formatter.format_import(&stats)?);

    if args.derive {
        let report = flightlog_graph::derive_all(store)?;
        println!("{}", formatter.format_derive(&report)?);
    }

    Ok(())
}
