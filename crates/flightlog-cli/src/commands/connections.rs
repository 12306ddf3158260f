//! Connections command implementation.

use crate::cli::ConnectionsArgs;
use crate::error::Result;
use crate::output::Formatter;
use flightlog_query::QueryEngine;
use flightlog_store::SqliteStore;

/// Execute the connections command.
pub fn execute_connections(
    args: ConnectionsArgs,
    store: &SqliteStore,
    formatter: &Formatter,
) -> Result<()> {
    let report = QueryEngine::new(store).connections(&args.first, &args.second)?;
    println!(
        "{}",
        formatter.format_connection(&args.first, &args.second, &report)?
    );
    Ok(())
}
