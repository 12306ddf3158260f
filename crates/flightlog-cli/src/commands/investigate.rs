//! Investigate command implementation.

use crate::cli::InvestigateArgs;
use crate::error::Result;
use crate::output::Formatter;
use flightlog_query::QueryEngine;
use flightlog_store::SqliteStore;

/// Execute the investigate command.
pub fn execute_investigate(
    args: InvestigateArgs,
    store: &SqliteStore,
    formatter: &Formatter,
) -> Result<()> {
    let investigation = QueryEngine::new(store).investigate(&args.name)?;
    println!("{}", formatter.format_investigation(&investigation)?);
    Ok(())
}
