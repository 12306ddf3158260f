//! Derive command implementation.

use crate::error::Result;
use crate::output::Formatter;
use flightlog_store::SqliteStore;

/// Execute the derive command.
pub fn execute_derive(store: &mut SqliteStore, formatter: &Formatter) -> Result<()> {
    let report = flightlog_graph::derive_all(store)?;
    println!("{}", formatter.format_derive(&report)?);
    Ok(())
}
