//! Search command implementation.

use crate::cli::SearchArgs;
use crate::error::Result;
use crate::output::Formatter;
use flightlog_query::QueryEngine;
use flightlog_store::SqliteStore;

/// Execute the search command.
pub fn execute_search(args: SearchArgs, store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    let filters = args.filters.to_filters(args.limit, args.offset);
    let page = QueryEngine::new(store).search(&filters)?;
    println!("{}", formatter.format_flights(&page)?);
    Ok(())
}
