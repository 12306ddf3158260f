//! Stats command implementation.

use crate::cli::{StatsArgs, StatsView};
use crate::error::Result;
use crate::output::Formatter;
use flightlog_query::QueryEngine;
use flightlog_store::SqliteStore;

/// Execute the stats command.
pub fn execute_stats(args: StatsArgs, store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    let engine = QueryEngine::new(store);

    let output = match args.view.unwrap_or(StatsView::Overview) {
        StatsView::Overview => formatter.format_overview(&engine.overview()?)?,
        StatsView::Passengers { limit } => {
            formatter.format_top_passengers(&engine.top_passengers(limit)?)?
        }
        StatsView::Routes { limit } => formatter.format_routes(&engine.top_routes(limit)?)?,
        StatsView::Patterns => formatter.format_patterns(&engine.patterns()?)?,
    };

    println!("{}", output);
    Ok(())
}
