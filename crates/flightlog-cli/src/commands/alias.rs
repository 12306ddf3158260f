//! Alias command implementation.

use crate::cli::{AliasAction, AliasArgs};
use crate::error::Result;
use crate::output::Formatter;
use flightlog_store::SqliteStore;

/// Execute an alias command.
pub fn execute_alias(args: AliasArgs, store: &mut SqliteStore, formatter: &Formatter) -> Result<()> {
    match args.action {
        AliasAction::Add { alias, passenger } => {
            let id = store.add_alias(&alias, &passenger)?;
            println!(
                "{}",
                formatter.success(&format!("'{}' now resolves to {} (ID {})", alias, passenger, id))
            );
        }
        AliasAction::List => {
            let aliases = store.list_aliases()?;
            println!("{}", formatter.format_aliases(&aliases)?);
        }
    }
    Ok(())
}
