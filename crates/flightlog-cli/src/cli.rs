//! CLI command definitions and argument parsing.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use flightlog_domain::FlightFilters;
use std::path::PathBuf;

/// Flightlog CLI - Import flight manifests and investigate co-travel.
#[derive(Debug, Parser)]
#[command(name = "flightlog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file path
    #[arg(short, long, global = true, env = "FLIGHTLOG_DB")]
    pub database: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import a flight manifest file
    Import(ImportArgs),

    /// Rebuild connections and route patterns
    Derive,

    /// Search flights
    Search(SearchArgs),

    /// Investigate a passenger's travel
    Investigate(InvestigateArgs),

    /// Show flights and stored connection between two passengers
    Connections(ConnectionsArgs),

    /// Show statistics
    Stats(StatsArgs),

    /// Export flights to CSV or JSON
    Export(ExportArgs),

    /// Manage passenger aliases
    Alias(AliasArgs),
}

/// Arguments for the import command.
#[derive(Debug, Parser)]
pub struct ImportArgs {
    /// Manifest file (comma, semicolon, tab or pipe delimited)
    pub file: PathBuf,

    /// Rows per committed batch
    #[arg(short, long)]
    pub batch_size: Option<usize>,

    /// Source tag written on every flight
    #[arg(short, long)]
    pub source: Option<String>,

    /// Rebuild connections and patterns after the import
    #[arg(long)]
    pub derive: bool,
}

/// Flight filters shared by search and export.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Passenger name contains (case-insensitive)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Either airport code contains (case-insensitive)
    #[arg(short, long)]
    pub airport: Option<String>,

    /// Earliest flight date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Latest flight date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Exact departure code ("all" for any)
    #[arg(long)]
    pub departure: Option<String>,

    /// Exact arrival code ("all" for any)
    #[arg(long)]
    pub arrival: Option<String>,

    /// Flight year
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Flight month (1-12)
    #[arg(short, long)]
    pub month: Option<u32>,

    /// Any of these passenger names (repeatable)
    #[arg(short, long = "passenger")]
    pub passengers: Vec<String>,
}

/// Arguments for the search command.
#[derive(Debug, Parser)]
pub struct SearchArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Maximum number of results
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Results to skip
    #[arg(short, long)]
    pub offset: Option<usize>,
}

/// Arguments for the investigate command.
#[derive(Debug, Parser)]
pub struct InvestigateArgs {
    /// Passenger name (substring, case-insensitive)
    pub name: String,
}

/// Arguments for the connections command.
#[derive(Debug, Parser)]
pub struct ConnectionsArgs {
    /// First passenger name (substring)
    pub first: String,

    /// Second passenger name (substring)
    pub second: String,
}

/// Arguments for the stats command.
#[derive(Debug, Parser)]
pub struct StatsArgs {
    #[command(subcommand)]
    pub view: Option<StatsView>,
}

/// Statistics views.
#[derive(Debug, Subcommand)]
pub enum StatsView {
    /// Totals and date range
    Overview,

    /// Passengers with the most flights
    Passengers {
        /// Number of passengers
        #[arg(short, long, default_value = "15")]
        limit: usize,
    },

    /// Most flown routes
    Routes {
        /// Number of routes
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Stored route patterns
    Patterns,
}

/// Arguments for the export command.
#[derive(Debug, Parser)]
pub struct ExportArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Export format
    #[arg(long = "as", value_enum, default_value = "csv")]
    pub export_as: ExportFormat,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Export file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    /// Comma-separated values with a header row
    Csv,
    /// JSON array
    Json,
}

/// Arguments for alias management.
#[derive(Debug, Parser)]
pub struct AliasArgs {
    #[command(subcommand)]
    pub action: AliasAction,
}

/// Alias management actions.
#[derive(Debug, Subcommand)]
pub enum AliasAction {
    /// Map a spelling to an existing passenger
    Add {
        /// Spelling as it appears in manifests
        alias: String,
        /// Canonical name of the passenger
        passenger: String,
    },

    /// List stored aliases
    List,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl FilterArgs {
    /// Build search filters with the given pagination
    pub fn to_filters(&self, limit: Option<usize>, offset: Option<usize>) -> FlightFilters {
        FlightFilters {
            passenger_name: self.name.clone(),
            airport_code: self.airport.clone(),
            date_from: self.from,
            date_to: self.to,
            departure: self.departure.clone(),
            arrival: self.arrival.clone(),
            year: self.year,
            month: self.month,
            passengers: self.passengers.clone(),
            limit,
            offset,
        }
    }
}
