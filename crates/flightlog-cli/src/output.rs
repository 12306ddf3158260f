//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use flightlog_domain::{
    ConnectionReport, FlightPattern, Investigation, OverviewStats, PassengerFlightCount,
    RouteFrequency, SearchPage,
};
use flightlog_graph::DeriveReport;
use flightlog_ingest::ImportStats;
use flightlog_store::AliasEntry;
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a page of search results.
    pub fn format_flights(&self, page: &SearchPage) -> Result<String> {
        match self.format {
            OutputFormat::Json => json(page),
            OutputFormat::Quiet => Ok(lines(page.flights.iter().map(|f| f.id.to_string()))),
            OutputFormat::Table => {
                if page.flights.is_empty() {
                    return Ok(self.colorize("No flights found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Date", "Flight", "Route", "Aircraft", "Pax", "Passengers"]);
                for f in &page.flights {
                    builder.push_record([
                        f.flight_date.to_string(),
                        f.flight_number.clone(),
                        format!("{} → {}", f.departure_code, f.arrival_code),
                        f.aircraft.clone().unwrap_or_else(|| "-".to_string()),
                        f.passenger_count.to_string(),
                        f.passenger_names().join(", "),
                    ]);
                }

                let shown_to = page.page.offset + page.flights.len();
                Ok(format!(
                    "{}\n{}",
                    table(builder),
                    self.info(&format!(
                        "Showing {}-{} of {} flights",
                        page.page.offset + 1,
                        shown_to,
                        page.total_count
                    ))
                ))
            }
        }
    }

    /// Format a passenger investigation.
    pub fn format_investigation(&self, investigation: &Investigation) -> Result<String> {
        let profile = match (self.format, investigation) {
            (OutputFormat::Json, _) => return json(investigation),
            (_, Investigation::NoData { passenger_name }) => {
                return Ok(self.warning(&format!("No flight data found for '{}'", passenger_name)));
            }
            (OutputFormat::Quiet, Investigation::Found(p)) => {
                return Ok(lines(p.frequent_companions.iter().map(|c| c.passenger_id.to_string())));
            }
            (OutputFormat::Table, Investigation::Found(p)) => p,
        };

        let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
        let mut out = vec![
            self.colorize(&format!("Investigation: {}", profile.query), "cyan"),
            format!("  Matched:          {}", profile.matched_names.join(", ")),
            format!("  Total flights:    {}", profile.total_flights),
            format!("  Destinations:     {}", profile.unique_destinations),
            format!("  Top departure:    {}", or_dash(&profile.most_common_departure)),
            format!("  Top arrival:      {}", or_dash(&profile.most_common_arrival)),
            format!("  Flights/month:    {:.2}", profile.flights_per_month),
        ];
        if let (Some(first), Some(last)) = (profile.first_flight, profile.last_flight) {
            out.push(format!("  Active:           {} to {}", first, last));
        }

        if profile.frequent_companions.is_empty() {
            out.push(self.info("No companions on more than one flight"));
        } else {
            let mut builder = Builder::default();
            builder.push_record(["Companion", "Shared", "First", "Last", "Flights"]);
            for c in &profile.frequent_companions {
                builder.push_record([
                    c.name.clone(),
                    c.shared_flights.to_string(),
                    c.first_shared.to_string(),
                    c.last_shared.to_string(),
                    c.flight_numbers.join(", "),
                ]);
            }
            out.push(table(builder));
        }

        Ok(out.join("\n"))
    }

    /// Format a pairwise connection lookup.
    pub fn format_connection(&self, first: &str, second: &str, report: &ConnectionReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => json(report),
            OutputFormat::Quiet => Ok(lines(report.shared_flights.iter().map(|f| f.flight_id.to_string()))),
            OutputFormat::Table => {
                let mut out = vec![
                    self.colorize(&format!("{} ↔ {}", first, second), "cyan"),
                    format!(
                        "  Strength: {}/10 ({}), {} stored shared flights",
                        report.connection_strength,
                        report.connection_type.as_str(),
                        report.stored_shared_flights
                    ),
                ];
                if let (Some(a), Some(b)) = (report.first_interaction, report.last_interaction) {
                    out.push(format!("  Documented: {} to {}", a, b));
                }

                if report.shared_flights.is_empty() {
                    out.push(self.warning("No shared flights"));
                } else {
                    let mut builder = Builder::default();
                    builder.push_record(["Date", "Flight", "Route", "Also aboard"]);
                    for f in &report.shared_flights {
                        builder.push_record([
                            f.flight_date.to_string(),
                            f.flight_number.clone(),
                            format!("{} → {}", f.departure_code, f.arrival_code),
                            f.other_passengers.join(", "),
                        ]);
                    }
                    out.push(table(builder));
                }
                Ok(out.join("\n"))
            }
        }
    }

    /// Format overview statistics.
    pub fn format_overview(&self, stats: &OverviewStats) -> Result<String> {
        if self.format == OutputFormat::Json {
            return json(stats);
        }

        let range = match (stats.first_flight, stats.last_flight) {
            (Some(a), Some(b)) => format!("{} to {}", a, b),
            _ => "-".to_string(),
        };
        let mut builder = Builder::default();
        builder.push_record(["Metric", "Value"]);
        builder.push_record(["Flights".to_string(), stats.total_flights.to_string()]);
        builder.push_record(["Passengers".to_string(), stats.total_passengers.to_string()]);
        builder.push_record(["Routes".to_string(), stats.total_routes.to_string()]);
        builder.push_record(["Connections".to_string(), stats.total_connections.to_string()]);
        builder.push_record(["Date range".to_string(), range]);
        Ok(table(builder))
    }

    /// Format the passenger ranking.
    pub fn format_top_passengers(&self, ranking: &[PassengerFlightCount]) -> Result<String> {
        match self.format {
            OutputFormat::Json => json(&ranking),
            OutputFormat::Quiet => Ok(lines(ranking.iter().map(|p| p.passenger_id.to_string()))),
            OutputFormat::Table => {
                if ranking.is_empty() {
                    return Ok(self.colorize("No passengers found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["#", "Passenger", "Type", "Flights"]);
                for (rank, p) in ranking.iter().enumerate() {
                    builder.push_record([
                        (rank + 1).to_string(),
                        p.name.clone(),
                        p.passenger_type.as_str().to_string(),
                        p.flight_count.to_string(),
                    ]);
                }
                Ok(table(builder))
            }
        }
    }

    /// Format the route ranking.
    pub fn format_routes(&self, routes: &[RouteFrequency]) -> Result<String> {
        match self.format {
            OutputFormat::Json => json(&routes),
            OutputFormat::Quiet => Ok(lines(
                routes.iter().map(|r| format!("{}-{}", r.departure_code, r.arrival_code)),
            )),
            OutputFormat::Table => {
                if routes.is_empty() {
                    return Ok(self.colorize("No routes found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Route", "Flights", "First", "Last", "Aircraft"]);
                for r in routes {
                    builder.push_record([
                        format!("{} → {}", r.departure_code, r.arrival_code),
                        r.flight_count.to_string(),
                        r.first_flight.to_string(),
                        r.last_flight.to_string(),
                        r.aircraft.join(", "),
                    ]);
                }
                Ok(table(builder))
            }
        }
    }

    /// Format stored route patterns.
    pub fn format_patterns(&self, patterns: &[FlightPattern]) -> Result<String> {
        match self.format {
            OutputFormat::Json => json(&patterns),
            OutputFormat::Quiet => Ok(lines(patterns.iter().map(|p| p.name.clone()))),
            OutputFormat::Table => {
                if patterns.is_empty() {
                    return Ok(self.colorize("No patterns stored. Run 'derive' first.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Pattern", "Flights", "From", "To", "Risk"]);
                for p in patterns {
                    builder.push_record([
                        p.name.clone(),
                        p.frequency.to_string(),
                        p.date_start.to_string(),
                        p.date_end.to_string(),
                        self.risk(p.risk.as_str()),
                    ]);
                }
                Ok(table(builder))
            }
        }
    }

    /// Format import counters.
    pub fn format_import(&self, stats: &ImportStats) -> Result<String> {
        match self.format {
            OutputFormat::Json => json(stats),
            OutputFormat::Quiet => Ok(stats.flights_imported.to_string()),
            OutputFormat::Table => {
                let headline = format!(
                    "Imported {} flights from {} rows",
                    stats.flights_imported, stats.rows_read
                );
                let mut out = vec![if stats.errors == 0 {
                    self.success(&headline)
                } else {
                    self.warning(&format!("{} ({} rows skipped)", headline, stats.errors))
                }];
                out.push(stats.summary());
                Ok(out.join("\n"))
            }
        }
    }

    /// Format derivation counters.
    pub fn format_derive(&self, report: &DeriveReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => json(report),
            OutputFormat::Quiet => Ok(format!("{} {}", report.connections_written, report.patterns_written)),
            OutputFormat::Table => Ok(format!(
                "{}\n{}",
                self.success(&format!(
                    "Derived {} connections and {} patterns",
                    report.connections_written, report.patterns_written
                )),
                report.summary()
            )),
        }
    }

    /// Format stored aliases.
    pub fn format_aliases(&self, aliases: &[AliasEntry]) -> Result<String> {
        match self.format {
            OutputFormat::Json => json(&aliases),
            OutputFormat::Quiet => Ok(lines(aliases.iter().map(|a| a.alias.clone()))),
            OutputFormat::Table => {
                if aliases.is_empty() {
                    return Ok(self.info("No aliases stored"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Alias", "Passenger", "ID"]);
                for a in aliases {
                    builder.push_record([a.alias.clone(), a.passenger_name.clone(), a.passenger_id.to_string()]);
                }
                Ok(table(builder))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn risk(&self, tag: &str) -> String {
        match tag {
            "high" => self.colorize(tag, "red"),
            "medium" => self.colorize(tag, "yellow"),
            _ => tag.to_string(),
        }
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn lines<I: IntoIterator<Item = String>>(items: I) -> String {
    items.into_iter().collect::<Vec<_>>().join("\n")
}

fn table(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}
