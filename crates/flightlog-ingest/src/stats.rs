//! Counters collected during an import run

use serde::Serialize;
use std::collections::BTreeMap;

/// Category of a skipped row
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Row did not match the header layout
    MalformedRow,
    /// Required field empty
    MissingField,
    /// Unparseable date
    InvalidDate,
    /// Unresolvable departure/arrival
    Location,
    /// Passenger resolution failed
    Passenger,
    /// Aircraft resolution failed
    Aircraft,
    /// Flight write failed
    FlightInsert,
}

impl ErrorKind {
    /// Label used in summaries
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MalformedRow => "malformed_row",
            ErrorKind::MissingField => "missing_field",
            ErrorKind::InvalidDate => "invalid_date",
            ErrorKind::Location => "location",
            ErrorKind::Passenger => "passenger",
            ErrorKind::Aircraft => "aircraft",
            ErrorKind::FlightInsert => "flight_insert",
        }
    }
}

/// Counters for one import run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    /// Data rows read from the source
    pub rows_read: usize,
    /// Flights written
    pub flights_imported: usize,
    /// Passengers created
    pub passengers_created: usize,
    /// Locations created
    pub locations_created: usize,
    /// Aircraft created
    pub aircraft_created: usize,
    /// Rows skipped
    pub errors: usize,
    /// Skipped rows per category
    pub errors_by_kind: BTreeMap<ErrorKind, usize>,
}

impl ImportStats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a skipped row
    pub fn record_error(&mut self, kind: ErrorKind) {
        self.errors += 1;
        *self.errors_by_kind.entry(kind).or_insert(0) += 1;
    }

    /// Skipped rows of one category
    pub fn errors_of(&self, kind: ErrorKind) -> usize {
        self.errors_by_kind.get(&kind).copied().unwrap_or(0)
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Import Summary".to_string(),
            "==============".to_string(),
            format!("Rows read: {}", self.rows_read),
            format!("Flights imported: {}", self.flights_imported),
            format!("Passengers created: {}", self.passengers_created),
            format!("Locations created: {}", self.locations_created),
            format!("Aircraft created: {}", self.aircraft_created),
            format!("Errors: {}", self.errors),
        ];

        for (kind, count) in &self.errors_by_kind {
            lines.push(format!("  {}: {}", kind.as_str(), count));
        }

        lines.join("\n")
    }
}
