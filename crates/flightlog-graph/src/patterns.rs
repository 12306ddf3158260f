//! Route-frequency pattern detection

use crate::{store_error, DeriveReport, GraphError};
use chrono::NaiveDate;
use flightlog_domain::pattern::MIN_ROUTE_FREQUENCY;
use flightlog_domain::report::RouteRow;
use flightlog_domain::traits::GraphStore;
use flightlog_domain::{FlightId, FlightPattern};
use std::collections::BTreeMap;
use std::fmt::Display;

type RouteKey = (String, String);

/// Detects frequently flown routes
///
/// Flights are grouped by departure and arrival code. Routes flown at least
/// [`MIN_ROUTE_FREQUENCY`] times become patterns, and a run replaces every
/// previously stored route pattern.
#[derive(Debug, Clone, Default)]
pub struct PatternDetector;

impl PatternDetector {
    /// Create a detector
    pub fn new() -> Self {
        Self
    }

    /// Compute route patterns, ordered by route
    pub fn compute(&self, rows: &[RouteRow]) -> Vec<FlightPattern> {
        Self::to_patterns(Self::group(rows))
    }

    /// Recompute route patterns and replace the stored ones
    pub fn run<S>(&self, store: &mut S, report: &mut DeriveReport) -> Result<usize, GraphError>
    where
        S: GraphStore,
        S::Error: Display,
    {
        let rows = store.route_rows().map_err(store_error)?;
        let routes = Self::group(&rows);
        let seen = routes.len();
        let patterns = Self::to_patterns(routes);

        report.flights_scanned += rows.len();
        report.routes_seen += seen;
        report.routes_suppressed += seen - patterns.len();

        let written = store.replace_patterns(&patterns).map_err(store_error)?;
        report.patterns_written += written;

        tracing::info!("Patterns: {} routes of {} flown at least {} times", written, seen, MIN_ROUTE_FREQUENCY);
        Ok(written)
    }

    fn group(rows: &[RouteRow]) -> BTreeMap<RouteKey, Vec<(NaiveDate, FlightId)>> {
        let mut routes: BTreeMap<RouteKey, Vec<(NaiveDate, FlightId)>> = BTreeMap::new();
        for row in rows {
            routes
                .entry((row.departure_code.clone(), row.arrival_code.clone()))
                .or_default()
                .push((row.flight_date, row.flight_id));
        }
        routes
    }

    fn to_patterns(routes: BTreeMap<RouteKey, Vec<(NaiveDate, FlightId)>>) -> Vec<FlightPattern> {
        routes
            .into_iter()
            .filter(|(_, flights)| flights.len() >= MIN_ROUTE_FREQUENCY)
            .filter_map(|((departure, arrival), mut flights)| {
                flights.sort();
                let start = flights.first()?.0;
                let end = flights.last()?.0;
                let ids = flights.into_iter().map(|(_, id)| id).collect();
                Some(FlightPattern::route(&departure, &arrival, ids, start, end))
            })
            .collect()
    }
}
