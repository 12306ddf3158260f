//! Co-travel connection derivation

use crate::{store_error, DeriveReport, GraphError};
use chrono::NaiveDate;
use flightlog_domain::connection::{ordered_pair, MIN_SHARED_FLIGHTS};
use flightlog_domain::report::CoTravelRow;
use flightlog_domain::traits::GraphStore;
use flightlog_domain::{Connection, FlightId, PassengerId};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

/// Aggregate for one passenger pair
#[derive(Debug, Clone, Copy)]
struct PairTally {
    shared: u32,
    first: NaiveDate,
    last: NaiveDate,
}

/// Builds the co-traveler graph from flight-passenger links
///
/// Every unordered pair of distinct passengers on a flight is tallied; pairs
/// sharing fewer than [`MIN_SHARED_FLIGHTS`] flights are dropped.
///
/// # Examples
///
/// ```no_run
/// use flightlog_graph::{ConnectionGraphBuilder, DeriveReport};
/// use flightlog_store::SqliteStore;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut store = SqliteStore::new("flightlog.db")?;
/// let mut report = DeriveReport::new();
/// ConnectionGraphBuilder::new().run(&mut store, &mut report)?;
/// println!("{} connections", report.connections_written);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConnectionGraphBuilder;

impl ConnectionGraphBuilder {
    /// Create a builder
    pub fn new() -> Self {
        Self
    }

    /// Compute connections from links, ordered by pair
    pub fn compute(&self, rows: &[CoTravelRow]) -> Vec<Connection> {
        Self::to_connections(&Self::tally(rows))
    }

    /// Recompute connections and upsert them into the store
    pub fn run<S>(&self, store: &mut S, report: &mut DeriveReport) -> Result<usize, GraphError>
    where
        S: GraphStore,
        S::Error: Display,
    {
        let rows = store.co_travel_rows().map_err(store_error)?;
        let tally = Self::tally(&rows);
        let connections = Self::to_connections(&tally);

        report.links_scanned += rows.len();
        report.pairs_seen += tally.len();
        report.pairs_suppressed += tally.len() - connections.len();

        let written = store.upsert_connections(&connections).map_err(store_error)?;
        report.connections_written += written;

        tracing::info!(
            "Connections: {} written from {} pairs ({} links)",
            written,
            tally.len(),
            rows.len()
        );
        Ok(written)
    }

    fn tally(rows: &[CoTravelRow]) -> BTreeMap<(PassengerId, PassengerId), PairTally> {
        // A passenger listed twice on one flight still counts once
        let mut flights: BTreeMap<FlightId, (NaiveDate, BTreeSet<PassengerId>)> = BTreeMap::new();
        for row in rows {
            flights
                .entry(row.flight_id)
                .or_insert_with(|| (row.flight_date, BTreeSet::new()))
                .1
                .insert(row.passenger_id);
        }

        let mut pairs: BTreeMap<(PassengerId, PassengerId), PairTally> = BTreeMap::new();
        for (date, passengers) in flights.values() {
            let passengers: Vec<PassengerId> = passengers.iter().copied().collect();
            for (i, &a) in passengers.iter().enumerate() {
                for &b in &passengers[i + 1..] {
                    pairs
                        .entry(ordered_pair(a, b))
                        .and_modify(|t| {
                            t.shared += 1;
                            t.first = t.first.min(*date);
                            t.last = t.last.max(*date);
                        })
                        .or_insert(PairTally {
                            shared: 1,
                            first: *date,
                            last: *date,
                        });
                }
            }
        }
        pairs
    }

    fn to_connections(tally: &BTreeMap<(PassengerId, PassengerId), PairTally>) -> Vec<Connection> {
        tally
            .iter()
            .filter(|(_, t)| t.shared >= MIN_SHARED_FLIGHTS)
            .map(|(&(a, b), t)| Connection::co_travel(a, b, t.shared, t.first, t.last))
            .collect()
    }
}
