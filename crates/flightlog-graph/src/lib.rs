//! Flightlog Graph
//!
//! Derivation passes that turn committed flights into recomputable summaries.
//!
//! # Overview
//!
//! Two passes run after an import has fully committed:
//! - **Connections**: every unordered pair of passengers sharing at least two
//!   flights becomes a co-traveler [`Connection`](flightlog_domain::Connection)
//! - **Patterns**: every route flown at least three times becomes a
//!   [`FlightPattern`](flightlog_domain::FlightPattern)
//!
//! Both passes recompute from scratch and write through the
//! [`GraphStore`](flightlog_domain::GraphStore) trait, so running them again
//! on unchanged flights leaves the store unchanged. Stores refuse derivation
//! writes while an import batch is open.
//!
//! # Usage
//!
//! ```no_run
//! use flightlog_graph::derive_all;
//! use flightlog_store::SqliteStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = SqliteStore::new("flightlog.db")?;
//! let report = derive_all(&mut store)?;
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```
//!
//! The pure halves of each pass are exposed for callers that hold rows in
//! memory:
//!
//! ```
//! use chrono::NaiveDate;
//! use flightlog_domain::report::CoTravelRow;
//! use flightlog_domain::{FlightId, PassengerId};
//! use flightlog_graph::ConnectionGraphBuilder;
//!
//! let date = NaiveDate::from_ymd_opt(1995, 11, 17).unwrap();
//! let rows: Vec<CoTravelRow> = [(1, 1), (1, 2), (2, 1), (2, 2)]
//!     .into_iter()
//!     .map(|(flight, passenger)| CoTravelRow {
//!         flight_id: FlightId::from_value(flight),
//!         flight_date: date,
//!         passenger_id: PassengerId::from_value(passenger),
//!     })
//!     .collect();
//!
//! let connections = ConnectionGraphBuilder::new().compute(&rows);
//! assert_eq!(connections.len(), 1);
//! assert_eq!(connections[0].strength, 4);
//! ```

#![warn(missing_docs)]

mod connections;
mod error;
mod patterns;
mod report;

pub use connections::ConnectionGraphBuilder;
pub use error::GraphError;
pub use patterns::PatternDetector;
pub use report::DeriveReport;

use flightlog_domain::traits::GraphStore;
use std::fmt::Display;
use std::time::Instant;

/// Run the connection pass then the pattern pass
pub fn derive_all<S>(store: &mut S) -> Result<DeriveReport, GraphError>
where
    S: GraphStore,
    S::Error: Display,
{
    let start = Instant::now();
    let mut report = DeriveReport::new();

    ConnectionGraphBuilder::new().run(store, &mut report)?;
    PatternDetector::new().run(store, &mut report)?;

    report.runtime_ms = start.elapsed().as_millis() as u64;
    tracing::info!("Derivation complete in {}ms", report.runtime_ms);
    Ok(report)
}

pub(crate) fn store_error<E: Display>(e: E) -> GraphError {
    GraphError::Store(e.to_string())
}
