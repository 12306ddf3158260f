//! Flightlog Query Engine
//!
//! Read-only search and investigative lookups over a store implementing
//! [`ManifestReader`](flightlog_domain::ManifestReader).
//!
//! # Example
//!
//! ```no_run
//! use flightlog_domain::FlightFilters;
//! use flightlog_query::QueryEngine;
//! use flightlog_store::SqliteStore;
//!
//! let store = SqliteStore::new("flightlog.db").expect("Failed to open store");
//! let engine = QueryEngine::new(&store);
//!
//! let filters = FlightFilters {
//!     year: Some(1995),
//!     departure: Some("TEB".to_string()),
//!     ..Default::default()
//! };
//! let page = engine.search(&filters).expect("Search failed");
//! println!("{} of {} flights", page.flights.len(), page.total_count);
//!
//! let profile = engine.investigate("epstein").expect("Investigation failed");
//! assert!(!profile.is_no_data());
//! ```

#![warn(missing_docs)]

mod engine;
mod error;
mod pairs;
mod profile;

pub use engine::{QueryEngine, MAX_RANKING};
pub use error::QueryError;
pub use profile::MAX_COMPANIONS;
