//! Flightlog Domain Layer
//!
//! This crate contains the core data model for Flightlog. It defines the
//! entities produced by manifest ingestion, the derived co-travel graph, the
//! search filter model, and the trait interfaces that the
//! storage layer implements.
//!
//! ## Key Concepts
//!
//! - **Passenger**: A canonical identity that one or more manifest spellings resolve to
//! - **Location / Aircraft**: Airports and airframes referenced by flights
//! - **Flight**: An immutable manifest entry; links keep the raw manifest spelling
//! - **Connection**: A derived pairwise co-travel summary (never authoritative)
//! - **FlightPattern**: A derived route-frequency summary
//!
//! ## Architecture
//!
//! - Pure data model and business rules only
//! - Storage implementations live in `flightlog-store`
//! - Trait definitions for every store interaction

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod classify;
pub mod connection;
pub mod entity;
pub mod filter;
pub mod flight;
pub mod ids;
pub mod normalize;
pub mod pattern;
pub mod report;
pub mod traits;

// Re-exports for convenience
pub use connection::{Connection, ConnectionType, RelationshipStatus};
pub use entity::{Passenger, PassengerType, RiskLevel};
pub use filter::{FilterClause, FilterError, FilterSpec, FlightFilters, FlightQuery, Page};
pub use flight::{FlightPassengerLink, PassengerRole};
pub use ids::{AircraftId, FlightId, LocationId, PassengerId};
pub use normalize::NameNormalizer;
pub use pattern::{FlightPattern, RiskTag};
pub use report::{
    Companion, ConnectionReport, ExportRow, FlightSummary, Investigation, ManifestPassenger,
    OverviewStats, PassengerFlightCount, PassengerInvestigation, RouteFrequency, SearchPage,
    SharedFlight,
};
pub use traits::{EntityStore, FlightStore, GraphStore, ManifestReader};
