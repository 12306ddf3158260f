//! Trait definitions for store interactions
//!
//! These traits define the boundaries between domain logic and storage.
//! The SQLite implementation lives in `flightlog-store`; the ingest, graph
//! and query crates are generic over them.

use crate::connection::Connection;
use crate::entity::{NewAircraft, NewLocation, NewPassenger, Passenger};
use crate::filter::{FilterSpec, Page};
use crate::flight::{ManifestEntry, NewFlight};
use crate::ids::{AircraftId, FlightId, LocationId, PassengerId};
use crate::pattern::FlightPattern;
use crate::report::{
    CoTravelRow, FlightSummary, OverviewStats, PassengerFlightCount, RouteFrequency, RouteRow,
    SearchPage,
};

/// Entity lookups and creation used by the resolver
///
/// Implemented by the infrastructure layer (flightlog-store)
pub trait EntityStore {
    /// Error type for store operations
    type Error;

    /// Every passenger lookup key: canonical names plus persisted aliases
    ///
    /// Keys are returned as stored; callers lowercase them.
    fn load_passenger_keys(&self) -> Result<Vec<(String, PassengerId)>, Self::Error>;

    /// Every known airport code
    fn load_location_keys(&self) -> Result<Vec<(String, LocationId)>, Self::Error>;

    /// Every known tail number
    fn load_aircraft_keys(&self) -> Result<Vec<(String, AircraftId)>, Self::Error>;

    /// Persist a new passenger
    fn insert_passenger(&mut self, passenger: &NewPassenger) -> Result<PassengerId, Self::Error>;

    /// Persist a new location
    fn insert_location(&mut self, location: &NewLocation) -> Result<LocationId, Self::Error>;

    /// Persist a new aircraft
    fn insert_aircraft(&mut self, aircraft: &NewAircraft) -> Result<AircraftId, Self::Error>;
}

/// Flight writes performed by the import pipeline
pub trait FlightStore: EntityStore {
    /// Open a write batch
    fn begin_batch(&mut self) -> Result<(), Self::Error>;

    /// Commit the open batch (a no-op when none is open)
    fn commit_batch(&mut self) -> Result<(), Self::Error>;

    /// Insert a flight and its passenger links atomically
    ///
    /// Either the flight row and every link are written, or nothing is.
    fn insert_flight(
        &mut self,
        flight: &NewFlight,
        entries: &[ManifestEntry],
    ) -> Result<FlightId, Self::Error>;
}

/// Reads and writes for the derived connection graph and route patterns
pub trait GraphStore {
    /// Error type for store operations
    type Error;

    /// Every (flight, passenger) link with its flight date
    fn co_travel_rows(&self) -> Result<Vec<CoTravelRow>, Self::Error>;

    /// Upsert connections keyed by passenger pair, in one transaction
    ///
    /// Existing rows keep their type and status; counts, strength and the
    /// last interaction date are overwritten.
    fn upsert_connections(&mut self, connections: &[Connection]) -> Result<usize, Self::Error>;

    /// Every flight's route
    fn route_rows(&self) -> Result<Vec<RouteRow>, Self::Error>;

    /// Replace all stored route patterns in one transaction
    fn replace_patterns(&mut self, patterns: &[FlightPattern]) -> Result<usize, Self::Error>;
}

/// Read-only queries over the persisted model
pub trait ManifestReader {
    /// Error type for store operations
    type Error;

    /// One page of flights matching the spec, plus the total match count
    fn search_flights(&self, spec: &FilterSpec, page: Page) -> Result<SearchPage, Self::Error>;

    /// Every flight matching the spec, most recent first
    fn export_flights(&self, spec: &FilterSpec) -> Result<Vec<FlightSummary>, Self::Error>;

    /// Passengers whose name contains the text (case-insensitive)
    fn find_passengers(&self, name_contains: &str) -> Result<Vec<Passenger>, Self::Error>;

    /// Flights carrying any of the passengers, oldest first
    fn flights_with_passengers(
        &self,
        ids: &[PassengerId],
    ) -> Result<Vec<FlightSummary>, Self::Error>;

    /// Stored connections joining someone in `a` to someone in `b`
    fn connections_between(
        &self,
        a: &[PassengerId],
        b: &[PassengerId],
    ) -> Result<Vec<Connection>, Self::Error>;

    /// Headline counts
    fn overview(&self) -> Result<OverviewStats, Self::Error>;

    /// Passengers with the most flights
    fn top_passengers(&self, limit: usize) -> Result<Vec<PassengerFlightCount>, Self::Error>;

    /// Routes with the most flights
    fn top_routes(&self, limit: usize) -> Result<Vec<RouteFrequency>, Self::Error>;

    /// Stored route patterns, most frequent first
    fn patterns(&self) -> Result<Vec<FlightPattern>, Self::Error>;
}
