//! Read models returned by stores and the query layer
//!
//! These are flat, serializable views assembled from the persisted model.
//! None of them are written back.

use crate::connection::ConnectionType;
use crate::entity::PassengerType;
use crate::filter::Page;
use crate::ids::{FlightId, PassengerId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A passenger as listed on a flight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestPassenger {
    /// Resolved passenger
    pub id: PassengerId,
    /// Canonical name
    pub name: String,
}

/// A flight with its route and full passenger list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightSummary {
    /// Flight
    pub id: FlightId,
    /// Flight number
    pub flight_number: String,
    /// Date of the flight
    pub flight_date: NaiveDate,
    /// Departure airport code
    pub departure_code: String,
    /// Arrival airport code
    pub arrival_code: String,
    /// Tail number, when known
    pub aircraft: Option<String>,
    /// Stored passenger count
    pub passenger_count: u32,
    /// Everyone linked to the flight, in manifest order
    pub passengers: Vec<ManifestPassenger>,
}

impl FlightSummary {
    /// Canonical names of everyone on the flight
    pub fn passenger_names(&self) -> Vec<String> {
        self.passengers.iter().map(|p| p.name.clone()).collect()
    }
}

/// One page of search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    /// Flights on this page, most recent first
    pub flights: Vec<FlightSummary>,
    /// Number of flights matching the filters, ignoring pagination
    pub total_count: u64,
    /// Page that was requested
    pub page: Page,
}

/// A companion who shared flights with an investigated passenger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Companion {
    /// Companion
    pub passenger_id: PassengerId,
    /// Canonical name
    pub name: String,
    /// Number of shared flights
    pub shared_flights: u32,
    /// Flight numbers of the shared flights, oldest first
    pub flight_numbers: Vec<String>,
    /// First shared flight
    pub first_shared: NaiveDate,
    /// Last shared flight
    pub last_shared: NaiveDate,
}

/// Travel profile of the passengers matching a name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassengerInvestigation {
    /// Name text that was investigated
    pub query: String,
    /// Canonical names of every matching passenger
    pub matched_names: Vec<String>,
    /// Distinct flights any matching passenger was on
    pub total_flights: usize,
    /// Distinct arrival airports
    pub unique_destinations: usize,
    /// Most frequent departure airport
    pub most_common_departure: Option<String>,
    /// Most frequent arrival airport
    pub most_common_arrival: Option<String>,
    /// Flights divided by calendar months spanned (inclusive)
    pub flights_per_month: f64,
    /// Earliest flight
    pub first_flight: Option<NaiveDate>,
    /// Latest flight
    pub last_flight: Option<NaiveDate>,
    /// Most frequent companions, strongest first
    pub frequent_companions: Vec<Companion>,
}

/// Outcome of a passenger investigation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Investigation {
    /// At least one matching passenger has flights
    Found(PassengerInvestigation),
    /// Nobody matched, or the matches never flew
    NoData {
        /// Name text that was investigated
        passenger_name: String,
    },
}

impl Investigation {
    /// Whether the investigation found nothing
    pub fn is_no_data(&self) -> bool {
        matches!(self, Investigation::NoData { .. })
    }
}

/// A flight carrying both sides of a connection lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedFlight {
    /// Flight
    pub flight_id: FlightId,
    /// Flight number
    pub flight_number: String,
    /// Date of the flight
    pub flight_date: NaiveDate,
    /// Departure airport code
    pub departure_code: String,
    /// Arrival airport code
    pub arrival_code: String,
    /// Co-passengers outside the matched pair, sorted by name
    pub other_passengers: Vec<String>,
}

/// Result of a pairwise connection lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionReport {
    /// Flights both sides were on, oldest first
    pub shared_flights: Vec<SharedFlight>,
    /// Stored strength (0 when nothing is stored)
    pub connection_strength: u8,
    /// Stored type (`unknown` when nothing is stored)
    pub connection_type: ConnectionType,
    /// Stored shared-flight count
    pub stored_shared_flights: u32,
    /// Stored first interaction
    pub first_interaction: Option<NaiveDate>,
    /// Stored last interaction
    pub last_interaction: Option<NaiveDate>,
}

/// Headline numbers for the whole store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewStats {
    /// Flights stored
    pub total_flights: u64,
    /// Distinct passengers linked to at least one flight
    pub total_passengers: u64,
    /// Distinct (departure, arrival) pairs
    pub total_routes: u64,
    /// Earliest flight
    pub first_flight: Option<NaiveDate>,
    /// Latest flight
    pub last_flight: Option<NaiveDate>,
    /// Stored connections
    pub total_connections: u64,
}

/// Flight count for one passenger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerFlightCount {
    /// Passenger
    pub passenger_id: PassengerId,
    /// Canonical name
    pub name: String,
    /// Classification
    pub passenger_type: PassengerType,
    /// Flights the passenger was on
    pub flight_count: u64,
}

/// Flight count for one route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteFrequency {
    /// Departure airport code
    pub departure_code: String,
    /// Arrival airport code
    pub arrival_code: String,
    /// Flights on the route
    pub flight_count: u64,
    /// First flight on the route
    pub first_flight: NaiveDate,
    /// Last flight on the route
    pub last_flight: NaiveDate,
    /// Tail numbers used on the route, sorted
    pub aircraft: Vec<String>,
}

/// One exported flight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    /// Flight number
    pub flight_number: String,
    /// Date (YYYY-MM-DD)
    pub flight_date: NaiveDate,
    /// Departure airport code
    pub departure_code: String,
    /// Arrival airport code
    pub arrival_code: String,
    /// Tail number
    pub aircraft: String,
    /// Stored passenger count
    pub passenger_count: u32,
    /// Passenger names joined with ", "
    pub passengers: String,
}

impl From<&FlightSummary> for ExportRow {
    fn from(flight: &FlightSummary) -> Self {
        Self {
            flight_number: flight.flight_number.clone(),
            flight_date: flight.flight_date,
            departure_code: flight.departure_code.clone(),
            arrival_code: flight.arrival_code.clone(),
            aircraft: flight.aircraft.clone().unwrap_or_default(),
            passenger_count: flight.passenger_count,
            passengers: flight.passenger_names().join(", "),
        }
    }
}

/// A (flight, passenger) pair read for connection derivation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoTravelRow {
    /// Flight
    pub flight_id: FlightId,
    /// Date of the flight
    pub flight_date: NaiveDate,
    /// Passenger on the flight
    pub passenger_id: PassengerId,
}

/// A flight's route read for pattern derivation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRow {
    /// Flight
    pub flight_id: FlightId,
    /// Date of the flight
    pub flight_date: NaiveDate,
    /// Departure airport code
    pub departure_code: String,
    /// Arrival airport code
    pub arrival_code: String,
}
