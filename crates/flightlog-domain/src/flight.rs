//! Flights and their passenger links

use crate::ids::{AircraftId, FlightId, LocationId, PassengerId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Role a passenger held on a flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassengerRole {
    /// Listed passenger
    Passenger,
}

impl PassengerRole {
    /// Get the role name as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            PassengerRole::Passenger => "passenger",
        }
    }

    /// Parse a role from its stored name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "passenger" => Some(PassengerRole::Passenger),
            _ => None,
        }
    }
}

/// A flight to be inserted
///
/// Flights are immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFlight {
    /// Flight number
    pub flight_number: String,
    /// Aircraft, when known
    pub aircraft_id: Option<AircraftId>,
    /// Departure airport
    pub departure_id: LocationId,
    /// Arrival airport
    pub arrival_id: LocationId,
    /// Date of the flight
    pub flight_date: NaiveDate,
    /// Manifest reference
    pub manifest_id: String,
    /// Source document tag
    pub source: String,
    /// Data-quality tag
    pub data_quality: String,
}

impl NewFlight {
    /// Manifest reference for an imported row
    pub fn manifest_reference(flight_number: &str, date: NaiveDate) -> String {
        format!("CSV_IMPORT_{}_{}", flight_number, date.format("%Y-%m-%d"))
    }
}

/// Link between a flight and a resolved passenger
///
/// Keeps the unnormalized manifest text next to the resolved identity
/// so every resolution can be audited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightPassengerLink {
    /// Flight
    pub flight_id: FlightId,
    /// Resolved passenger
    pub passenger_id: PassengerId,
    /// Role on the flight
    pub role: PassengerRole,
    /// Name exactly as it appeared in the manifest (trimmed)
    pub name_in_manifest: String,
}

/// A passenger entry to be linked to a flight that is being inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Resolved passenger
    pub passenger_id: PassengerId,
    /// Role on the flight
    pub role: PassengerRole,
    /// Raw manifest text
    pub name_in_manifest: String,
}
