//! Connection module - pairwise co-travel relationships
//!
//! Connections are derived from shared flights and can always be recomputed.
//! Each unordered passenger pair is stored once, with the lower id first.

use crate::ids::PassengerId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fewest shared flights a pair needs before it is recorded
pub const MIN_SHARED_FLIGHTS: u32 = 2;

/// Upper bound of the strength scale
pub const MAX_STRENGTH: u8 = 10;

/// Strength gained per shared flight
pub const STRENGTH_PER_FLIGHT: u32 = 2;

/// Capped linear strength for a number of shared flights
///
/// # Examples
///
/// ```
/// use flightlog_domain::connection::connection_strength;
///
/// assert_eq!(connection_strength(2), 4);
/// assert_eq!(connection_strength(9), 10);
/// ```
pub fn connection_strength(shared_flights: u32) -> u8 {
    let raw = shared_flights.saturating_mul(STRENGTH_PER_FLIGHT);
    raw.min(MAX_STRENGTH as u32) as u8
}

/// Type of connection between two passengers
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionType {
    /// Derived from shared flights
    CoTraveler,

    /// No stored connection
    Unknown,

    /// Any other label written to the store by an investigator
    Other(String),
}

impl ConnectionType {
    /// Get the type as stored
    pub fn as_str(&self) -> &str {
        match self {
            ConnectionType::CoTraveler => "co_traveler",
            ConnectionType::Unknown => "unknown",
            ConnectionType::Other(s) => s,
        }
    }

    /// Parse a stored type
    pub fn parse(s: &str) -> Self {
        match s {
            "co_traveler" => ConnectionType::CoTraveler,
            "unknown" => ConnectionType::Unknown,
            other => ConnectionType::Other(other.to_string()),
        }
    }
}

/// Investigative status of a relationship
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipStatus {
    /// Not assessed
    Unknown,

    /// Any other label written to the store by an investigator
    Other(String),
}

impl RelationshipStatus {
    /// Get the status as stored
    pub fn as_str(&self) -> &str {
        match self {
            RelationshipStatus::Unknown => "unknown",
            RelationshipStatus::Other(s) => s,
        }
    }

    /// Parse a stored status
    pub fn parse(s: &str) -> Self {
        match s {
            "unknown" => RelationshipStatus::Unknown,
            other => RelationshipStatus::Other(other.to_string()),
        }
    }
}

/// A pairwise co-travel connection between two passengers
///
/// Invariant: `passenger1 < passenger2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Lower passenger id of the pair
    pub passenger1: PassengerId,

    /// Higher passenger id of the pair
    pub passenger2: PassengerId,

    /// Type of connection
    pub connection_type: ConnectionType,

    /// Strength on a 0-10 scale
    pub strength: u8,

    /// Number of flights both passengers were on
    pub shared_flights_count: u32,

    /// Earliest shared flight
    pub first_interaction: Option<NaiveDate>,

    /// Latest shared flight
    pub last_interaction: Option<NaiveDate>,

    /// Investigative status
    pub relationship_status: RelationshipStatus,
}

impl Connection {
    /// Create a co-traveler connection from aggregated shared flights
    ///
    /// The pair is put into canonical order regardless of argument order.
    ///
    /// # Panics
    /// Panics if both ids are the same passenger
    pub fn co_travel(
        a: PassengerId,
        b: PassengerId,
        shared_flights_count: u32,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Self {
        assert!(a != b, "A passenger cannot be connected to themselves");
        let (passenger1, passenger2) = ordered_pair(a, b);

        Self {
            passenger1,
            passenger2,
            connection_type: ConnectionType::CoTraveler,
            strength: connection_strength(shared_flights_count),
            shared_flights_count,
            first_interaction: Some(first),
            last_interaction: Some(last),
            relationship_status: RelationshipStatus::Unknown,
        }
    }

}

/// Put two passenger ids into canonical (ascending) order
pub fn ordered_pair(a: PassengerId, b: PassengerId) -> (PassengerId, PassengerId) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_threshold_values() {
        assert_eq!(connection_strength(0), 0);
        assert_eq!(connection_strength(1), 2);
        assert_eq!(connection_strength(2), 4);
        assert_eq!(connection_strength(5), 10);
        assert_eq!(connection_strength(u32::MAX), 10);
    }

    #[test]
    fn test_co_travel_orders_pair() {
        let c = Connection::co_travel(
            PassengerId::from_value(9),
            PassengerId::from_value(3),
            2,
            date(1995, 1, 1),
            date(1996, 2, 2),
        );
        assert_eq!(c.passenger1, PassengerId::from_value(3));
        assert_eq!(c.passenger2, PassengerId::from_value(9));
        assert_eq!(c.strength, 4);
        assert_eq!(c.connection_type, ConnectionType::CoTraveler);
        assert_eq!(c.relationship_status, RelationshipStatus::Unknown);
    }

    #[test]
    #[should_panic]
    fn test_self_connection_rejected() {
        let id = PassengerId::from_value(1);
        Connection::co_travel(id, id, 3, date(2000, 1, 1), date(2000, 1, 2));
    }

    #[test]
    fn test_stored_labels_round_trip() {
        assert_eq!(ConnectionType::parse("co_traveler"), ConnectionType::CoTraveler);
        assert_eq!(
            ConnectionType::parse("business"),
            ConnectionType::Other("business".to_string())
        );
        assert_eq!(ConnectionType::parse("business").as_str(), "business");
        assert_eq!(RelationshipStatus::parse("unknown"), RelationshipStatus::Unknown);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: strength follows min(10, 2n)
        #[test]
        fn test_strength_law(n in 0u32..10_000) {
            prop_assert_eq!(connection_strength(n) as u32, (2 * n).min(10));
        }

        /// Property: strength never decreases as shared flights increase
        #[test]
        fn test_strength_monotonic(a in 0u32..10_000, b in 0u32..10_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(connection_strength(lo) <= connection_strength(hi));
        }

        /// Property: pair ordering does not depend on argument order
        #[test]
        fn test_ordered_pair_symmetric(a: i64, b: i64) {
            let x = PassengerId::from_value(a);
            let y = PassengerId::from_value(b);
            prop_assert_eq!(ordered_pair(x, y), ordered_pair(y, x));
            let (lo, hi) = ordered_pair(x, y);
            prop_assert!(lo <= hi);
        }
    }
}
