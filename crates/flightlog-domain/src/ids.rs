//! Identifier newtypes for persisted records
//!
//! Identifiers are generated by the store on insert (row ids). They are
//! totally ordered, which the connection graph relies on to keep every
//! passenger pair in a single canonical orientation.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw store-generated value
            pub fn from_value(value: i64) -> Self {
                Self(value)
            }

            /// Get the raw value
            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

record_id!(
    /// Unique identifier for a passenger
    PassengerId
);
record_id!(
    /// Unique identifier for a location (airport)
    LocationId
);
record_id!(
    /// Unique identifier for an aircraft
    AircraftId
);
record_id!(
    /// Unique identifier for a flight
    FlightId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passenger_id_ordering() {
        let id1 = PassengerId::from_value(1000);
        let id2 = PassengerId::from_value(2000);

        assert!(id1 < id2);
        assert!(id2 > id1);
    }

    #[test]
    fn test_display() {
        assert_eq!(FlightId::from_value(42).to_string(), "42");
    }

    #[test]
    fn test_serializes_as_bare_number() {
        let json = serde_json::to_string(&LocationId::from_value(7)).unwrap();
        assert_eq!(json, "7");
    }
}
