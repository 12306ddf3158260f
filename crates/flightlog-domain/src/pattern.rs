//! Route-frequency patterns derived from flights

use crate::ids::FlightId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fewest flights on a route before it counts as a pattern
pub const MIN_ROUTE_FREQUENCY: usize = 3;

/// Pattern type recorded for route patterns
pub const FREQUENT_ROUTE: &str = "frequent_route";

/// Risk tag assigned to a route pattern by frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTag {
    /// More than ten flights
    High,
    /// More than five flights
    Medium,
    /// Everything else
    Low,
}

impl RiskTag {
    /// Tag for a route flown `frequency` times
    pub fn for_frequency(frequency: usize) -> Self {
        if frequency > 10 {
            RiskTag::High
        } else if frequency > 5 {
            RiskTag::Medium
        } else {
            RiskTag::Low
        }
    }

    /// Get the tag as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTag::High => "high",
            RiskTag::Medium => "medium",
            RiskTag::Low => "low",
        }
    }

    /// Parse a stored tag
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "high" => Some(RiskTag::High),
            "medium" => Some(RiskTag::Medium),
            "low" => Some(RiskTag::Low),
            _ => None,
        }
    }
}

/// A frequently flown route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightPattern {
    /// Display name, e.g. "TEB to PBI Route"
    pub name: String,
    /// Pattern type (always [`FREQUENT_ROUTE`] for route patterns)
    pub pattern_type: String,
    /// Departure airport code
    pub departure_code: String,
    /// Arrival airport code
    pub arrival_code: String,
    /// Human-readable summary
    pub description: String,
    /// Flights on the route, oldest first
    pub flight_ids: Vec<FlightId>,
    /// Number of flights on the route
    pub frequency: usize,
    /// First flight on the route
    pub date_start: NaiveDate,
    /// Last flight on the route
    pub date_end: NaiveDate,
    /// Risk tag
    pub risk: RiskTag,
}

impl FlightPattern {
    /// Build a route pattern from its chronologically ordered flights
    pub fn route(
        departure_code: &str,
        arrival_code: &str,
        flight_ids: Vec<FlightId>,
        date_start: NaiveDate,
        date_end: NaiveDate,
    ) -> Self {
        let frequency = flight_ids.len();
        Self {
            name: format!("{} to {} Route", departure_code, arrival_code),
            pattern_type: FREQUENT_ROUTE.to_string(),
            departure_code: departure_code.to_string(),
            arrival_code: arrival_code.to_string(),
            description: format!(
                "Route flown {} times between {} and {}",
                frequency,
                date_start.format("%Y-%m-%d"),
                date_end.format("%Y-%m-%d")
            ),
            flight_ids,
            frequency,
            date_start,
            date_end,
            risk: RiskTag::for_frequency(frequency),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_thresholds() {
        assert_eq!(RiskTag::for_frequency(3), RiskTag::Low);
        assert_eq!(RiskTag::for_frequency(5), RiskTag::Low);
        assert_eq!(RiskTag::for_frequency(6), RiskTag::Medium);
        assert_eq!(RiskTag::for_frequency(10), RiskTag::Medium);
        assert_eq!(RiskTag::for_frequency(11), RiskTag::High);
    }

    #[test]
    fn test_route_description() {
        let start = NaiveDate::from_ymd_opt(1997, 1, 5).unwrap();
        let end = NaiveDate::from_ymd_opt(1998, 3, 9).unwrap();
        let ids = (1..=4).map(FlightId::from_value).collect();
        let p = FlightPattern::route("TEB", "PBI", ids, start, end);

        assert_eq!(p.name, "TEB to PBI Route");
        assert_eq!(p.frequency, 4);
        assert_eq!(p.description, "Route flown 4 times between 1997-01-05 and 1998-03-09");
        assert_eq!(p.risk, RiskTag::Low);
        assert_eq!(p.pattern_type, FREQUENT_ROUTE);
    }
}
