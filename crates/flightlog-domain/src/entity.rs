//! Resolved entities: passengers, locations and aircraft
//!
//! Entities are created once, on first resolution, and never deleted.
//! Their descriptive metadata is fixed at creation time.

use crate::ids::PassengerId;
use serde::{Deserialize, Serialize};

/// Classification of a passenger's role in the investigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassengerType {
    /// Principal subject of the investigation
    Suspect,
    /// High-profile traveler
    Vip,
    /// Employee or associate
    Staff,
    /// Invited guest
    Guest,
    /// Anyone not in the classification tables
    Regular,
}

impl PassengerType {
    /// Get the type name as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            PassengerType::Suspect => "suspect",
            PassengerType::Vip => "vip",
            PassengerType::Staff => "staff",
            PassengerType::Guest => "guest",
            PassengerType::Regular => "regular",
        }
    }

    /// Parse a type from its stored name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "suspect" => Some(PassengerType::Suspect),
            "vip" => Some(PassengerType::Vip),
            "staff" => Some(PassengerType::Staff),
            "guest" => Some(PassengerType::Guest),
            "regular" => Some(PassengerType::Regular),
            _ => None,
        }
    }
}

/// Risk level assigned to a passenger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Critical
    Critical,
    /// High
    High,
    /// Medium
    Medium,
    /// Low
    Low,
    /// Not assessed
    Unknown,
}

impl RiskLevel {
    /// Get the level name as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Critical => "critical",
            RiskLevel::High => "high",
            RiskLevel::Medium => "medium",
            RiskLevel::Low => "low",
            RiskLevel::Unknown => "unknown",
        }
    }

    /// Parse a level from its stored name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "critical" => Some(RiskLevel::Critical),
            "high" => Some(RiskLevel::High),
            "medium" => Some(RiskLevel::Medium),
            "low" => Some(RiskLevel::Low),
            "unknown" => Some(RiskLevel::Unknown),
            _ => None,
        }
    }
}

/// A canonical passenger identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    /// Store-generated identifier
    pub id: PassengerId,
    /// Canonical full name
    pub full_name: String,
    /// First whitespace-separated token of the name
    pub first_name: String,
    /// Last token, when the name has more than one
    pub last_name: Option<String>,
    /// Classification
    pub passenger_type: PassengerType,
    /// Risk assessment
    pub risk_level: RiskLevel,
    /// Whether the identity is considered verified
    pub verified: bool,
}

/// A passenger that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPassenger {
    /// Canonical full name
    pub full_name: String,
    /// First name part
    pub first_name: String,
    /// Last name part
    pub last_name: Option<String>,
    /// Classification
    pub passenger_type: PassengerType,
    /// Risk assessment
    pub risk_level: RiskLevel,
    /// Verified flag
    pub verified: bool,
}

impl NewPassenger {
    /// Build a passenger record from a canonical name and its classification
    ///
    /// # Examples
    ///
    /// ```
    /// use flightlog_domain::entity::NewPassenger;
    /// use flightlog_domain::{PassengerType, RiskLevel};
    ///
    /// let p = NewPassenger::from_name("Sarah Kellen", PassengerType::Staff, RiskLevel::Medium, true);
    /// assert_eq!(p.first_name, "Sarah");
    /// assert_eq!(p.last_name.as_deref(), Some("Kellen"));
    /// ```
    pub fn from_name(
        full_name: &str,
        passenger_type: PassengerType,
        risk_level: RiskLevel,
        verified: bool,
    ) -> Self {
        let parts: Vec<&str> = full_name.split_whitespace().collect();
        let first_name = parts.first().copied().unwrap_or(full_name).to_string();
        let last_name = if parts.len() > 1 {
            parts.last().map(|s| s.to_string())
        } else {
            None
        };

        Self {
            full_name: full_name.to_string(),
            first_name,
            last_name,
            passenger_type,
            risk_level,
            verified,
        }
    }
}

/// A location that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLocation {
    /// Unique airport code (uppercase)
    pub airport_code: String,
    /// Airport name
    pub name: String,
    /// City
    pub city: String,
    /// Country
    pub country: String,
    /// Facility type
    pub facility_type: String,
}

impl NewLocation {
    /// Placeholder record for a code that no lookup table recognizes
    pub fn placeholder(code: &str) -> Self {
        Self {
            airport_code: code.to_string(),
            name: format!("Unknown Airport - {}", code),
            city: "Unknown".to_string(),
            country: "US".to_string(),
            facility_type: "unknown".to_string(),
        }
    }
}

/// An aircraft that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAircraft {
    /// Unique tail number
    pub tail_number: String,
    /// Aircraft model
    pub model: String,
}
