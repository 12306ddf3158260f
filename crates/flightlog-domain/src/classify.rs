//! Static classification tables
//!
//! Metadata for new passengers, locations and aircraft is looked up here once,
//! at creation time, and never recomputed.

use crate::entity::{NewAircraft, NewLocation, PassengerType, RiskLevel};

/// Canonical aliases recognized in manifests (lowercase alias, canonical name)
pub const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("jeff epstein", "Jeffrey Epstein"),
    ("jeffrey epstein", "Jeffrey Epstein"),
    ("je", "Jeffrey Epstein"),
    ("g maxwell", "Ghislaine Maxwell"),
    ("g. maxwell", "Ghislaine Maxwell"),
    ("ghislaine maxwell", "Ghislaine Maxwell"),
    ("gm", "Ghislaine Maxwell"),
    ("bill clinton", "Bill Clinton"),
    ("william clinton", "Bill Clinton"),
    ("president clinton", "Bill Clinton"),
    ("wjc", "Bill Clinton"),
    ("donald trump", "Donald Trump"),
    ("d trump", "Donald Trump"),
    ("dt", "Donald Trump"),
    ("trump", "Donald Trump"),
    ("prince andrew", "Prince Andrew"),
    ("andrew windsor", "Prince Andrew"),
    ("duke of york", "Prince Andrew"),
    ("andrew", "Prince Andrew"),
    ("s kellen", "Sarah Kellen"),
    ("sarah kellen", "Sarah Kellen"),
    ("kellen", "Sarah Kellen"),
    ("n marcinkova", "Nadia Marcinkova"),
    ("nada marcinkova", "Nadia Marcinkova"),
    ("nadia marcinkova", "Nadia Marcinkova"),
    ("alan dershowitz", "Alan Dershowitz"),
    ("dershowitz", "Alan Dershowitz"),
    ("kevin spacey", "Kevin Spacey"),
    ("spacey", "Kevin Spacey"),
    ("chris tucker", "Chris Tucker"),
    ("tucker", "Chris Tucker"),
    ("glenn dubin", "Glenn Dubin"),
    ("eva dubin", "Eva Dubin"),
    ("celina dubin", "Celina Dubin"),
    ("sophie biddle", "Sophie Biddle"),
    ("a s", "A S"),
    ("as", "A S"),
];

const SUSPECTS: &[&str] = &["jeffrey epstein", "ghislaine maxwell"];
const VIPS: &[&str] = &["donald trump", "bill clinton", "prince andrew", "alan dershowitz"];
const STAFF: &[&str] = &["sarah kellen", "nadia marcinkova"];
const GUESTS: &[&str] = &["kevin spacey", "chris tucker", "naomi campbell"];

/// Known airports (code, name, city, country)
const AIRPORTS: &[(&str, &str, &str, &str)] = &[
    ("TEB", "Teterboro Airport", "Teterboro", "US"),
    ("PBI", "Palm Beach International Airport", "West Palm Beach", "US"),
    ("JFK", "John F. Kennedy International Airport", "New York", "US"),
    ("LGA", "LaGuardia Airport", "New York", "US"),
    ("CMH", "John Glenn Columbus International Airport", "Columbus", "US"),
    ("SAF", "Santa Fe Regional Airport", "Santa Fe", "US"),
    ("STT", "Cyril E. King Airport", "Charlotte Amalie", "US Virgin Islands"),
    ("TIST", "Cyril E. King Airport", "Charlotte Amalie", "US Virgin Islands"),
    ("TJSJ", "Luis Munoz Marin International Airport", "San Juan", "Puerto Rico"),
    ("LAX", "Los Angeles International Airport", "Los Angeles", "US"),
    ("BED", "Laurence G. Hanscom Field", "Bedford", "US"),
    ("LFPB", "Paris-Le Bourget Airport", "Paris", "France"),
    ("EGGW", "London Luton Airport", "Luton", "United Kingdom"),
];

/// Known aircraft (tail number, model)
const AIRCRAFT: &[(&str, &str)] = &[
    ("N908JE", "Boeing 727-31"),
    ("N909JE", "Gulfstream IV"),
];

/// Passenger metadata: type, risk level and verification status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassengerProfile {
    /// Classification
    pub passenger_type: PassengerType,
    /// Risk level
    pub risk_level: RiskLevel,
    /// Verified flag
    pub verified: bool,
}

impl Default for PassengerProfile {
    fn default() -> Self {
        Self {
            passenger_type: PassengerType::Regular,
            risk_level: RiskLevel::Unknown,
            verified: false,
        }
    }
}

/// Classify a canonical passenger name
///
/// Suspects must match exactly; the other tiers match when the listed
/// name appears anywhere in the canonical name.
pub fn classify_passenger(canonical_name: &str) -> PassengerProfile {
    let lower = canonical_name.to_lowercase();
    let contains_any = |names: &[&str]| names.iter().any(|n| lower.contains(n));

    let (passenger_type, risk_level) = if SUSPECTS.contains(&lower.as_str()) {
        (PassengerType::Suspect, RiskLevel::Critical)
    } else if contains_any(VIPS) {
        (PassengerType::Vip, RiskLevel::High)
    } else if contains_any(STAFF) {
        (PassengerType::Staff, RiskLevel::Medium)
    } else if contains_any(GUESTS) {
        (PassengerType::Guest, RiskLevel::Low)
    } else {
        return PassengerProfile::default();
    };

    PassengerProfile {
        passenger_type,
        risk_level,
        verified: true,
    }
}

/// Describe an airport code, falling back to a placeholder record
pub fn describe_location(code: &str) -> NewLocation {
    match AIRPORTS.iter().find(|(c, ..)| *c == code) {
        Some((code, name, city, country)) => NewLocation {
            airport_code: code.to_string(),
            name: name.to_string(),
            city: city.to_string(),
            country: country.to_string(),
            facility_type: "airport".to_string(),
        },
        None => NewLocation::placeholder(code),
    }
}

/// Describe an aircraft by tail number
pub fn describe_aircraft(tail_number: &str) -> NewAircraft {
    let model = AIRCRAFT
        .iter()
        .find(|(tail, _)| *tail == tail_number)
        .map(|(_, model)| *model)
        .unwrap_or("Unknown");

    NewAircraft {
        tail_number: tail_number.to_string(),
        model: model.to_string(),
    }
}
