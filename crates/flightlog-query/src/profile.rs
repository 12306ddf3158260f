//! Travel profile aggregation for passenger investigations

use chrono::{Datelike, NaiveDate};
use flightlog_domain::connection::MIN_SHARED_FLIGHTS;
use flightlog_domain::{
    Companion, FlightSummary, Investigation, Passenger, PassengerId, PassengerInvestigation,
};
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Most companions reported per investigation
pub const MAX_COMPANIONS: usize = 20;

/// Build an investigation from the matched passengers and their flights
///
/// `flights` must be distinct and oldest first.
pub(crate) fn investigate(query: &str, matched: &[Passenger], flights: &[FlightSummary]) -> Investigation {
    let (Some(first), Some(last)) = (flights.first(), flights.last()) else {
        return Investigation::NoData {
            passenger_name: query.to_string(),
        };
    };

    let matched_ids: HashSet<PassengerId> = matched.iter().map(|p| p.id).collect();
    let destinations: HashSet<&str> = flights.iter().map(|f| f.arrival_code.as_str()).collect();

    Investigation::Found(PassengerInvestigation {
        query: query.to_string(),
        matched_names: matched.iter().map(|p| p.full_name.clone()).collect(),
        total_flights: flights.len(),
        unique_destinations: destinations.len(),
        most_common_departure: most_common(flights.iter().map(|f| f.departure_code.as_str())),
        most_common_arrival: most_common(flights.iter().map(|f| f.arrival_code.as_str())),
        flights_per_month: flights.len() as f64 / months_spanned(first.flight_date, last.flight_date) as f64,
        first_flight: Some(first.flight_date),
        last_flight: Some(last.flight_date),
        frequent_companions: companions(&matched_ids, flights),
    })
}

/// Calendar months touched by the range, counting both ends
pub(crate) fn months_spanned(first: NaiveDate, last: NaiveDate) -> u32 {
    let index = |d: NaiveDate| d.year() * 12 + d.month0() as i32;
    (index(last) - index(first)).max(0) as u32 + 1
}

/// Most frequent value; ties go to the lowest value
pub(crate) fn most_common<'a, I>(values: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by_key(|(value, count)| (*count, Reverse(*value)))
        .map(|(value, _)| value.to_string())
}

/// Everyone who flew alongside a matched passenger other than themselves
fn companions(matched: &HashSet<PassengerId>, flights: &[FlightSummary]) -> Vec<Companion> {
    let mut by_id: HashMap<PassengerId, Companion> = HashMap::new();

    for flight in flights {
        let aboard: Vec<PassengerId> = flight
            .passengers
            .iter()
            .map(|p| p.id)
            .filter(|id| matched.contains(id))
            .collect();

        for p in flight
            .passengers
            .iter()
            .filter(|p| aboard.iter().any(|id| *id != p.id))
        {
            let entry = by_id.entry(p.id).or_insert_with(|| Companion {
                passenger_id: p.id,
                name: p.name.clone(),
                shared_flights: 0,
                flight_numbers: Vec::new(),
                first_shared: flight.flight_date,
                last_shared: flight.flight_date,
            });
            entry.shared_flights += 1;
            entry.flight_numbers.push(flight.flight_number.clone());
            entry.first_shared = entry.first_shared.min(flight.flight_date);
            entry.last_shared = entry.last_shared.max(flight.flight_date);
        }
    }

    let mut ranked: Vec<Companion> = by_id
        .into_values()
        .filter(|c| c.shared_flights >= MIN_SHARED_FLIGHTS)
        .collect();
    ranked.sort_by(|a, b| {
        b.shared_flights
            .cmp(&a.shared_flights)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.passenger_id.cmp(&b.passenger_id))
    });
    ranked.truncate(MAX_COMPANIONS);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use flightlog_domain::{FlightId, ManifestPassenger, PassengerType, RiskLevel};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn person(id: i64, name: &str) -> Passenger {
        Passenger {
            id: PassengerId::from_value(id),
            full_name: name.to_string(),
            first_name: name.split_whitespace().next().unwrap_or(name).to_string(),
            last_name: None,
            passenger_type: PassengerType::Regular,
            risk_level: RiskLevel::Unknown,
            verified: false,
        }
    }

    fn flight(id: i64, on: NaiveDate, dep: &str, arr: &str, people: &[&Passenger]) -> FlightSummary {
        FlightSummary {
            id: FlightId::from_value(id),
            flight_number: format!("{}", 1000 + id),
            flight_date: on,
            departure_code: dep.to_string(),
            arrival_code: arr.to_string(),
            aircraft: None,
            passenger_count: people.len() as u32,
            passengers: people
                .iter()
                .map(|p| ManifestPassenger {
                    id: p.id,
                    name: p.full_name.clone(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_months_spanned() {
        assert_eq!(months_spanned(date(1995, 11, 17), date(1995, 11, 30)), 1);
        assert_eq!(months_spanned(date(1995, 11, 30), date(1995, 12, 1)), 2);
        assert_eq!(months_spanned(date(1995, 11, 1), date(1996, 2, 1)), 4);
    }

    #[test]
    fn test_most_common_tie_goes_to_lowest_code() {
        assert_eq!(most_common(["PBI", "TEB", "TEB", "PBI"]).as_deref(), Some("PBI"));
        assert_eq!(most_common(["TEB", "PBI", "TEB"]).as_deref(), Some("TEB"));
        assert_eq!(most_common(std::iter::empty()), None);
    }

    #[test]
    fn test_no_flights_is_no_data() {
        let je = person(1, "Jeffrey Epstein");
        let result = investigate("epstein", &[je], &[]);
        assert_eq!(
            result,
            Investigation::NoData {
                passenger_name: "epstein".to_string()
            }
        );
    }

    #[test]
    fn test_profile_numbers() {
        let je = person(1, "Jeffrey Epstein");
        let sk = person(2, "Sarah Kellen");
        let gm = person(3, "Ghislaine Maxwell");
        let flights = vec![
            flight(1, date(1995, 11, 17), "TEB", "PBI", &[&je, &sk]),
            flight(2, date(1995, 12, 2), "PBI", "TEB", &[&je, &sk, &gm]),
            flight(3, date(1996, 1, 9), "TEB", "PBI", &[&je, &gm]),
            flight(4, date(1996, 2, 1), "TEB", "CMH", &[&je, &sk]),
        ];

        let Investigation::Found(profile) = investigate("epstein", &[je], &flights) else {
            panic!("expected a profile");
        };

        assert_eq!(profile.total_flights, 4);
        assert_eq!(profile.unique_destinations, 3);
        assert_eq!(profile.most_common_departure.as_deref(), Some("TEB"));
        assert_eq!(profile.most_common_arrival.as_deref(), Some("PBI"));
        assert!((profile.flights_per_month - 1.0).abs() < f64::EPSILON);
        assert_eq!(profile.first_flight, Some(date(1995, 11, 17)));

        let names: Vec<&str> = profile.frequent_companions.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Sarah Kellen", "Ghislaine Maxwell"]);

        let kellen = &profile.frequent_companions[0];
        assert_eq!(kellen.shared_flights, 3);
        assert_eq!(kellen.flight_numbers, vec!["1001", "1002", "1004"]);
        assert_eq!(kellen.first_shared, date(1995, 11, 17));
        assert_eq!(kellen.last_shared, date(1996, 2, 1));
    }

    #[test]
    fn test_single_shared_flight_is_not_a_companion() {
        let je = person(1, "Jeffrey Epstein");
        let gm = person(3, "Ghislaine Maxwell");
        let flights = vec![flight(1, date(1995, 11, 17), "TEB", "PBI", &[&je, &gm])];

        let Investigation::Found(profile) = investigate("je", &[je], &flights) else {
            panic!("expected a profile");
        };
        assert!(profile.frequent_companions.is_empty());
    }

    #[test]
    fn test_similarly_named_co_travellers_are_companions() {
        let a = person(1, "John Doe");
        let b = person(2, "Jane Doe");
        let c = person(3, "Sarah Kellen");
        let flights = vec![
            flight(1, date(1995, 1, 1), "TEB", "PBI", &[&a, &b, &c]),
            flight(2, date(1995, 1, 2), "PBI", "TEB", &[&a, &b, &c]),
            flight(3, date(1995, 1, 3), "TEB", "PBI", &[&a]),
        ];

        let Investigation::Found(profile) = investigate("doe", &[a, b], &flights) else {
            panic!("expected a profile");
        };
        assert_eq!(profile.matched_names, vec!["John Doe", "Jane Doe"]);

        let names: Vec<&str> = profile.frequent_companions.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Jane Doe", "John Doe", "Sarah Kellen"]);
        assert!(profile.frequent_companions.iter().all(|c| c.shared_flights == 2));
    }

    #[test]
    fn test_passenger_is_never_their_own_companion() {
        let a = person(1, "John Doe");
        let flights = vec![
            flight(1, date(1995, 1, 1), "TEB", "PBI", &[&a]),
            flight(2, date(1995, 1, 2), "PBI", "TEB", &[&a]),
        ];

        let Investigation::Found(profile) = investigate("doe", &[a], &flights) else {
            panic!("expected a profile");
        };
        assert!(profile.frequent_companions.is_empty());
    }

    #[test]
    fn test_companion_cap() {
        let je = person(1, "Jeffrey Epstein");
        let others: Vec<Passenger> = (0..25).map(|i| person(100 + i, &format!("Guest {:02}", i))).collect();
        let mut manifest: Vec<&Passenger> = vec![&je];
        manifest.extend(others.iter());

        let flights = vec![
            flight(1, date(1995, 1, 1), "TEB", "PBI", &manifest),
            flight(2, date(1995, 1, 2), "PBI", "TEB", &manifest),
        ];
        let Investigation::Found(profile) = investigate("je", &[je.clone()], &flights) else {
            panic!("expected a profile");
        };

        assert_eq!(profile.frequent_companions.len(), MAX_COMPANIONS);
        assert_eq!(profile.frequent_companions[0].name, "Guest 00");
        assert_eq!(profile.frequent_companions[19].name, "Guest 19");
    }
}
