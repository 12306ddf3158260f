//! Pairwise connection lookup

use flightlog_domain::{Connection, ConnectionReport, ConnectionType, FlightSummary, PassengerId, SharedFlight};
use std::cmp::Reverse;
use std::collections::HashSet;

/// Flights on which someone from `a` and a different someone from `b` both appear
///
/// Passengers forming such a pair are left out of `other_passengers`, so the
/// result does not depend on which side is which.
pub(crate) fn shared_flights(
    a: &HashSet<PassengerId>,
    b: &HashSet<PassengerId>,
    flights: &[FlightSummary],
) -> Vec<SharedFlight> {
    let mut shared: Vec<SharedFlight> = flights
        .iter()
        .filter_map(|flight| {
            let on_board: Vec<PassengerId> = flight.passengers.iter().map(|p| p.id).collect();
            let pairs_with = |p: PassengerId, own: &HashSet<PassengerId>, other: &HashSet<PassengerId>| {
                own.contains(&p) && on_board.iter().any(|q| *q != p && other.contains(q))
            };
            let in_pair: HashSet<PassengerId> = on_board
                .iter()
                .copied()
                .filter(|&p| pairs_with(p, a, b) || pairs_with(p, b, a))
                .collect();
            if in_pair.is_empty() {
                return None;
            }

            let mut other_passengers: Vec<String> = flight
                .passengers
                .iter()
                .filter(|p| !in_pair.contains(&p.id))
                .map(|p| p.name.clone())
                .collect();
            other_passengers.sort();

            Some(SharedFlight {
                flight_id: flight.id,
                flight_number: flight.flight_number.clone(),
                flight_date: flight.flight_date,
                departure_code: flight.departure_code.clone(),
                arrival_code: flight.arrival_code.clone(),
                other_passengers,
            })
        })
        .collect();

    shared.sort_by_key(|f| (f.flight_date, f.flight_id));
    shared
}

/// Combine shared flights with the strongest stored connection
pub(crate) fn report(shared_flights: Vec<SharedFlight>, stored: &[Connection]) -> ConnectionReport {
    let best = stored.iter().max_by_key(|c| {
        (
            c.strength,
            c.shared_flights_count,
            Reverse((c.passenger1, c.passenger2)),
        )
    });

    match best {
        Some(c) => ConnectionReport {
            shared_flights,
            connection_strength: c.strength,
            connection_type: c.connection_type.clone(),
            stored_shared_flights: c.shared_flights_count,
            first_interaction: c.first_interaction,
            last_interaction: c.last_interaction,
        },
        None => ConnectionReport {
            shared_flights,
            connection_strength: 0,
            connection_type: ConnectionType::Unknown,
            stored_shared_flights: 0,
            first_interaction: None,
            last_interaction: None,
        },
    }
}
