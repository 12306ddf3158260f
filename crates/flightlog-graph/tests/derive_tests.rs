//! Derivation passes against SQLite

use chrono::NaiveDate;
use flightlog_domain::entity::{NewLocation, NewPassenger};
use flightlog_domain::flight::{ManifestEntry, NewFlight};
use flightlog_domain::traits::{EntityStore, FlightStore, ManifestReader};
use flightlog_domain::{
    ConnectionType, LocationId, PassengerId, PassengerRole, PassengerType, RelationshipStatus,
    RiskLevel, RiskTag,
};
use flightlog_graph::{derive_all, ConnectionGraphBuilder, DeriveReport, GraphError, PatternDetector};
use flightlog_store::SqliteStore;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn passenger(store: &mut SqliteStore, name: &str) -> PassengerId {
    store
        .insert_passenger(&NewPassenger::from_name(
            name,
            PassengerType::Regular,
            RiskLevel::Unknown,
            false,
        ))
        .unwrap()
}

fn location(store: &mut SqliteStore, code: &str) -> LocationId {
    store.insert_location(&NewLocation::placeholder(code)).unwrap()
}

fn flight(
    store: &mut SqliteStore,
    number: &str,
    on: NaiveDate,
    route: (LocationId, LocationId),
    passengers: &[PassengerId],
) {
    let entries: Vec<ManifestEntry> = passengers
        .iter()
        .map(|id| ManifestEntry {
            passenger_id: *id,
            role: PassengerRole::Passenger,
            name_in_manifest: format!("passenger {}", id),
        })
        .collect();

    store
        .insert_flight(
            &NewFlight {
                flight_number: number.to_string(),
                aircraft_id: None,
                departure_id: route.0,
                arrival_id: route.1,
                flight_date: on,
                manifest_id: NewFlight::manifest_reference(number, on),
                source: "test".to_string(),
                data_quality: "standard".to_string(),
            },
            &entries,
        )
        .unwrap();
}

struct Fixture {
    store: SqliteStore,
    je: PassengerId,
    sk: PassengerId,
    gm: PassengerId,
    teb: LocationId,
    pbi: LocationId,
}

/// Epstein and Kellen share two flights; Maxwell shares one with each
fn seeded() -> Fixture {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let je = passenger(&mut store, "Jeffrey Epstein");
    let sk = passenger(&mut store, "Sarah Kellen");
    let gm = passenger(&mut store, "Ghislaine Maxwell");
    let teb = location(&mut store, "TEB");
    let pbi = location(&mut store, "PBI");

    flight(&mut store, "1044", date(1995, 11, 17), (teb, pbi), &[je, sk]);
    flight(&mut store, "1045", date(1996, 2, 3), (teb, pbi), &[sk, je]);
    flight(&mut store, "1046", date(1996, 2, 4), (teb, pbi), &[je, sk, gm]);

    Fixture { store, je, sk, gm, teb, pbi }
}

#[test]
fn test_connections_from_shared_flights() {
    let mut f = seeded();
    derive_all(&mut f.store).unwrap();

    let connections = f.store.all_connections().unwrap();
    assert_eq!(connections.len(), 1);

    let c = &connections[0];
    assert_eq!((c.passenger1, c.passenger2), (f.je, f.sk));
    assert_eq!(c.shared_flights_count, 3);
    assert_eq!(c.strength, 6);
    assert_eq!(c.first_interaction, Some(date(1995, 11, 17)));
    assert_eq!(c.last_interaction, Some(date(1996, 2, 4)));
    assert_eq!(c.connection_type, ConnectionType::CoTraveler);
    assert_eq!(c.relationship_status, RelationshipStatus::Unknown);
    assert!(c.passenger1 != f.gm && c.passenger2 != f.gm);
}

#[test]
fn test_two_shared_flights_give_strength_four() {
    let mut f = seeded();
    flight(&mut f.store, "2000", date(1997, 1, 1), (f.pbi, f.teb), &[f.gm, f.sk]);
    ConnectionGraphBuilder::new()
        .run(&mut f.store, &mut DeriveReport::new())
        .unwrap();

    let between = f.store.connections_between(&[f.sk], &[f.gm]).unwrap();
    assert_eq!(between.len(), 1);
    assert_eq!(between[0].shared_flights_count, 2);
    assert_eq!(between[0].strength, 4);
}

#[test]
fn test_derive_is_idempotent() {
    let mut f = seeded();

    let first = derive_all(&mut f.store).unwrap();
    let connections = f.store.all_connections().unwrap();
    let patterns = f.store.patterns().unwrap();

    let second = derive_all(&mut f.store).unwrap();
    assert_eq!(f.store.all_connections().unwrap(), connections);
    assert_eq!(f.store.patterns().unwrap(), patterns);
    assert_eq!(first.connections_written, second.connections_written);
    assert_eq!(first.patterns_written, second.patterns_written);
}

#[test]
fn test_rederive_updates_counts_and_keeps_first_interaction() {
    let mut f = seeded();
    derive_all(&mut f.store).unwrap();

    flight(&mut f.store, "0999", date(1994, 6, 1), (f.pbi, f.teb), &[f.je, f.sk]);
    flight(&mut f.store, "1100", date(1998, 8, 8), (f.pbi, f.teb), &[f.je, f.sk]);
    derive_all(&mut f.store).unwrap();

    let c = &f.store.all_connections().unwrap()[0];
    assert_eq!(c.shared_flights_count, 5);
    assert_eq!(c.strength, 10);
    assert_eq!(c.last_interaction, Some(date(1998, 8, 8)));
    // Set only when the pair was first recorded
    assert_eq!(c.first_interaction, Some(date(1995, 11, 17)));
}

#[test]
fn test_route_patterns() {
    let mut f = seeded();
    let report = derive_all(&mut f.store).unwrap();

    assert_eq!(report.flights_scanned, 3);
    assert_eq!(report.routes_seen, 1);
    assert_eq!(report.patterns_written, 1);

    let patterns = f.store.patterns().unwrap();
    assert_eq!(patterns.len(), 1);
    assert_eq!(patterns[0].name, "TEB to PBI Route");
    assert_eq!(patterns[0].frequency, 3);
    assert_eq!(patterns[0].risk, RiskTag::Low);
    assert_eq!(patterns[0].date_start, date(1995, 11, 17));
    assert_eq!(patterns[0].date_end, date(1996, 2, 4));
}

#[test]
fn test_patterns_replaced_on_rerun() {
    let mut f = seeded();
    derive_all(&mut f.store).unwrap();

    for day in 1..=3 {
        flight(&mut f.store, "3000", date(1999, 3, day), (f.pbi, f.teb), &[f.gm]);
    }
    let written = PatternDetector::new()
        .run(&mut f.store, &mut DeriveReport::new())
        .unwrap();

    assert_eq!(written, 2);
    assert_eq!(f.store.patterns().unwrap().len(), 2);
}

#[test]
fn test_refuses_while_batch_open() {
    let mut f = seeded();
    f.store.begin_batch().unwrap();

    let err = derive_all(&mut f.store).unwrap_err();
    assert!(matches!(err, GraphError::Store(_)));

    f.store.commit_batch().unwrap();
    assert!(derive_all(&mut f.store).is_ok());
    assert_eq!(f.store.all_connections().unwrap().len(), 1);
}
