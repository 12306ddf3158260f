//! Query engine tests over an imported and derived store

use chrono::NaiveDate;
use flightlog_domain::{ConnectionType, FilterError, FlightFilters, Investigation};
use flightlog_graph::derive_all;
use flightlog_ingest::{ImportConfig, ImportPipeline};
use flightlog_query::{QueryEngine, QueryError};
use flightlog_store::SqliteStore;

const MANIFEST: &str = "\
Date,Flight_No,Departure_Code,Arrival_Code,Passengers
11/17/95,1044,TEB,PBI,\"JE, GM, Sarah Kellen\"
11/18/95,1045,PBI,TEB,\"Jeff Epstein, Kellen\"
12/02/95,1046,TEB,PBI,\"jeffrey epstein, Jane Doe\"
1996-02-03,1047,TEB,PBI,\"JE, Sarah Kellen, Bill Clinton\"
1996-02-04,1048,PBI,CMH,\"Bill Clinton, Chris Tucker\"
";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn imported() -> SqliteStore {
    let mut store = SqliteStore::new(":memory:").unwrap();
    ImportPipeline::new(&mut store, ImportConfig::default())
        .run(MANIFEST.as_bytes(), "manifest.csv")
        .unwrap();
    store
}

fn derived() -> SqliteStore {
    let mut store = imported();
    derive_all(&mut store).unwrap();
    store
}

#[test]
fn test_search_combines_filters() {
    let store = imported();
    let engine = QueryEngine::new(&store);

    let filters = FlightFilters {
        year: Some(1995),
        departure: Some("TEB".to_string()),
        ..Default::default()
    };
    let page = engine.search(&filters).unwrap();

    assert_eq!(page.total_count, 2);
    let numbers: Vec<&str> = page.flights.iter().map(|f| f.flight_number.as_str()).collect();
    assert_eq!(numbers, vec!["1046", "1044"]);
    assert!(page
        .flights
        .iter()
        .all(|f| f.departure_code == "TEB" && f.flight_date < date(1996, 1, 1)));
}

#[test]
fn test_search_without_filters_returns_everything() {
    let store = imported();
    let page = QueryEngine::new(&store).search(&FlightFilters::default()).unwrap();
    assert_eq!(page.total_count, 5);
    assert_eq!(page.flights[0].flight_number, "1048");
}

#[test]
fn test_search_by_passenger_keeps_full_manifest() {
    let store = imported();
    let filters = FlightFilters {
        passenger_name: Some("tucker".to_string()),
        ..Default::default()
    };
    let page = QueryEngine::new(&store).search(&filters).unwrap();

    assert_eq!(page.total_count, 1);
    assert_eq!(
        page.flights[0].passenger_names(),
        vec!["Bill Clinton".to_string(), "Chris Tucker".to_string()]
    );
}

#[test]
fn test_search_name_list_is_disjunctive() {
    let store = imported();
    let filters = FlightFilters {
        passengers: vec!["doe".to_string(), "tucker".to_string()],
        ..Default::default()
    };
    let page = QueryEngine::new(&store).search(&filters).unwrap();
    assert_eq!(page.total_count, 2);
}

#[test]
fn test_malformed_filters_are_errors() {
    let store = imported();
    let engine = QueryEngine::new(&store);

    let inverted = FlightFilters {
        date_from: Some(date(1996, 1, 1)),
        date_to: Some(date(1995, 1, 1)),
        ..Default::default()
    };
    assert!(matches!(
        engine.search(&inverted),
        Err(QueryError::Filter(FilterError::InvertedDateRange { .. }))
    ));

    let bad_month = FlightFilters {
        month: Some(13),
        ..Default::default()
    };
    assert!(matches!(
        engine.search(&bad_month),
        Err(QueryError::Filter(FilterError::InvalidMonth(13)))
    ));

    let too_many = FlightFilters {
        limit: Some(1001),
        ..Default::default()
    };
    assert!(engine.export(&too_many).is_err());
}

#[test]
fn test_investigate_unknown_passenger() {
    let store = imported();
    let result = QueryEngine::new(&store).investigate("Nonexistent Person").unwrap();

    assert!(result.is_no_data());
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["status"], "no_data");
    assert_eq!(json["passenger_name"], "Nonexistent Person");
}

#[test]
fn test_investigate_profile() {
    let store = imported();
    let Investigation::Found(profile) = QueryEngine::new(&store).investigate("EPSTEIN").unwrap() else {
        panic!("expected a profile");
    };

    assert_eq!(profile.matched_names, vec!["Jeffrey Epstein"]);
    assert_eq!(profile.total_flights, 4);
    assert_eq!(profile.unique_destinations, 2);
    assert_eq!(profile.most_common_departure.as_deref(), Some("TEB"));
    assert_eq!(profile.most_common_arrival.as_deref(), Some("PBI"));
    // Four flights over November 1995 to February 1996
    assert!((profile.flights_per_month - 1.0).abs() < f64::EPSILON);

    assert_eq!(profile.frequent_companions.len(), 1);
    let kellen = &profile.frequent_companions[0];
    assert_eq!(kellen.name, "Sarah Kellen");
    assert_eq!(kellen.shared_flights, 3);
    assert_eq!(kellen.flight_numbers, vec!["1044", "1045", "1047"]);
}

#[test]
fn test_blank_lookup_names_rejected() {
    let store = imported();
    let engine = QueryEngine::new(&store);
    assert!(matches!(engine.investigate("  "), Err(QueryError::InvalidInput(_))));
    assert!(matches!(engine.connections("epstein", ""), Err(QueryError::InvalidInput(_))));
}

#[test]
fn test_connections_read_stored_strength() {
    let store = derived();
    let report = QueryEngine::new(&store).connections("epstein", "kellen").unwrap();

    assert_eq!(report.shared_flights.len(), 3);
    assert_eq!(report.shared_flights[0].flight_number, "1044");
    assert_eq!(report.shared_flights[0].other_passengers, vec!["Ghislaine Maxwell"]);
    assert_eq!(report.shared_flights[2].other_passengers, vec!["Bill Clinton"]);
    assert_eq!(report.connection_strength, 6);
    assert_eq!(report.stored_shared_flights, 3);
    assert_eq!(report.connection_type, ConnectionType::CoTraveler);
    assert_eq!(report.first_interaction, Some(date(1995, 11, 17)));
    assert_eq!(report.last_interaction, Some(date(1996, 2, 3)));
}

#[test]
fn test_connections_are_symmetric() {
    let store = derived();
    let engine = QueryEngine::new(&store);
    assert_eq!(
        engine.connections("epstein", "kellen").unwrap(),
        engine.connections("kellen", "epstein").unwrap()
    );
    assert_eq!(
        engine.connections("clinton", "doe").unwrap(),
        engine.connections("doe", "clinton").unwrap()
    );
}

#[test]
fn test_connections_default_when_not_derived() {
    let store = imported();
    let report = QueryEngine::new(&store).connections("epstein", "maxwell").unwrap();

    assert_eq!(report.shared_flights.len(), 1);
    assert_eq!(report.connection_strength, 0);
    assert_eq!(report.connection_type, ConnectionType::Unknown);
    assert_eq!(report.first_interaction, None);
}

#[test]
fn test_connections_with_unknown_name() {
    let store = derived();
    let report = QueryEngine::new(&store).connections("epstein", "nobody").unwrap();
    assert!(report.shared_flights.is_empty());
    assert_eq!(report.connection_strength, 0);
}

#[test]
fn test_non_ascii_names_match_case_insensitively() {
    let manifest = "\
Date,Flight_No,Departure_Code,Arrival_Code,Passengers
03/01/97,2001,TEB,PBI,\"Émile Zola, JE\"
03/05/97,2002,PBI,TEB,\"Émile Zola, JE\"
";
    let mut store = SqliteStore::new(":memory:").unwrap();
    ImportPipeline::new(&mut store, ImportConfig::default())
        .run(manifest.as_bytes(), "manifest.csv")
        .unwrap();
    derive_all(&mut store).unwrap();
    let engine = QueryEngine::new(&store);

    let filters = FlightFilters {
        passenger_name: Some("émile".to_string()),
        ..Default::default()
    };
    assert_eq!(engine.search(&filters).unwrap().total_count, 2);

    let Investigation::Found(profile) = engine.investigate("émile").unwrap() else {
        panic!("expected a profile");
    };
    assert_eq!(profile.matched_names, vec!["Émile Zola"]);
    assert_eq!(profile.total_flights, 2);

    let report = engine.connections("émile", "epstein").unwrap();
    assert_eq!(report.shared_flights.len(), 2);
    assert_eq!(report.connection_strength, 4);
}

#[test]
fn test_statistics() {
    let store = derived();
    let engine = QueryEngine::new(&store);

    let overview = engine.overview().unwrap();
    assert_eq!(overview.total_flights, 5);
    assert_eq!(overview.total_passengers, 6);
    assert_eq!(overview.total_routes, 3);
    assert_eq!(overview.first_flight, Some(date(1995, 11, 17)));
    assert_eq!(overview.last_flight, Some(date(1996, 2, 4)));
    assert_eq!(overview.total_connections, 1);

    let top = engine.top_passengers(2).unwrap();
    assert_eq!(top[0].name, "Jeffrey Epstein");
    assert_eq!(top[0].flight_count, 4);
    assert_eq!(top[1].name, "Sarah Kellen");

    let routes = engine.top_routes(1).unwrap();
    assert_eq!((routes[0].departure_code.as_str(), routes[0].arrival_code.as_str()), ("TEB", "PBI"));
    assert_eq!(routes[0].flight_count, 3);
    assert_eq!(routes[0].aircraft, vec!["N908JE"]);

    let patterns = engine.patterns().unwrap();
    assert_eq!(patterns.len(), 1);
    assert_eq!(patterns[0].name, "TEB to PBI Route");

    assert!(engine.top_routes(0).is_err());
}

#[test]
fn test_export_ignores_pagination() {
    let store = imported();
    let filters = FlightFilters {
        departure: Some("TEB".to_string()),
        limit: Some(1),
        ..Default::default()
    };
    let rows = QueryEngine::new(&store).export(&filters).unwrap();

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].flight_number, "1047");
    assert_eq!(rows[0].passengers, "Jeffrey Epstein, Sarah Kellen, Bill Clinton");
    assert_eq!(rows[0].aircraft, "N908JE");
}
