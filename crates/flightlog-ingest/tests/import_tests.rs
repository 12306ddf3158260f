//! End-to-end import tests against SQLite

use flightlog_domain::traits::{EntityStore, ManifestReader};
use flightlog_domain::{FilterSpec, FlightId, Page, PassengerType};
use flightlog_ingest::{ErrorKind, ImportConfig, ImportPipeline, IngestError};
use flightlog_store::SqliteStore;
use std::io::Write;

const MANIFEST: &str = "\
Date,Flight_No,Departure_Code,Arrival_Code,Passengers
11/17/95,1044,TEB,PBI,\"JE, GM, Sarah Kellen\"
11/18/95,1045,PBI,TEB,\"Jeff Epstein, Kellen\"
1996-02-03,1046,TEB,CMH,\"jeffrey epstein, Jane Doe\"
";

fn import(store: &mut SqliteStore, data: &str, config: ImportConfig) -> flightlog_ingest::ImportStats {
    ImportPipeline::new(store, config)
        .run(data.as_bytes(), "test.csv")
        .unwrap()
}

#[test]
fn test_basic_import() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let stats = import(&mut store, MANIFEST, ImportConfig::default());

    assert_eq!(stats.rows_read, 3);
    assert_eq!(stats.flights_imported, 3);
    assert_eq!(stats.errors, 0);
    // Jeffrey Epstein, Ghislaine Maxwell, Sarah Kellen, Jane Doe
    assert_eq!(stats.passengers_created, 4);
    assert_eq!(stats.locations_created, 3);
    assert_eq!(stats.aircraft_created, 1);

    let overview = store.overview().unwrap();
    assert_eq!(overview.total_flights, 3);
    assert_eq!(overview.total_passengers, 4);
}

#[test]
fn test_alias_spellings_resolve_to_one_passenger() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    import(&mut store, MANIFEST, ImportConfig::default());

    let matches = store.find_passengers("epstein").unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].full_name, "Jeffrey Epstein");
    assert_eq!(matches[0].passenger_type, PassengerType::Suspect);

    let flights = store.flights_with_passengers(&[matches[0].id]).unwrap();
    assert_eq!(flights.len(), 3);
}

#[test]
fn test_raw_spelling_kept_for_audit() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    import(&mut store, MANIFEST, ImportConfig::default());

    let links = store.flight_links(FlightId::from_value(2)).unwrap();
    let raw: Vec<&str> = links.iter().map(|l| l.name_in_manifest.as_str()).collect();
    assert_eq!(raw, vec!["Jeff Epstein", "Kellen"]);
}

#[test]
fn test_bad_rows_are_skipped_and_counted() {
    let data = "\
Date,Flight_No,Departure_Code,Arrival_Code,Passengers
someday,1,TEB,PBI,JE
11/17/95,2,T-EB,PBI,JE
11/17/95,,TEB,PBI,JE
11/17/95,4,TEB,PBI,JE
";
    let mut store = SqliteStore::new(":memory:").unwrap();
    let stats = import(&mut store, data, ImportConfig::default());

    assert_eq!(stats.rows_read, 4);
    assert_eq!(stats.flights_imported, 1);
    assert_eq!(stats.errors, 3);
    assert_eq!(stats.errors_of(ErrorKind::InvalidDate), 1);
    assert_eq!(stats.errors_of(ErrorKind::Location), 1);
    assert_eq!(stats.errors_of(ErrorKind::MissingField), 1);
}

#[test]
fn test_missing_column_is_fatal() {
    let data = "Date,Flight_No,Departure_Code,Passengers\n11/17/95,1,TEB,JE\n";
    let mut store = SqliteStore::new(":memory:").unwrap();

    let err = ImportPipeline::new(&mut store, ImportConfig::default())
        .run(data.as_bytes(), "test.csv")
        .unwrap_err();

    match err {
        IngestError::MissingColumns(cols) => assert_eq!(cols, vec!["Arrival_Code".to_string()]),
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(store.overview().unwrap().total_flights, 0);
}

#[test]
fn test_semicolon_manifest() {
    let data = "\
Date;Flight_No;Departure_Code;Arrival_Code;Passengers
11/17/95;1044;TEB;PBI;JE, GM
17-11-1995;1045;PBI;TEB;GM
";
    let mut store = SqliteStore::new(":memory:").unwrap();
    let stats = import(&mut store, data, ImportConfig::default());

    assert_eq!(stats.flights_imported, 2);
    assert_eq!(stats.passengers_created, 2);
}

#[test]
fn test_duplicate_passenger_linked_once() {
    let data = "\
Date,Flight_No,Departure_Code,Arrival_Code,Passengers
11/17/95,1044,TEB,PBI,\"JE, Jeff Epstein, GM\"
";
    let mut store = SqliteStore::new(":memory:").unwrap();
    import(&mut store, data, ImportConfig::default());

    let page = store.search_flights(&FilterSpec::all(), Page::default()).unwrap();
    assert_eq!(page.flights[0].passenger_count, 2);
    assert_eq!(
        page.flights[0].passenger_names(),
        vec!["Jeffrey Epstein".to_string(), "Ghislaine Maxwell".to_string()]
    );
}

#[test]
fn test_reimport_reuses_entities() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    import(&mut store, MANIFEST, ImportConfig::default());

    let config = ImportConfig {
        batch_size: 1,
        ..Default::default()
    };
    let stats = import(&mut store, MANIFEST, config);

    assert_eq!(stats.flights_imported, 3);
    assert_eq!(stats.passengers_created, 0);
    assert_eq!(stats.locations_created, 0);
    assert_eq!(stats.aircraft_created, 0);
    assert!(!store.is_batch_open());
}

#[test]
fn test_persisted_aliases_are_honored() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    import(&mut store, MANIFEST, ImportConfig::default());
    store.add_alias("J. Doe", "Jane Doe").unwrap();

    let data = "\
Date,Flight_No,Departure_Code,Arrival_Code,Passengers
03/01/96,2000,CMH,TEB,J. Doe
";
    let stats = import(&mut store, data, ImportConfig::default());

    assert_eq!(stats.passengers_created, 0);
    assert_eq!(store.find_passengers("doe").unwrap().len(), 1);
}

#[test]
fn test_no_default_aircraft() {
    let config = ImportConfig {
        default_aircraft: None,
        ..Default::default()
    };
    let mut store = SqliteStore::new(":memory:").unwrap();
    let stats = import(&mut store, MANIFEST, config);

    assert_eq!(stats.aircraft_created, 0);
    assert!(store.load_aircraft_keys().unwrap().is_empty());
    let page = store.search_flights(&FilterSpec::all(), Page::default()).unwrap();
    assert!(page.flights.iter().all(|f| f.aircraft.is_none()));
}

#[test]
fn test_run_path_tags_source_with_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flight_flights_table.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(MANIFEST.as_bytes()).unwrap();
    drop(file);

    let mut store = SqliteStore::new(dir.path().join("flightlog.db")).unwrap();
    let stats = ImportPipeline::new(&mut store, ImportConfig::default())
        .run_path(&path)
        .unwrap();
    assert_eq!(stats.flights_imported, 3);

    let rows = store.export_flights(&FilterSpec::all()).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].aircraft.as_deref(), Some("N908JE"));
}

#[test]
fn test_invalid_config_rejected() {
    let config = ImportConfig {
        batch_size: 0,
        ..Default::default()
    };
    let mut store = SqliteStore::new(":memory:").unwrap();
    let err = ImportPipeline::new(&mut store, config)
        .run(MANIFEST.as_bytes(), "test.csv")
        .unwrap_err();
    assert!(matches!(err, IngestError::Config(_)));
}
