//! Flightlog Storage Layer
//!
//! Implements the domain store traits on SQLite.
//!
//! # Architecture
//!
//! - One SQLite file holds entities, flights, links and the derived tables
//! - Import batches are explicit transactions; each flight is written inside a
//!   savepoint so a failing row never leaves a partial flight behind
//! - Filter specs are translated to SQL by [`query_builder`]
//!
//! # Examples
//!
//! ```no_run
//! use flightlog_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for imports and queries
//! ```

#![warn(missing_docs)]

pub mod query_builder;
mod reader;

use flightlog_domain::entity::{NewAircraft, NewLocation, NewPassenger};
use flightlog_domain::flight::{ManifestEntry, NewFlight};
use flightlog_domain::report::{CoTravelRow, RouteRow};
use flightlog_domain::traits::{EntityStore, FlightStore, GraphStore};
use flightlog_domain::{
    AircraftId, Connection as PassengerConnection, ConnectionType, FlightId, FlightPassengerLink,
    FlightPattern, LocationId, NameNormalizer, Passenger, PassengerId, PassengerRole, PassengerType,
    RelationshipStatus, RiskLevel,
};
use rusqlite::functions::FunctionFlags;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Flight id list could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A derived-table rebuild was attempted while an import batch is open
    #[error("An import batch is still open on this store")]
    BatchInProgress,
}

/// A persisted alias spelling
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasEntry {
    /// Alias text as stored (lowercase)
    pub alias: String,
    /// Passenger the alias resolves to
    pub passenger_id: PassengerId,
    /// Canonical name of that passenger
    pub passenger_name: String,
}

/// SQLite-based implementation of the flightlog store traits
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own SqliteStore instance.
pub struct SqliteStore {
    conn: Connection,
    in_batch: bool,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use flightlog_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("flightlog.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        register_fold(&conn)?;
        let mut store = Self {
            conn,
            in_batch: false,
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Whether an import batch is open
    pub fn is_batch_open(&self) -> bool {
        self.in_batch
    }

    fn ensure_no_batch(&self) -> Result<(), StoreError> {
        if self.in_batch {
            Err(StoreError::BatchInProgress)
        } else {
            Ok(())
        }
    }

    /// Look up a passenger by canonical name (case-insensitive)
    pub fn passenger_by_name(&self, name: &str) -> Result<Option<Passenger>, StoreError> {
        let passenger = self
            .conn
            .query_row(
                &format!("SELECT {} FROM passengers WHERE fold(full_name) = fold(?1)", PASSENGER_COLUMNS),
                params![name],
                passenger_from_row,
            )
            .optional()?;
        Ok(passenger)
    }

    /// Persist an alias spelling for an existing passenger
    ///
    /// The alias is stored as the key the import resolver looks up: the
    /// normalized spelling, lowercased. Re-adding an alias points it at the
    /// new passenger.
    pub fn add_alias(&mut self, alias: &str, passenger_name: &str) -> Result<PassengerId, StoreError> {
        let alias = NameNormalizer::new()
            .normalize(alias)
            .map(|canonical| NameNormalizer::key(&canonical))
            .ok_or_else(|| StoreError::InvalidData("alias must not be blank".to_string()))?;

        let passenger = self
            .passenger_by_name(passenger_name)?
            .ok_or_else(|| StoreError::NotFound(format!("passenger '{}'", passenger_name)))?;

        self.conn.execute(
            "INSERT INTO passenger_aliases (alias, passenger_id) VALUES (?1, ?2)
             ON CONFLICT(alias) DO UPDATE SET passenger_id = excluded.passenger_id",
            params![alias, passenger.id.value()],
        )?;

        Ok(passenger.id)
    }

    /// Every persisted alias, sorted by alias
    pub fn list_aliases(&self) -> Result<Vec<AliasEntry>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT pa.alias, p.id, p.full_name
             FROM passenger_aliases pa JOIN passengers p ON p.id = pa.passenger_id
             ORDER BY pa.alias",
        )?;

        let aliases = stmt
            .query_map([], |row| {
                Ok(AliasEntry {
                    alias: row.get(0)?,
                    passenger_id: PassengerId::from_value(row.get(1)?),
                    passenger_name: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(aliases)
    }

    /// Passenger links of a flight in manifest order
    pub fn flight_links(&self, flight_id: FlightId) -> Result<Vec<FlightPassengerLink>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT flight_id, passenger_id, passenger_role, name_in_manifest
             FROM flight_passengers WHERE flight_id = ?1 ORDER BY position",
        )?;

        let links = stmt
            .query_map(params![flight_id.value()], |row| {
                let role: String = row.get(2)?;
                Ok(FlightPassengerLink {
                    flight_id: FlightId::from_value(row.get(0)?),
                    passenger_id: PassengerId::from_value(row.get(1)?),
                    role: PassengerRole::parse(&role)
                        .ok_or_else(|| invalid(2, format!("Unknown passenger role: {}", role)))?,
                    name_in_manifest: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(links)
    }

    /// Every stored connection, ordered by pair
    pub fn all_connections(&self) -> Result<Vec<PassengerConnection>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM passenger_connections ORDER BY passenger1_id, passenger2_id",
            CONNECTION_COLUMNS
        ))?;
        let connections = stmt
            .query_map([], connection_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(connections)
    }
}

impl EntityStore for SqliteStore {
    type Error = StoreError;

    fn load_passenger_keys(&self) -> Result<Vec<(String, PassengerId)>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT full_name, id FROM passengers
             UNION ALL
             SELECT alias, passenger_id FROM passenger_aliases",
        )?;
        let keys = stmt
            .query_map([], |row| Ok((row.get(0)?, PassengerId::from_value(row.get(1)?))))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }

    fn load_location_keys(&self) -> Result<Vec<(String, LocationId)>, Self::Error> {
        let mut stmt = self.conn.prepare("SELECT airport_code, id FROM locations")?;
        let keys = stmt
            .query_map([], |row| Ok((row.get(0)?, LocationId::from_value(row.get(1)?))))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }

    fn load_aircraft_keys(&self) -> Result<Vec<(String, AircraftId)>, Self::Error> {
        let mut stmt = self.conn.prepare("SELECT tail_number, id FROM aircraft")?;
        let keys = stmt
            .query_map([], |row| Ok((row.get(0)?, AircraftId::from_value(row.get(1)?))))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }

    fn insert_passenger(&mut self, passenger: &NewPassenger) -> Result<PassengerId, Self::Error> {
        self.conn.execute(
            "INSERT INTO passengers (full_name, first_name, last_name, passenger_type, risk_level, verified)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &passenger.full_name,
                &passenger.first_name,
                &passenger.last_name,
                passenger.passenger_type.as_str(),
                passenger.risk_level.as_str(),
                passenger.verified,
            ],
        )?;
        Ok(PassengerId::from_value(self.conn.last_insert_rowid()))
    }

    fn insert_location(&mut self, location: &NewLocation) -> Result<LocationId, Self::Error> {
        self.conn.execute(
            "INSERT INTO locations (airport_code, name, city, country, facility_type)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                &location.airport_code,
                &location.name,
                &location.city,
                &location.country,
                &location.facility_type,
            ],
        )?;
        Ok(LocationId::from_value(self.conn.last_insert_rowid()))
    }

    fn insert_aircraft(&mut self, aircraft: &NewAircraft) -> Result<AircraftId, Self::Error> {
        self.conn.execute(
            "INSERT INTO aircraft (tail_number, model) VALUES (?1, ?2)",
            params![&aircraft.tail_number, &aircraft.model],
        )?;
        Ok(AircraftId::from_value(self.conn.last_insert_rowid()))
    }
}

impl FlightStore for SqliteStore {
    fn begin_batch(&mut self) -> Result<(), Self::Error> {
        if !self.in_batch {
            self.conn.execute_batch("BEGIN")?;
            self.in_batch = true;
        }
        Ok(())
    }

    fn commit_batch(&mut self) -> Result<(), Self::Error> {
        if self.in_batch {
            self.conn.execute_batch("COMMIT")?;
            self.in_batch = false;
        }
        Ok(())
    }

    fn insert_flight(
        &mut self,
        flight: &NewFlight,
        entries: &[ManifestEntry],
    ) -> Result<FlightId, Self::Error> {
        // Dropping the savepoint without commit rolls the flight back
        let sp = self.conn.savepoint()?;

        sp.execute(
            "INSERT INTO flights (flight_number, aircraft_id, departure_location_id, arrival_location_id,
                                  flight_date, passenger_count, manifest_id, source_document, data_quality)
             VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?7, ?8)",
            params![
                &flight.flight_number,
                flight.aircraft_id.map(|id| id.value()),
                flight.departure_id.value(),
                flight.arrival_id.value(),
                flight.flight_date,
                &flight.manifest_id,
                &flight.source,
                &flight.data_quality,
            ],
        )?;
        let flight_id = sp.last_insert_rowid();

        let mut linked = 0usize;
        {
            let mut stmt = sp.prepare(
                "INSERT OR IGNORE INTO flight_passengers
                     (flight_id, passenger_id, passenger_role, name_in_manifest, position)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (position, entry) in entries.iter().enumerate() {
                linked += stmt.execute(params![
                    flight_id,
                    entry.passenger_id.value(),
                    entry.role.as_str(),
                    &entry.name_in_manifest,
                    position as i64,
                ])?;
            }
        }

        sp.execute(
            "UPDATE flights SET passenger_count = ?1 WHERE id = ?2",
            params![linked as i64, flight_id],
        )?;
        sp.commit()?;

        Ok(FlightId::from_value(flight_id))
    }
}

impl GraphStore for SqliteStore {
    type Error = StoreError;

    fn co_travel_rows(&self) -> Result<Vec<CoTravelRow>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT fp.flight_id, f.flight_date, fp.passenger_id
             FROM flight_passengers fp JOIN flights f ON f.id = fp.flight_id
             ORDER BY fp.flight_id, fp.position",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(CoTravelRow {
                    flight_id: FlightId::from_value(row.get(0)?),
                    flight_date: row.get(1)?,
                    passenger_id: PassengerId::from_value(row.get(2)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn upsert_connections(
        &mut self,
        connections: &[PassengerConnection],
    ) -> Result<usize, Self::Error> {
        self.ensure_no_batch()?;

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO passenger_connections
                     (passenger1_id, passenger2_id, connection_type, connection_strength,
                      shared_flights_count, first_documented_interaction,
                      last_documented_interaction, relationship_status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 ON CONFLICT(passenger1_id, passenger2_id) DO UPDATE SET
                 shared_flights_count = excluded.shared_flights_count,
                 connection_strength = excluded.connection_strength,
                 last_documented_interaction = excluded.last_documented_interaction",
            )?;
            for c in connections {
                stmt.execute(params![
                    c.passenger1.value(),
                    c.passenger2.value(),
                    c.connection_type.as_str(),
                    c.strength,
                    c.shared_flights_count,
                    c.first_interaction,
                    c.last_interaction,
                    c.relationship_status.as_str(),
                ])?;
            }
        }
        tx.commit()?;

        Ok(connections.len())
    }

    fn route_rows(&self) -> Result<Vec<RouteRow>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT f.id, f.flight_date, d.airport_code, a.airport_code
             FROM flights f
             JOIN locations d ON d.id = f.departure_location_id
             JOIN locations a ON a.id = f.arrival_location_id
             ORDER BY f.flight_date, f.id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(RouteRow {
                    flight_id: FlightId::from_value(row.get(0)?),
                    flight_date: row.get(1)?,
                    departure_code: row.get(2)?,
                    arrival_code: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn replace_patterns(&mut self, patterns: &[FlightPattern]) -> Result<usize, Self::Error> {
        self.ensure_no_batch()?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM flight_patterns WHERE pattern_type = ?1",
            params![flightlog_domain::pattern::FREQUENT_ROUTE],
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO flight_patterns
                     (pattern_name, pattern_type, departure_code, arrival_code, description,
                      flight_ids, frequency, date_range_start, date_range_end, risk_assessment)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for p in patterns {
                let flight_ids = serde_json::to_string(&p.flight_ids)?;
                stmt.execute(params![
                    &p.name,
                    &p.pattern_type,
                    &p.departure_code,
                    &p.arrival_code,
                    &p.description,
                    flight_ids,
                    p.frequency as i64,
                    p.date_start,
                    p.date_end,
                    p.risk.as_str(),
                ])?;
            }
        }
        tx.commit()?;

        Ok(patterns.len())
    }
}

/// Register `fold(text)`, the case folding used by every name comparison
///
/// SQLite's built-in `lower()` only folds ASCII; `fold` applies Unicode
/// lowercasing, matching the keys the import resolver builds.
fn register_fold(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "fold",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|s| s.to_lowercase())),
    )
}

pub(crate) const PASSENGER_COLUMNS: &str =
    "id, full_name, first_name, last_name, passenger_type, risk_level, verified";

pub(crate) const CONNECTION_COLUMNS: &str =
    "passenger1_id, passenger2_id, connection_type, connection_strength, shared_flights_count,
     first_documented_interaction, last_documented_interaction, relationship_status";

/// Wrap a malformed column value as a conversion error
pub(crate) fn invalid(column: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        column,
        rusqlite::types::Type::Text,
        Box::new(StoreError::InvalidData(message)),
    )
}

pub(crate) fn passenger_from_row(row: &Row<'_>) -> rusqlite::Result<Passenger> {
    let type_str: String = row.get(4)?;
    let risk_str: String = row.get(5)?;

    Ok(Passenger {
        id: PassengerId::from_value(row.get(0)?),
        full_name: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        passenger_type: PassengerType::parse(&type_str)
            .ok_or_else(|| invalid(4, format!("Unknown passenger type: {}", type_str)))?,
        risk_level: RiskLevel::parse(&risk_str)
            .ok_or_else(|| invalid(5, format!("Unknown risk level: {}", risk_str)))?,
        verified: row.get(6)?,
    })
}

pub(crate) fn connection_from_row(row: &Row<'_>) -> rusqlite::Result<PassengerConnection> {
    let connection_type: String = row.get(2)?;
    let status: String = row.get(7)?;

    Ok(PassengerConnection {
        passenger1: PassengerId::from_value(row.get(0)?),
        passenger2: PassengerId::from_value(row.get(1)?),
        connection_type: ConnectionType::parse(&connection_type),
        strength: row.get(3)?,
        shared_flights_count: row.get(4)?,
        first_interaction: row.get(5)?,
        last_interaction: row.get(6)?,
        relationship_status: RelationshipStatus::parse(&status),
    })
}
