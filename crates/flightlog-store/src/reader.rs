//! Read-side queries
//!
//! Flight rows are read first; passenger lists are attached afterwards in
//! chunked `IN` lookups to stay below SQLite's bound-parameter limit.

use chrono::NaiveDate;
use crate::query_builder::{self, placeholders, FLIGHT_COLUMNS, FLIGHT_FROM};
use crate::{connection_from_row, invalid, passenger_from_row, SqliteStore, StoreError};
use crate::{CONNECTION_COLUMNS, PASSENGER_COLUMNS};
use flightlog_domain::traits::ManifestReader;
use flightlog_domain::{
    Connection as PassengerConnection, FilterSpec, FlightId, FlightPattern, FlightSummary,
    ManifestPassenger, OverviewStats, Page, Passenger, PassengerFlightCount, PassengerId,
    PassengerType, RiskTag, RouteFrequency, SearchPage,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Row};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Ids bound per `IN (...)` lookup
const CHUNK: usize = 500;

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<FlightSummary> {
    Ok(FlightSummary {
        id: FlightId::from_value(row.get(0)?),
        flight_number: row.get(1)?,
        flight_date: row.get(2)?,
        departure_code: row.get(3)?,
        arrival_code: row.get(4)?,
        aircraft: row.get(5)?,
        passenger_count: row.get(6)?,
        passengers: Vec::new(),
    })
}

impl SqliteStore {
    fn query_summaries(
        &self,
        sql: &str,
        params: Vec<Value>,
    ) -> Result<Vec<FlightSummary>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut flights = stmt
            .query_map(params_from_iter(params), summary_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        self.attach_passengers(&mut flights)?;
        Ok(flights)
    }

    fn attach_passengers(&self, flights: &mut [FlightSummary]) -> Result<(), StoreError> {
        let ids: Vec<i64> = flights.iter().map(|f| f.id.value()).collect();
        let mut by_flight: HashMap<i64, Vec<ManifestPassenger>> = HashMap::new();

        for chunk in ids.chunks(CHUNK) {
            let sql = format!(
                "SELECT fp.flight_id, p.id, p.full_name
                 FROM flight_passengers fp JOIN passengers p ON p.id = fp.passenger_id
                 WHERE fp.flight_id IN ({})
                 ORDER BY fp.flight_id, fp.position",
                placeholders(chunk.len())
            );
            let mut stmt = self.conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(chunk.iter()), |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    ManifestPassenger {
                        id: PassengerId::from_value(row.get(1)?),
                        name: row.get(2)?,
                    },
                ))
            })?;
            for row in rows {
                let (flight_id, passenger) = row?;
                by_flight.entry(flight_id).or_default().push(passenger);
            }
        }

        for flight in flights.iter_mut() {
            flight.passengers = by_flight.remove(&flight.id.value()).unwrap_or_default();
        }
        Ok(())
    }
}

impl ManifestReader for SqliteStore {
    type Error = StoreError;

    fn search_flights(&self, spec: &FilterSpec, page: Page) -> Result<SearchPage, Self::Error> {
        let (count_sql, count_params) = query_builder::count_query(spec);
        let total_count: i64 = self
            .conn
            .query_row(&count_sql, params_from_iter(count_params), |row| row.get(0))?;

        let (sql, params) = query_builder::page_query(spec, page)?;
        let flights = self.query_summaries(&sql, params)?;

        Ok(SearchPage {
            flights,
            total_count: total_count as u64,
            page,
        })
    }

    fn export_flights(&self, spec: &FilterSpec) -> Result<Vec<FlightSummary>, Self::Error> {
        let (sql, params) = query_builder::all_query(spec);
        self.query_summaries(&sql, params)
    }

    fn find_passengers(&self, name_contains: &str) -> Result<Vec<Passenger>, Self::Error> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM passengers WHERE instr(fold(full_name), fold(?1)) > 0 ORDER BY full_name",
            PASSENGER_COLUMNS
        ))?;
        let passengers = stmt
            .query_map(params![name_contains], passenger_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(passengers)
    }

    fn flights_with_passengers(
        &self,
        ids: &[PassengerId],
    ) -> Result<Vec<FlightSummary>, Self::Error> {
        let raw: Vec<i64> = ids.iter().map(|id| id.value()).collect();
        let mut flight_ids = BTreeSet::new();

        for chunk in raw.chunks(CHUNK) {
            let sql = format!(
                "SELECT DISTINCT flight_id FROM flight_passengers WHERE passenger_id IN ({})",
                placeholders(chunk.len())
            );
            let mut stmt = self.conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(chunk.iter()), |row| row.get::<_, i64>(0))?;
            for id in rows {
                flight_ids.insert(id?);
            }
        }

        let flight_ids: Vec<i64> = flight_ids.into_iter().collect();
        let mut flights = Vec::with_capacity(flight_ids.len());
        for chunk in flight_ids.chunks(CHUNK) {
            let sql = format!(
                "SELECT {} FROM {} WHERE f.id IN ({})",
                FLIGHT_COLUMNS,
                FLIGHT_FROM,
                placeholders(chunk.len())
            );
            let mut stmt = self.conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_from_iter(chunk.iter()), summary_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            flights.extend(rows);
        }

        flights.sort_by(|a, b| (a.flight_date, a.id).cmp(&(b.flight_date, b.id)));
        self.attach_passengers(&mut flights)?;
        Ok(flights)
    }

    fn connections_between(
        &self,
        a: &[PassengerId],
        b: &[PassengerId],
    ) -> Result<Vec<PassengerConnection>, Self::Error> {
        let side_a: HashSet<PassengerId> = a.iter().copied().collect();
        let side_b: HashSet<PassengerId> = b.iter().copied().collect();
        let raw: Vec<i64> = side_a.iter().map(|id| id.value()).collect();

        let mut found = BTreeMap::new();
        for chunk in raw.chunks(CHUNK) {
            let list = placeholders(chunk.len());
            let sql = format!(
                "SELECT {} FROM passenger_connections
                 WHERE passenger1_id IN ({}) OR passenger2_id IN ({})",
                CONNECTION_COLUMNS, list, list
            );
            let mut stmt = self.conn.prepare(&sql)?;
            let params = chunk.iter().chain(chunk.iter());
            let rows = stmt.query_map(params_from_iter(params), connection_from_row)?;
            for row in rows {
                let c = row?;
                let joins = (side_a.contains(&c.passenger1) && side_b.contains(&c.passenger2))
                    || (side_a.contains(&c.passenger2) && side_b.contains(&c.passenger1));
                if joins {
                    found.insert((c.passenger1, c.passenger2), c);
                }
            }
        }

        Ok(found.into_values().collect())
    }

    fn overview(&self) -> Result<OverviewStats, Self::Error> {
        let count = |sql: &str| -> Result<u64, StoreError> {
            let n: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
            Ok(n as u64)
        };

        let (first_flight, last_flight): (Option<NaiveDate>, Option<NaiveDate>) = self.conn.query_row(
            "SELECT MIN(flight_date), MAX(flight_date) FROM flights",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(OverviewStats {
            total_flights: count("SELECT COUNT(*) FROM flights")?,
            total_passengers: count("SELECT COUNT(DISTINCT passenger_id) FROM flight_passengers")?,
            total_routes: count(
                "SELECT COUNT(*) FROM (SELECT DISTINCT departure_location_id, arrival_location_id FROM flights)",
            )?,
            first_flight,
            last_flight,
            total_connections: count("SELECT COUNT(*) FROM passenger_connections")?,
        })
    }

    fn top_passengers(&self, limit: usize) -> Result<Vec<PassengerFlightCount>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT p.id, p.full_name, p.passenger_type, COUNT(fp.flight_id) AS flights
             FROM passengers p JOIN flight_passengers fp ON fp.passenger_id = p.id
             GROUP BY p.id
             ORDER BY flights DESC, p.full_name ASC
             LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![query_builder::sql_integer(limit, "limit")?], |row| {
                let type_str: String = row.get(2)?;
                Ok(PassengerFlightCount {
                    passenger_id: PassengerId::from_value(row.get(0)?),
                    name: row.get(1)?,
                    passenger_type: PassengerType::parse(&type_str)
                        .ok_or_else(|| invalid(2, format!("Unknown passenger type: {}", type_str)))?,
                    flight_count: row.get::<_, i64>(3)? as u64,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn top_routes(&self, limit: usize) -> Result<Vec<RouteFrequency>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT d.airport_code, a.airport_code, COUNT(*) AS flights,
                    MIN(f.flight_date), MAX(f.flight_date), GROUP_CONCAT(DISTINCT ac.tail_number)
             FROM flights f
             JOIN locations d ON d.id = f.departure_location_id
             JOIN locations a ON a.id = f.arrival_location_id
             LEFT JOIN aircraft ac ON ac.id = f.aircraft_id
             GROUP BY f.departure_location_id, f.arrival_location_id
             ORDER BY flights DESC, d.airport_code, a.airport_code
             LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![query_builder::sql_integer(limit, "limit")?], |row| {
                let tails: Option<String> = row.get(5)?;
                let mut aircraft: Vec<String> = tails
                    .map(|t| t.split(',').map(str::to_string).collect())
                    .unwrap_or_default();
                aircraft.sort();

                Ok(RouteFrequency {
                    departure_code: row.get(0)?,
                    arrival_code: row.get(1)?,
                    flight_count: row.get::<_, i64>(2)? as u64,
                    first_flight: row.get(3)?,
                    last_flight: row.get(4)?,
                    aircraft,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn patterns(&self) -> Result<Vec<FlightPattern>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT pattern_name, pattern_type, departure_code, arrival_code, description,
                    flight_ids, frequency, date_range_start, date_range_end, risk_assessment
             FROM flight_patterns
             ORDER BY frequency DESC, pattern_name",
        )?;
        let rows = stmt
            .query_map([], |row| {
                let ids_json: String = row.get(5)?;
                let flight_ids: Vec<FlightId> = serde_json::from_str(&ids_json)
                    .map_err(|e| invalid(5, format!("Malformed flight id list: {}", e)))?;
                let risk: String = row.get(9)?;

                Ok(FlightPattern {
                    name: row.get(0)?,
                    pattern_type: row.get(1)?,
                    departure_code: row.get(2)?,
                    arrival_code: row.get(3)?,
                    description: row.get(4)?,
                    flight_ids,
                    frequency: row.get::<_, i64>(6)? as usize,
                    date_start: row.get(7)?,
                    date_end: row.get(8)?,
                    risk: RiskTag::parse(&risk)
                        .ok_or_else(|| invalid(9, format!("Unknown risk tag: {}", risk)))?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
