//! Translation of filter specs into SQL
//!
//! Every clause becomes a parameterized predicate over the flight query's
//! aliases: `f` (flights), `d` (departure location), `a` (arrival location).
//! Passenger predicates are `EXISTS` subqueries so a matching flight still
//! carries its full passenger list.

use crate::StoreError;
use flightlog_domain::{FilterClause, FilterSpec, Page};
use rusqlite::types::Value;

/// Joined source every flight query selects from
pub const FLIGHT_FROM: &str = "flights f
     JOIN locations d ON d.id = f.departure_location_id
     JOIN locations a ON a.id = f.arrival_location_id
     LEFT JOIN aircraft ac ON ac.id = f.aircraft_id";

/// Columns read into a flight summary, in row order
pub const FLIGHT_COLUMNS: &str = "f.id, f.flight_number, f.flight_date, d.airport_code, a.airport_code, ac.tail_number, f.passenger_count";

/// Most recent first, ties by descending id
pub const FLIGHT_ORDER: &str = "ORDER BY f.flight_date DESC, f.id DESC";

const PASSENGER_EXISTS: &str = "EXISTS (SELECT 1 FROM flight_passengers fp
     JOIN passengers p ON p.id = fp.passenger_id
     WHERE fp.flight_id = f.id AND ";

/// A WHERE clause and its positional parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhereClause {
    /// Predicates joined with AND (empty when there are none)
    pub predicates: Vec<String>,
    /// Parameters in placeholder order
    pub params: Vec<Value>,
}

impl WhereClause {
    /// Render as ` WHERE ...`, or an empty string when unconstrained
    pub fn to_sql(&self) -> String {
        if self.predicates.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.predicates.join(" AND "))
        }
    }
}

/// Build the WHERE clause for a filter spec
pub fn build_where(spec: &FilterSpec) -> WhereClause {
    let mut clause = WhereClause::default();

    for filter in &spec.clauses {
        match filter {
            FilterClause::PassengerNameContains(name) => {
                clause
                    .predicates
                    .push(format!("{}{})", PASSENGER_EXISTS, contains("p.full_name")));
                clause.params.push(text(name));
            }
            FilterClause::AirportContains(code) => {
                clause.predicates.push(format!(
                    "({} OR {})",
                    contains("d.airport_code"),
                    contains("a.airport_code")
                ));
                clause.params.push(text(code));
                clause.params.push(text(code));
            }
            FilterClause::DateFrom(date) => {
                clause.predicates.push("f.flight_date >= ?".to_string());
                clause.params.push(Value::Text(date.format("%Y-%m-%d").to_string()));
            }
            FilterClause::DateTo(date) => {
                clause.predicates.push("f.flight_date <= ?".to_string());
                clause.params.push(Value::Text(date.format("%Y-%m-%d").to_string()));
            }
            FilterClause::DepartureIs(code) => {
                clause.predicates.push("d.airport_code = ?".to_string());
                clause.params.push(text(code));
            }
            FilterClause::ArrivalIs(code) => {
                clause.predicates.push("a.airport_code = ?".to_string());
                clause.params.push(text(code));
            }
            FilterClause::Year(year) => {
                clause
                    .predicates
                    .push("CAST(strftime('%Y', f.flight_date) AS INTEGER) = ?".to_string());
                clause.params.push(Value::Integer(i64::from(*year)));
            }
            FilterClause::Month(month) => {
                clause
                    .predicates
                    .push("CAST(strftime('%m', f.flight_date) AS INTEGER) = ?".to_string());
                clause.params.push(Value::Integer(i64::from(*month)));
            }
            FilterClause::AnyPassengerNameContains(names) => {
                let any = vec![contains("p.full_name"); names.len()].join(" OR ");
                clause
                    .predicates
                    .push(format!("{}({}))", PASSENGER_EXISTS, any));
                clause.params.extend(names.iter().map(|n| text(n)));
            }
        }
    }

    clause
}

/// Paged flight query: returns the SQL and its parameters
///
/// Fails when the limit or offset does not fit SQLite's signed integers.
pub fn page_query(spec: &FilterSpec, page: Page) -> Result<(String, Vec<Value>), StoreError> {
    let clause = build_where(spec);
    let sql = format!(
        "SELECT {} FROM {}{} {} LIMIT ? OFFSET ?",
        FLIGHT_COLUMNS,
        FLIGHT_FROM,
        clause.to_sql(),
        FLIGHT_ORDER
    );
    let mut params = clause.params;
    params.push(Value::Integer(sql_integer(page.limit, "limit")?));
    params.push(Value::Integer(sql_integer(page.offset, "offset")?));
    Ok((sql, params))
}

/// Unpaged flight query
pub fn all_query(spec: &FilterSpec) -> (String, Vec<Value>) {
    let clause = build_where(spec);
    let sql = format!(
        "SELECT {} FROM {}{} {}",
        FLIGHT_COLUMNS,
        FLIGHT_FROM,
        clause.to_sql(),
        FLIGHT_ORDER
    );
    (sql, clause.params)
}

/// Count of flights matching the spec
pub fn count_query(spec: &FilterSpec) -> (String, Vec<Value>) {
    let clause = build_where(spec);
    let sql = format!("SELECT COUNT(*) FROM {}{}", FLIGHT_FROM, clause.to_sql());
    (sql, clause.params)
}

/// `?, ?, ?` for an IN list of `n` values
pub fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// Convert a count to a bound SQL integer
pub fn sql_integer(value: usize, what: &str) -> Result<i64, StoreError> {
    i64::try_from(value)
        .map_err(|_| StoreError::InvalidData(format!("{} {} is out of range", what, value)))
}

fn contains(column: &str) -> String {
    format!("instr(fold({}), fold(?)) > 0", column)
}

fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}
