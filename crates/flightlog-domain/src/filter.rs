//! Flight search filters
//!
//! Callers describe a search with [`FlightFilters`], a bag of independently
//! optional fields. [`FlightFilters::compile`] validates it and turns it into a
//! [`FilterSpec`]: a list of typed clauses that storage layers translate into
//! their native query form. Clauses combine conjunctively; the multi-name list
//! inside [`FilterClause::AnyPassengerNameContains`] combines disjunctively.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default page size
pub const DEFAULT_LIMIT: usize = 100;

/// Largest page a caller may request
pub const MAX_LIMIT: usize = 1000;

/// Earliest year accepted by the year filter
pub const MIN_YEAR: i32 = 1900;

/// Latest year accepted by the year filter
pub const MAX_YEAR: i32 = 2100;

/// Sentinel meaning "any airport" for the exact departure/arrival filters
const ANY_AIRPORT: &str = "all";

/// Errors produced when compiling filters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// A text filter was present but empty
    #[error("filter '{0}' must not be blank")]
    Blank(&'static str),

    /// `date_from` is after `date_to`
    #[error("date_from {from} is after date_to {to}")]
    InvertedDateRange {
        /// Lower bound
        from: NaiveDate,
        /// Upper bound
        to: NaiveDate,
    },

    /// Month outside 1..=12
    #[error("month {0} is outside 1..=12")]
    InvalidMonth(u32),

    /// Year outside the accepted range
    #[error("year {0} is outside {min}..={max}", min = MIN_YEAR, max = MAX_YEAR)]
    InvalidYear(i32),

    /// Limit of zero or above [`MAX_LIMIT`]
    #[error("limit {0} is outside 1..={max}", max = MAX_LIMIT)]
    InvalidLimit(usize),

    /// Offset too large for the backing store
    #[error("offset {0} is out of range")]
    InvalidOffset(usize),
}

/// Search filters as supplied by a caller
///
/// Every field is optional; an absent field excludes nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightFilters {
    /// Case-insensitive substring of a passenger name
    pub passenger_name: Option<String>,
    /// Case-insensitive substring of either airport code
    pub airport_code: Option<String>,
    /// Earliest flight date (inclusive)
    pub date_from: Option<NaiveDate>,
    /// Latest flight date (inclusive)
    pub date_to: Option<NaiveDate>,
    /// Exact departure code ("all" means no filter)
    pub departure: Option<String>,
    /// Exact arrival code ("all" means no filter)
    pub arrival: Option<String>,
    /// Calendar year of the flight
    pub year: Option<i32>,
    /// Calendar month of the flight (1-12)
    pub month: Option<u32>,
    /// Flights carrying any passenger whose name contains one of these
    pub passengers: Vec<String>,
    /// Page size
    pub limit: Option<usize>,
    /// Rows to skip
    pub offset: Option<usize>,
}

/// A single typed search predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterClause {
    /// Some passenger's name contains the text (case-insensitive)
    PassengerNameContains(String),
    /// Departure or arrival code contains the text (case-insensitive)
    AirportContains(String),
    /// Flight date on or after
    DateFrom(NaiveDate),
    /// Flight date on or before
    DateTo(NaiveDate),
    /// Departure code equals
    DepartureIs(String),
    /// Arrival code equals
    ArrivalIs(String),
    /// Flight year equals
    Year(i32),
    /// Flight month equals
    Month(u32),
    /// Some passenger's name contains any of the texts
    AnyPassengerNameContains(Vec<String>),
}

/// A conjunction of filter clauses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    /// Clauses, all of which must hold
    pub clauses: Vec<FilterClause>,
}

impl FilterSpec {
    /// A spec that matches every flight
    pub fn all() -> Self {
        Self::default()
    }

    /// Add a clause
    pub fn with(mut self, clause: FilterClause) -> Self {
        self.clauses.push(clause);
        self
    }

    /// Whether the spec has no clauses
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// Limit/offset pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Maximum rows returned
    pub limit: usize,
    /// Rows skipped
    pub offset: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// A validated search: clauses plus pagination
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlightQuery {
    /// Predicates
    pub spec: FilterSpec,
    /// Page requested
    pub page: Page,
}

impl FlightFilters {
    /// Validate the filters and compile them into typed clauses
    ///
    /// # Examples
    ///
    /// ```
    /// use flightlog_domain::{FilterClause, FlightFilters};
    ///
    /// let filters = FlightFilters {
    ///     year: Some(1995),
    ///     departure: Some("teb".to_string()),
    ///     ..Default::default()
    /// };
    /// let query = filters.compile().unwrap();
    /// assert_eq!(query.spec.clauses, vec![
    ///     FilterClause::DepartureIs("TEB".to_string()),
    ///     FilterClause::Year(1995),
    /// ]);
    /// ```
    pub fn compile(&self) -> Result<FlightQuery, FilterError> {
        let mut spec = FilterSpec::all();

        if let Some(name) = &self.passenger_name {
            spec.clauses
                .push(FilterClause::PassengerNameContains(non_blank(name, "passenger_name")?));
        }

        if let Some(code) = &self.airport_code {
            spec.clauses
                .push(FilterClause::AirportContains(non_blank(code, "airport_code")?));
        }

        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if from > to {
                return Err(FilterError::InvertedDateRange { from, to });
            }
        }
        if let Some(from) = self.date_from {
            spec.clauses.push(FilterClause::DateFrom(from));
        }
        if let Some(to) = self.date_to {
            spec.clauses.push(FilterClause::DateTo(to));
        }

        if let Some(code) = exact_code(&self.departure, "departure")? {
            spec.clauses.push(FilterClause::DepartureIs(code));
        }
        if let Some(code) = exact_code(&self.arrival, "arrival")? {
            spec.clauses.push(FilterClause::ArrivalIs(code));
        }

        if let Some(year) = self.year {
            if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
                return Err(FilterError::InvalidYear(year));
            }
            spec.clauses.push(FilterClause::Year(year));
        }

        if let Some(month) = self.month {
            if !(1..=12).contains(&month) {
                return Err(FilterError::InvalidMonth(month));
            }
            spec.clauses.push(FilterClause::Month(month));
        }

        if !self.passengers.is_empty() {
            let names = self
                .passengers
                .iter()
                .map(|n| non_blank(n, "passengers"))
                .collect::<Result<Vec<_>, _>>()?;
            spec.clauses.push(FilterClause::AnyPassengerNameContains(names));
        }

        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if limit == 0 || limit > MAX_LIMIT {
            return Err(FilterError::InvalidLimit(limit));
        }

        // Stores bind pagination as signed 64-bit integers
        let offset = self.offset.unwrap_or(0);
        if i64::try_from(offset).is_err() {
            return Err(FilterError::InvalidOffset(offset));
        }

        Ok(FlightQuery {
            spec,
            page: Page { limit, offset },
        })
    }
}

fn non_blank(value: &str, field: &'static str) -> Result<String, FilterError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(FilterError::Blank(field))
    } else {
        Ok(trimmed.to_string())
    }
}

fn exact_code(value: &Option<String>, field: &'static str) -> Result<Option<String>, FilterError> {
    match value {
        None => Ok(None),
        Some(v) if v.trim().eq_ignore_ascii_case(ANY_AIRPORT) => Ok(None),
        Some(v) => non_blank(v, field).map(|c| Some(c.to_uppercase())),
    }
}
