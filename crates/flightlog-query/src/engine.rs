//! Query engine implementation.

use crate::error::QueryError;
use crate::{pairs, profile};
use flightlog_domain::traits::ManifestReader;
use flightlog_domain::{
    ConnectionReport, ExportRow, FlightFilters, FlightPattern, Investigation, OverviewStats,
    PassengerFlightCount, PassengerId, RouteFrequency, SearchPage,
};
use std::collections::HashSet;
use std::fmt::Display;
use tracing::debug;

/// Largest ranking a caller may request
pub const MAX_RANKING: usize = 1000;

/// Read-only query engine over a manifest store
///
/// Every operation is a fresh read; the engine holds no state besides the
/// store reference and never writes.
pub struct QueryEngine<'a, S: ManifestReader> {
    store: &'a S,
}

impl<'a, S> QueryEngine<'a, S>
where
    S: ManifestReader,
    S::Error: Display,
{
    /// Create an engine over a store
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// One page of flights matching the filters, most recent first
    pub fn search(&self, filters: &FlightFilters) -> Result<SearchPage, QueryError> {
        let query = filters.compile()?;
        debug!("Searching with {} clauses", query.spec.clauses.len());

        let page = self
            .store
            .search_flights(&query.spec, query.page)
            .map_err(store_error)?;

        debug!("Search matched {} flights", page.total_count);
        Ok(page)
    }

    /// Travel profile of every passenger whose name contains the text
    pub fn investigate(&self, passenger_name: &str) -> Result<Investigation, QueryError> {
        let name = non_blank(passenger_name, "passenger name")?;

        let matched = self.store.find_passengers(name).map_err(store_error)?;
        if matched.is_empty() {
            debug!("No passenger matches '{}'", name);
            return Ok(Investigation::NoData {
                passenger_name: name.to_string(),
            });
        }

        let ids: Vec<PassengerId> = matched.iter().map(|p| p.id).collect();
        let flights = self.store.flights_with_passengers(&ids).map_err(store_error)?;
        debug!(
            "'{}' matches {} passengers on {} flights",
            name,
            matched.len(),
            flights.len()
        );

        Ok(profile::investigate(name, &matched, &flights))
    }

    /// Shared flights and stored connection between two name matches
    ///
    /// The result does not depend on argument order.
    pub fn connections(&self, name_a: &str, name_b: &str) -> Result<ConnectionReport, QueryError> {
        let name_a = non_blank(name_a, "first passenger name")?;
        let name_b = non_blank(name_b, "second passenger name")?;

        let side_a = self.matching_ids(name_a)?;
        let side_b = self.matching_ids(name_b)?;
        if side_a.is_empty() || side_b.is_empty() {
            return Ok(pairs::report(Vec::new(), &[]));
        }

        let a: Vec<PassengerId> = side_a.iter().copied().collect();
        let b: Vec<PassengerId> = side_b.iter().copied().collect();
        let candidates = self.store.flights_with_passengers(&a).map_err(store_error)?;
        let shared = pairs::shared_flights(&side_a, &side_b, &candidates);
        let stored = self.store.connections_between(&a, &b).map_err(store_error)?;

        debug!(
            "'{}' and '{}' share {} flights ({} stored connections)",
            name_a,
            name_b,
            shared.len(),
            stored.len()
        );
        Ok(pairs::report(shared, &stored))
    }

    /// Headline numbers for the whole store
    pub fn overview(&self) -> Result<OverviewStats, QueryError> {
        self.store.overview().map_err(store_error)
    }

    /// Passengers with the most flights
    pub fn top_passengers(&self, limit: usize) -> Result<Vec<PassengerFlightCount>, QueryError> {
        self.store
            .top_passengers(ranking_limit(limit)?)
            .map_err(store_error)
    }

    /// Most flown routes
    pub fn top_routes(&self, limit: usize) -> Result<Vec<RouteFrequency>, QueryError> {
        self.store.top_routes(ranking_limit(limit)?).map_err(store_error)
    }

    /// Stored route patterns, most frequent first
    pub fn patterns(&self) -> Result<Vec<FlightPattern>, QueryError> {
        self.store.patterns().map_err(store_error)
    }

    /// Every flight matching the filters, flattened for export
    ///
    /// Pagination fields in the filters are validated but ignored.
    pub fn export(&self, filters: &FlightFilters) -> Result<Vec<ExportRow>, QueryError> {
        let query = filters.compile()?;
        let flights = self.store.export_flights(&query.spec).map_err(store_error)?;
        debug!("Exporting {} flights", flights.len());
        Ok(flights.iter().map(ExportRow::from).collect())
    }

    fn matching_ids(&self, name: &str) -> Result<HashSet<PassengerId>, QueryError> {
        let passengers = self.store.find_passengers(name).map_err(store_error)?;
        Ok(passengers.into_iter().map(|p| p.id).collect())
    }
}

fn non_blank<'n>(value: &'n str, what: &str) -> Result<&'n str, QueryError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(QueryError::InvalidInput(format!("{} must not be blank", what)))
    } else {
        Ok(trimmed)
    }
}

fn ranking_limit(limit: usize) -> Result<usize, QueryError> {
    if limit == 0 || limit > MAX_RANKING {
        Err(QueryError::InvalidInput(format!(
            "limit {} is outside 1..={}",
            limit, MAX_RANKING
        )))
    } else {
        Ok(limit)
    }
}

fn store_error<E: Display>(e: E) -> QueryError {
    QueryError::Store(e.to_string())
}
