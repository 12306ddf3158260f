//! Find-or-create resolution of passengers, locations and aircraft
//!
//! A resolver is created per import run. It bulk-loads every known key from
//! the store once, then serves lookups from memory; misses are classified,
//! persisted and cached so later rows in the same run see them immediately.

use crate::error::ResolveError;
use flightlog_domain::classify::{classify_passenger, describe_aircraft, describe_location};
use flightlog_domain::entity::NewPassenger;
use flightlog_domain::traits::EntityStore;
use flightlog_domain::{AircraftId, LocationId, NameNormalizer, PassengerId};
use std::collections::HashMap;
use std::fmt::Display;
use tracing::debug;

/// Longest airport code accepted
pub const MAX_CODE_LEN: usize = 8;

/// Outcome of a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<Id> {
    /// Resolved identifier
    pub id: Id,
    /// Whether the record was created by this call
    pub created: bool,
}

impl<Id> Resolution<Id> {
    fn existing(id: Id) -> Self {
        Self { id, created: false }
    }

    fn new_record(id: Id) -> Self {
        Self { id, created: true }
    }
}

/// Per-run entity cache backed by an [`EntityStore`]
#[derive(Debug)]
pub struct EntityResolver {
    normalizer: NameNormalizer,
    passengers: HashMap<String, PassengerId>,
    locations: HashMap<String, LocationId>,
    aircraft: HashMap<String, AircraftId>,
}

impl EntityResolver {
    /// Load every known key from the store
    pub fn load<S>(store: &S, normalizer: NameNormalizer) -> Result<Self, ResolveError>
    where
        S: EntityStore,
        S::Error: Display,
    {
        let passengers = store
            .load_passenger_keys()
            .map_err(store_error)?
            .into_iter()
            .map(|(name, id)| (NameNormalizer::key(&name), id))
            .collect();
        let locations = store.load_location_keys().map_err(store_error)?.into_iter().collect();
        let aircraft = store.load_aircraft_keys().map_err(store_error)?.into_iter().collect();

        Ok(Self {
            normalizer,
            passengers,
            locations,
            aircraft,
        })
    }

    /// Resolve a raw manifest name
    ///
    /// Returns `Ok(None)` when the name is empty after normalization.
    pub fn resolve_passenger<S>(
        &mut self,
        store: &mut S,
        raw_name: &str,
    ) -> Result<Option<Resolution<PassengerId>>, ResolveError>
    where
        S: EntityStore,
        S::Error: Display,
    {
        let Some(canonical) = self.normalizer.normalize(raw_name) else {
            return Ok(None);
        };
        let key = NameNormalizer::key(&canonical);

        if let Some(&id) = self.passengers.get(&key) {
            return Ok(Some(Resolution::existing(id)));
        }

        let profile = classify_passenger(&canonical);
        let record = NewPassenger::from_name(
            &canonical,
            profile.passenger_type,
            profile.risk_level,
            profile.verified,
        );
        let id = store.insert_passenger(&record).map_err(store_error)?;
        debug!(
            "Created passenger '{}' ({}, {})",
            canonical,
            profile.passenger_type.as_str(),
            profile.risk_level.as_str()
        );

        self.passengers.insert(key, id);
        Ok(Some(Resolution::new_record(id)))
    }

    /// Resolve an airport code
    pub fn resolve_location<S>(
        &mut self,
        store: &mut S,
        raw_code: &str,
    ) -> Result<Resolution<LocationId>, ResolveError>
    where
        S: EntityStore,
        S::Error: Display,
    {
        let code = raw_code.trim().to_uppercase();
        if code.is_empty()
            || code.chars().count() > MAX_CODE_LEN
            || !code.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(ResolveError::InvalidCode(raw_code.to_string()));
        }

        if let Some(&id) = self.locations.get(&code) {
            return Ok(Resolution::existing(id));
        }

        let record = describe_location(&code);
        let id = store.insert_location(&record).map_err(store_error)?;
        debug!("Created location '{}' ({})", code, record.name);

        self.locations.insert(code, id);
        Ok(Resolution::new_record(id))
    }

    /// Resolve a tail number
    pub fn resolve_aircraft<S>(
        &mut self,
        store: &mut S,
        raw_tail: &str,
    ) -> Result<Resolution<AircraftId>, ResolveError>
    where
        S: EntityStore,
        S::Error: Display,
    {
        let tail = raw_tail.trim().to_uppercase();
        if tail.is_empty() {
            return Err(ResolveError::InvalidCode(raw_tail.to_string()));
        }

        if let Some(&id) = self.aircraft.get(&tail) {
            return Ok(Resolution::existing(id));
        }

        let record = describe_aircraft(&tail);
        let id = store.insert_aircraft(&record).map_err(store_error)?;
        debug!("Created aircraft '{}' ({})", tail, record.model);

        self.aircraft.insert(tail, id);
        Ok(Resolution::new_record(id))
    }
}

fn store_error<E: Display>(e: E) -> ResolveError {
    ResolveError::Store(e.to_string())
}
