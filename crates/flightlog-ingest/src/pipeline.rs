//! The manifest import pipeline

use crate::config::ImportConfig;
use crate::delimiter::sniff_delimiter;
use crate::error::{IngestError, RowError, RowParseError};
use crate::resolver::EntityResolver;
use crate::row::{missing_columns, ManifestRecord, RawManifestRow};
use crate::stats::ImportStats;
use flightlog_domain::flight::{ManifestEntry, NewFlight};
use flightlog_domain::traits::FlightStore;
use flightlog_domain::{FlightId, NameNormalizer, PassengerRole};
use std::collections::HashSet;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;
use tracing::{debug, info, warn};

/// Flights between progress log lines
const PROGRESS_EVERY: usize = 100;

/// Streams manifest rows into a [`FlightStore`]
///
/// Rows are processed one at a time. A bad row is counted and skipped; it
/// never rolls back rows committed in earlier batches.
pub struct ImportPipeline<'a, S: FlightStore> {
    store: &'a mut S,
    config: ImportConfig,
    normalizer: NameNormalizer,
}

impl<'a, S> ImportPipeline<'a, S>
where
    S: FlightStore,
    S::Error: Display,
{
    /// Create a pipeline over a store
    pub fn new(store: &'a mut S, config: ImportConfig) -> Self {
        Self {
            store,
            config,
            normalizer: NameNormalizer::new(),
        }
    }

    /// Use a normalizer with extra aliases
    pub fn with_normalizer(mut self, normalizer: NameNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Import a manifest file
    ///
    /// The file name is the source tag unless the config sets one.
    pub fn run_path(&mut self, path: &Path) -> Result<ImportStats, IngestError> {
        let file = File::open(path)?;
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.run(BufReader::new(file), &source)
    }

    /// Import a manifest from any reader
    pub fn run<R: Read>(&mut self, mut reader: R, source: &str) -> Result<ImportStats, IngestError> {
        self.config.validate().map_err(IngestError::Config)?;

        let mut sample = Vec::with_capacity(self.config.sample_bytes);
        reader
            .by_ref()
            .take(self.config.sample_bytes as u64)
            .read_to_end(&mut sample)?;
        let delimiter = sniff_delimiter(&sample);
        debug!("Detected delimiter {:?}", delimiter as char);

        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(Cursor::new(sample).chain(reader));

        let missing = missing_columns(csv_reader.headers()?.iter());
        if !missing.is_empty() {
            return Err(IngestError::MissingColumns(missing));
        }

        let mut resolver = EntityResolver::load(&*self.store, self.normalizer.clone())
            .map_err(|e| IngestError::Store(e.to_string()))?;
        let source_tag = self
            .config
            .source_tag
            .clone()
            .unwrap_or_else(|| source.to_string());

        info!("Starting import from '{}'", source);
        let mut stats = ImportStats::new();

        self.store.begin_batch().map_err(|e| commit_failure(e, &stats))?;

        for result in csv_reader.deserialize::<RawManifestRow>() {
            stats.rows_read += 1;
            let line = stats.rows_read;

            let outcome = result
                .map_err(|e| RowError::from(RowParseError::Malformed(e.to_string())))
                .and_then(|raw| raw.validate().map_err(RowError::from))
                .and_then(|record| self.import_record(&mut resolver, &record, &source_tag, &mut stats));

            match outcome {
                Ok(flight_id) => {
                    stats.flights_imported += 1;
                    debug!("Row {}: imported flight {}", line, flight_id);
                    if stats.flights_imported % PROGRESS_EVERY == 0 {
                        info!("Imported {} flights...", stats.flights_imported);
                    }
                }
                Err(e) => {
                    warn!("Row {}: skipped: {}", line, e);
                    stats.record_error(e.kind());
                }
            }

            if stats.rows_read % self.config.batch_size == 0 {
                self.store.commit_batch().map_err(|e| commit_failure(e, &stats))?;
                self.store.begin_batch().map_err(|e| commit_failure(e, &stats))?;
            }
        }

        self.store.commit_batch().map_err(|e| commit_failure(e, &stats))?;

        info!(
            "Import complete: {} rows, {} flights, {} errors",
            stats.rows_read, stats.flights_imported, stats.errors
        );
        Ok(stats)
    }

    fn import_record(
        &mut self,
        resolver: &mut EntityResolver,
        record: &ManifestRecord,
        source_tag: &str,
        stats: &mut ImportStats,
    ) -> Result<FlightId, RowError> {
        let departure = resolver
            .resolve_location(&mut *self.store, &record.departure_code)
            .map_err(RowError::Location)?;
        let arrival = resolver
            .resolve_location(&mut *self.store, &record.arrival_code)
            .map_err(RowError::Location)?;
        stats.locations_created += usize::from(departure.created) + usize::from(arrival.created);

        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(record.passengers.len());
        for raw in &record.passengers {
            let Some(resolved) = resolver
                .resolve_passenger(&mut *self.store, raw)
                .map_err(RowError::Passenger)?
            else {
                continue;
            };
            stats.passengers_created += usize::from(resolved.created);

            // First spelling on the manifest wins
            if seen.insert(resolved.id) {
                entries.push(ManifestEntry {
                    passenger_id: resolved.id,
                    role: PassengerRole::Passenger,
                    name_in_manifest: raw.clone(),
                });
            }
        }

        let aircraft_id = match self.config.aircraft() {
            Some(tail) => {
                let resolved = resolver
                    .resolve_aircraft(&mut *self.store, tail)
                    .map_err(RowError::Aircraft)?;
                stats.aircraft_created += usize::from(resolved.created);
                Some(resolved.id)
            }
            None => None,
        };

        let flight = NewFlight {
            flight_number: record.flight_number.clone(),
            aircraft_id,
            departure_id: departure.id,
            arrival_id: arrival.id,
            flight_date: record.date,
            manifest_id: NewFlight::manifest_reference(&record.flight_number, record.date),
            source: source_tag.to_string(),
            data_quality: self.config.data_quality.clone(),
        };

        self.store
            .insert_flight(&flight, &entries)
            .map_err(|e| RowError::Insert(e.to_string()))
    }
}

fn commit_failure<E: Display>(e: E, stats: &ImportStats) -> IngestError {
    IngestError::BatchCommit {
        message: e.to_string(),
        stats: stats.clone(),
    }
}
