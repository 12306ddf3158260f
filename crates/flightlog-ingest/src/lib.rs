//! Flightlog Ingest
//!
//! Turns delimited flight manifests into resolved entities and flights.
//!
//! # Overview
//!
//! Manifests arrive as hand-assembled spreadsheets: mixed date layouts,
//! varying delimiters, and passenger names spelled many ways. The pipeline
//! sniffs the delimiter, validates each row, resolves every name and code to
//! a canonical record, and writes one flight per row with its passenger links.
//!
//! # Architecture
//!
//! ```text
//! reader → sniff_delimiter → RawManifestRow → ManifestRecord
//!        → EntityResolver (NameNormalizer + caches) → FlightStore
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use flightlog_ingest::{ImportConfig, ImportPipeline};
//! use flightlog_store::SqliteStore;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = SqliteStore::new("flightlog.db")?;
//! let mut pipeline = ImportPipeline::new(&mut store, ImportConfig::default());
//!
//! let stats = pipeline.run_path(Path::new("flight_flights_table.csv"))?;
//! println!("{}", stats.summary());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod dates;
mod delimiter;
mod error;
mod pipeline;
mod resolver;
mod row;
mod stats;

pub use config::ImportConfig;
pub use dates::{parse_manifest_date, YEAR_PIVOT};
pub use delimiter::sniff_delimiter;
pub use error::{IngestError, ResolveError, RowError, RowParseError};
pub use pipeline::ImportPipeline;
pub use resolver::{EntityResolver, Resolution, MAX_CODE_LEN};
pub use row::{split_passengers, ManifestRecord, RawManifestRow, REQUIRED_COLUMNS};
pub use stats::{ErrorKind, ImportStats};
