//! Export command implementation.

use crate::cli::{ExportArgs, ExportFormat};
use crate::error::Result;
use crate::output::Formatter;
use flightlog_domain::ExportRow;
use flightlog_query::QueryEngine;
use flightlog_store::SqliteStore;
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// Execute the export command.
pub fn execute_export(args: ExportArgs, store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    let rows = QueryEngine::new(store).export(&args.filters.to_filters(None, None))?;

    match &args.output {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            write_rows(args.export_as, &rows, &mut out)?;
            out.flush()?;
            eprintln!(
                "{}",
                formatter.success(&format!("Exported {} flights to {}", rows.len(), path.display()))
            );
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            write_rows(args.export_as, &rows, &mut out)?;
            out.flush()?;
        }
    }

    Ok(())
}

fn write_rows<W: Write>(format: ExportFormat, rows: &[ExportRow], out: &mut W) -> Result<()> {
    match format {
        ExportFormat::Csv => write_csv(rows, out),
        ExportFormat::Json => write_json(rows, out),
    }
}

/// Write rows as CSV with a header line.
pub fn write_csv<W: Write>(rows: &[ExportRow], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write rows as a pretty-printed JSON array.
pub fn write_json<W: Write>(rows: &[ExportRow], mut out: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, rows)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rows() -> Vec<ExportRow> {
        vec![ExportRow {
            flight_number: "1044".to_string(),
            flight_date: NaiveDate::from_ymd_opt(1995, 11, 17).unwrap(),
            departure_code: "TEB".to_string(),
            arrival_code: "PBI".to_string(),
            aircraft: "N908JE".to_string(),
            passenger_count: 2,
            passengers: "Jeffrey Epstein, Sarah Kellen".to_string(),
        }]
    }

    #[test]
    fn test_csv_has_header_and_quoted_names() {
        let mut buf = Vec::new();
        write_csv(&rows(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("flight_number,flight_date,departure_code,arrival_code,aircraft,passenger_count,passengers")
        );
        assert_eq!(
            lines.next(),
            Some("1044,1995-11-17,TEB,PBI,N908JE,2,\"Jeffrey Epstein, Sarah Kellen\"")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_csv_empty_export() {
        let mut buf = Vec::new();
        write_csv(&[], &mut buf).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn test_json_array() {
        let mut buf = Vec::new();
        write_json(&rows(), &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value[0]["aircraft"], "N908JE");
        assert_eq!(value[0]["passenger_count"], 2);
    }
}
