//! Manifest row schema
//!
//! Rows are deserialized into [`RawManifestRow`] exactly as the source lays
//! them out, then validated into a [`ManifestRecord`] that the pipeline can
//! trust.

use crate::dates::parse_manifest_date;
use crate::error::RowParseError;
use chrono::NaiveDate;
use serde::Deserialize;

/// Header columns every manifest must carry
pub const REQUIRED_COLUMNS: [&str; 5] =
    ["Date", "Flight_No", "Departure_Code", "Arrival_Code", "Passengers"];

/// Required columns absent from a header
pub fn missing_columns<'a, I>(header: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let present: Vec<&str> = header.into_iter().map(str::trim).collect();
    REQUIRED_COLUMNS
        .iter()
        .filter(|c| !present.contains(*c))
        .map(|c| c.to_string())
        .collect()
}

/// A manifest row as read from the source
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawManifestRow {
    /// Date text
    #[serde(rename = "Date", default)]
    pub date: Option<String>,
    /// Flight number
    #[serde(rename = "Flight_No", default)]
    pub flight_no: Option<String>,
    /// Departure airport code
    #[serde(rename = "Departure_Code", default)]
    pub departure_code: Option<String>,
    /// Arrival airport code
    #[serde(rename = "Arrival_Code", default)]
    pub arrival_code: Option<String>,
    /// Comma-separated passenger names
    #[serde(rename = "Passengers", default)]
    pub passengers: Option<String>,
}

/// A validated manifest row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRecord {
    /// Flight date
    pub date: NaiveDate,
    /// Flight number
    pub flight_number: String,
    /// Departure code as written
    pub departure_code: String,
    /// Arrival code as written
    pub arrival_code: String,
    /// Passenger name segments as written (trimmed, non-empty)
    pub passengers: Vec<String>,
}

impl RawManifestRow {
    /// Validate the row
    pub fn validate(self) -> Result<ManifestRecord, RowParseError> {
        let date = parse_manifest_date(self.date.as_deref().unwrap_or(""))?;

        Ok(ManifestRecord {
            date,
            flight_number: required(self.flight_no, "Flight_No")?,
            departure_code: required(self.departure_code, "Departure_Code")?,
            arrival_code: required(self.arrival_code, "Arrival_Code")?,
            passengers: split_passengers(self.passengers.as_deref().unwrap_or("")),
        })
    }
}

/// Split a passenger field on commas
pub fn split_passengers(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn required(value: Option<String>, field: &'static str) -> Result<String, RowParseError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(RowParseError::MissingField(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(date: &str, flight: &str, dep: &str, arr: &str, pax: &str) -> RawManifestRow {
        RawManifestRow {
            date: Some(date.to_string()),
            flight_no: Some(flight.to_string()),
            departure_code: Some(dep.to_string()),
            arrival_code: Some(arr.to_string()),
            passengers: Some(pax.to_string()),
        }
    }

    #[test]
    fn test_valid_row() {
        let record = raw("11/17/95", "1044", "TEB", "PBI", "JE, GM ,, Sarah Kellen")
            .validate()
            .unwrap();
        assert_eq!(record.date, NaiveDate::from_ymd_opt(1995, 11, 17).unwrap());
        assert_eq!(record.passengers, vec!["JE", "GM", "Sarah Kellen"]);
    }

    #[test]
    fn test_empty_passenger_field_is_allowed() {
        let record = raw("11/17/95", "1044", "TEB", "PBI", "").validate().unwrap();
        assert!(record.passengers.is_empty());
    }

    #[test]
    fn test_missing_fields() {
        let err = raw("11/17/95", " ", "TEB", "PBI", "JE").validate().unwrap_err();
        assert_eq!(err, RowParseError::MissingField("Flight_No"));

        let mut row = raw("11/17/95", "1044", "TEB", "PBI", "JE");
        row.arrival_code = None;
        assert_eq!(row.validate().unwrap_err(), RowParseError::MissingField("Arrival_Code"));
    }

    #[test]
    fn test_bad_date() {
        let err = raw("someday", "1044", "TEB", "PBI", "JE").validate().unwrap_err();
        assert!(matches!(err, RowParseError::InvalidDate(_)));
    }

    #[test]
    fn test_missing_columns() {
        let header = ["Date", "Flight_No", "Departure_Code", "Passengers"];
        assert_eq!(missing_columns(header), vec!["Arrival_Code".to_string()]);
        assert!(missing_columns(REQUIRED_COLUMNS).is_empty());
    }
}
