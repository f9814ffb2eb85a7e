//! Dataset loading and catalog derivation
//!
//! Both CSVs are read once at startup; everything downstream works against
//! the in-memory records.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use shared::models::{TabularRecord, YieldObservation};

use crate::error::{AppError, AppResult};

/// Load the tabular training dataset from `path`.
pub fn load_tabular(path: impl AsRef<Path>) -> AppResult<Vec<TabularRecord>> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| AppError::Dataset(format!("cannot open {}: {e}", path.display())))?;
    read_tabular(file)
}

/// Load the historical time-series dataset from `path`.
pub fn load_observations(path: impl AsRef<Path>) -> AppResult<Vec<YieldObservation>> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| AppError::Dataset(format!("cannot open {}: {e}", path.display())))?;
    read_observations(file)
}

pub fn read_tabular(reader: impl Read) -> AppResult<Vec<TabularRecord>> {
    csv::Reader::from_reader(reader)
        .deserialize()
        .map(|row| row.map_err(|e| AppError::Dataset(format!("malformed tabular row: {e}"))))
        .collect()
}

pub fn read_observations(reader: impl Read) -> AppResult<Vec<YieldObservation>> {
    csv::Reader::from_reader(reader)
        .deserialize()
        .map(|row| row.map_err(|e| AppError::Dataset(format!("malformed time-series row: {e}"))))
        .collect()
}

/// Distinct values of the categorical dataset columns, in first-appearance
/// order.
#[derive(Debug, Clone)]
pub struct CropCatalog {
    pub crop_types: Vec<String>,
    pub soil_types: Vec<String>,
    pub weather_conditions: Vec<String>,
}

impl CropCatalog {
    pub fn from_records(records: &[TabularRecord]) -> Self {
        Self {
            crop_types: distinct(records.iter().map(|r| r.crop_type.as_str())),
            soil_types: distinct(records.iter().map(|r| r.soil_type.as_str())),
            weather_conditions: distinct(records.iter().map(|r| r.weather_condition.as_str())),
        }
    }
}

/// Collect distinct values preserving first-appearance order.
pub(crate) fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for value in values {
        if seen.insert(value) {
            out.push(value.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const TIMESERIES_CSV: &str = "\
Date,Crop_Type,Crop_Yield,Region
2024-01-01,Wheat,40.5,North
2024-01-01,Rice,55.0,South
2024-01-02,Wheat,41.0,North
";

    const TABULAR_CSV: &str = "\
temperature,rainfall,humidity,soil_type,weather_condition,crop_type,crop_yield
24.0,120.0,60.0,Loamy,Sunny,Wheat,40.5
28.0,200.0,70.0,Clay,Rainy,Rice,55.0
22.0,100.0,55.0,Loamy,Cloudy,Wheat,38.0
";

    #[test]
    fn reads_timeseries_rows_and_ignores_extra_columns() {
        let records = read_observations(TIMESERIES_CSV.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].crop_type, "Wheat");
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(records[1].yield_value, 55.0);
    }

    #[test]
    fn reads_tabular_rows() {
        let records = read_tabular(TABULAR_CSV.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].soil_type, "Clay");
        assert_eq!(records[2].crop_yield, 38.0);
    }

    #[test]
    fn malformed_rows_are_reported() {
        let bad = "Date,Crop_Type,Crop_Yield\nnot-a-date,Wheat,40.5\n";
        assert!(read_observations(bad.as_bytes()).is_err());
    }

    #[test]
    fn catalog_preserves_first_appearance_order() {
        let records = read_tabular(TABULAR_CSV.as_bytes()).unwrap();
        let catalog = CropCatalog::from_records(&records);
        assert_eq!(catalog.crop_types, vec!["Wheat", "Rice"]);
        assert_eq!(catalog.soil_types, vec!["Loamy", "Clay"]);
        assert_eq!(catalog.weather_conditions, vec!["Sunny", "Rainy", "Cloudy"]);
    }
}
