//! Rows of the two source datasets

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the historical time-series dataset.
///
/// Column names mirror the CSV headers; columns beyond these three are
/// ignored during deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldObservation {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Crop_Type")]
    pub crop_type: String,
    #[serde(rename = "Crop_Yield")]
    pub yield_value: f64,
}

/// One row of the tabular training dataset used for the regression model
/// and the catalog endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabularRecord {
    pub temperature: f64,
    pub rainfall: f64,
    pub humidity: f64,
    pub soil_type: String,
    pub weather_condition: String,
    pub crop_type: String,
    pub crop_yield: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn observation_deserializes_from_csv_headers() {
        let json = r#"{"Date":"2024-03-15","Crop_Type":"Wheat","Crop_Yield":42.5}"#;
        let obs: YieldObservation = serde_json::from_str(json).unwrap();
        assert_eq!(obs.date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(obs.crop_type, "Wheat");
        assert_eq!(obs.yield_value, 42.5);
    }
}
