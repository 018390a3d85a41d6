//! Response documents of the CDO `/data` endpoint.

use crate::types::data_type::DataType;
use crate::types::observation::WeatherObservation;
use crate::types::station::StationId;
use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use serde::Deserialize;
use std::collections::BTreeMap;

/// One page of `/data` results. A window without data comes back as `{}`.
#[derive(Debug, Default, Deserialize)]
pub struct DataResponse {
    #[serde(default)]
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub results: Vec<DataRecord>,
}

impl DataResponse {
    /// Total number of results across all pages, as reported by the API.
    pub fn total_count(&self) -> u32 {
        self.metadata
            .as_ref()
            .map(|m| m.resultset.count)
            .unwrap_or(0)
    }
}

#[derive(Debug, Deserialize)]
pub struct Metadata {
    pub resultset: ResultSetMetadata,
}

#[derive(Debug, Deserialize)]
pub struct ResultSetMetadata {
    pub offset: u32,
    pub count: u32,
    pub limit: u32,
}

/// A single (date, datatype) value.
#[derive(Debug, Clone, Deserialize)]
pub struct DataRecord {
    pub date: NaiveDateTime,
    pub datatype: String,
    #[serde(default)]
    pub station: Option<String>,
    #[serde(default)]
    pub attributes: Option<String>,
    pub value: f64,
}

/// Folds the records of one window into one observation per date.
///
/// Records of an unsupported datatype are skipped. When the same (date, datatype)
/// appears twice, the first value is kept.
pub fn pivot_records(station: &StationId, records: Vec<DataRecord>) -> Vec<WeatherObservation> {
    let mut by_date: BTreeMap<NaiveDate, WeatherObservation> = BTreeMap::new();

    for record in records {
        let Some(data_type) = DataType::from_code(&record.datatype) else {
            debug!("Skipping unsupported datatype {}", record.datatype);
            continue;
        };
        let date = record.date.date();
        by_date
            .entry(date)
            .or_insert_with(|| WeatherObservation::new(station.clone(), date))
            .set_if_absent(data_type, record.value);
    }

    by_date.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"{
        "metadata": {"resultset": {"offset": 1, "count": 5, "limit": 1000}},
        "results": [
            {"date": "2020-01-01T00:00:00", "datatype": "TMAX", "station": "GHCND:USW00023160", "attributes": ",,W,2400", "value": 64},
            {"date": "2020-01-01T00:00:00", "datatype": "TMIN", "station": "GHCND:USW00023160", "attributes": ",,W,2400", "value": 39},
            {"date": "2020-01-01T00:00:00", "datatype": "WT01", "station": "GHCND:USW00023160", "attributes": ",,W,", "value": 1},
            {"date": "2020-01-02T00:00:00", "datatype": "PRCP", "station": "GHCND:USW00023160", "attributes": ",,W,2400", "value": 0.12},
            {"date": "2020-01-01T00:00:00", "datatype": "TMAX", "station": "GHCND:USW00023160", "attributes": ",,W,2400", "value": 99}
        ]
    }"#;

    fn station() -> StationId {
        StationId::new("GHCND:USW00023160").unwrap()
    }

    #[test]
    fn test_parse_page() -> Result<(), serde_json::Error> {
        let page: DataResponse = serde_json::from_str(PAGE)?;
        assert_eq!(page.total_count(), 5);
        assert_eq!(page.results.len(), 5);
        assert_eq!(page.results[3].value, 0.12);
        Ok(())
    }

    #[test]
    fn test_parse_empty_window() -> Result<(), serde_json::Error> {
        let page: DataResponse = serde_json::from_str("{}")?;
        assert_eq!(page.total_count(), 0);
        assert!(page.results.is_empty());
        Ok(())
    }

    #[test]
    fn test_pivot_one_observation_per_date() -> Result<(), serde_json::Error> {
        let page: DataResponse = serde_json::from_str(PAGE)?;
        let observations = pivot_records(&station(), page.results);

        assert_eq!(observations.len(), 2);
        let first = &observations[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(first.max_temperature, Some(64.0));
        assert_eq!(first.min_temperature, Some(39.0));
        assert_eq!(first.precipitation, None);

        let second = &observations[1];
        assert_eq!(second.precipitation, Some(0.12));
        assert_eq!(second.max_temperature, None);
        Ok(())
    }
}
