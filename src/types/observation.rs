use crate::types::data_type::DataType;
use crate::types::station::StationId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily weather summary of one station for one date.
///
/// Every measurement is optional: a value the station did not report is `None`
/// and is left out of the JSON output rather than written as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherObservation {
    pub station: StationId,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_temperature: Option<f64>, // TMAX
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_temperature: Option<f64>, // TMIN
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<f64>, // PRCP
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_wind_speed: Option<f64>, // AWND
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snowfall: Option<f64>, // SNOW
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snow_depth: Option<f64>, // SNWD
}

impl WeatherObservation {
    /// Creates an observation with no measurements.
    pub fn new(station: StationId, date: NaiveDate) -> Self {
        Self {
            station,
            date,
            max_temperature: None,
            min_temperature: None,
            precipitation: None,
            average_wind_speed: None,
            snowfall: None,
            snow_depth: None,
        }
    }

    pub fn get(&self, data_type: DataType) -> Option<f64> {
        match data_type {
            DataType::MaxTemperature => self.max_temperature,
            DataType::MinTemperature => self.min_temperature,
            DataType::Precipitation => self.precipitation,
            DataType::AverageWindSpeed => self.average_wind_speed,
            DataType::Snowfall => self.snowfall,
            DataType::SnowDepth => self.snow_depth,
        }
    }

    fn slot(&mut self, data_type: DataType) -> &mut Option<f64> {
        match data_type {
            DataType::MaxTemperature => &mut self.max_temperature,
            DataType::MinTemperature => &mut self.min_temperature,
            DataType::Precipitation => &mut self.precipitation,
            DataType::AverageWindSpeed => &mut self.average_wind_speed,
            DataType::Snowfall => &mut self.snowfall,
            DataType::SnowDepth => &mut self.snow_depth,
        }
    }

    /// Sets a measurement unless one is already present. Returns whether the value was taken.
    pub fn set_if_absent(&mut self, data_type: DataType, value: f64) -> bool {
        let slot = self.slot(data_type);
        if slot.is_some() {
            return false;
        }
        *slot = Some(value);
        true
    }
}
