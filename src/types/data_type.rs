//! Defines the CDO datatype identifiers that make up a daily weather observation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the daily-summary (GHCND) datatypes requested from the CDO API.
///
/// The serialized form is the CDO datatype id (e.g. `"TMAX"`), which is also the
/// column name used in CSV output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Maximum temperature of the day.
    #[serde(rename = "TMAX")]
    MaxTemperature,
    /// Minimum temperature of the day.
    #[serde(rename = "TMIN")]
    MinTemperature,
    /// Total precipitation.
    #[serde(rename = "PRCP")]
    Precipitation,
    /// Average daily wind speed.
    #[serde(rename = "AWND")]
    AverageWindSpeed,
    /// Snowfall.
    #[serde(rename = "SNOW")]
    Snowfall,
    /// Snow depth.
    #[serde(rename = "SNWD")]
    SnowDepth,
}

impl DataType {
    /// All datatypes, in CSV column order.
    pub const ALL: [DataType; 6] = [
        DataType::MaxTemperature,
        DataType::MinTemperature,
        DataType::Precipitation,
        DataType::AverageWindSpeed,
        DataType::Snowfall,
        DataType::SnowDepth,
    ];

    /// The CDO datatype id.
    pub fn code(&self) -> &'static str {
        match self {
            DataType::MaxTemperature => "TMAX",
            DataType::MinTemperature => "TMIN",
            DataType::Precipitation => "PRCP",
            DataType::AverageWindSpeed => "AWND",
            DataType::Snowfall => "SNOW",
            DataType::SnowDepth => "SNWD",
        }
    }

    /// Resolves a CDO datatype id. Datatypes outside the supported set yield `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|data_type| data_type.code() == code)
    }
}

/// Formats a `DataType` as its CDO id.
///
/// # Examples
///
/// ```
/// use noaa_history::DataType;
///
/// assert_eq!(DataType::Precipitation.to_string(), "PRCP");
/// ```
impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
