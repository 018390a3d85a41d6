//! Defines the station identifier and the station metadata returned by the CDO
//! `/stations/{id}` endpoint.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Station identifier must not be empty")]
pub struct EmptyStationId;

/// Opaque identifier of a CDO station, e.g. `GHCND:USW00023160`.
///
/// The identifier is supplied externally and passed to the API unchanged; the only
/// check applied is that it is not blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(String);

impl StationId {
    /// Creates a `StationId`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyStationId`] if the identifier is blank.
    ///
    /// # Examples
    ///
    /// ```
    /// use noaa_history::StationId;
    ///
    /// let station = StationId::new(" GHCND:USW00023160 ").unwrap();
    /// assert_eq!(station.as_str(), "GHCND:USW00023160");
    /// assert!(StationId::new("  ").is_err());
    /// ```
    pub fn new(id: impl Into<String>) -> Result<Self, EmptyStationId> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(EmptyStationId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A file-name friendly form of the id: lowercase, with every character other
    /// than ASCII letters and digits replaced by `_`.
    pub fn file_stem(&self) -> String {
        self.0
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Station metadata as reported by the CDO API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationInfo {
    pub id: String,
    pub name: Option<String>,
    /// The earliest date for which the station reports data.
    pub mindate: Option<NaiveDate>,
    /// The latest date for which the station reports data.
    pub maxdate: Option<NaiveDate>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Elevation in meters.
    pub elevation: Option<f64>,
}
