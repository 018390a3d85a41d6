use crate::types::station::EmptyStationId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No API token configured: set `token` under [api] or the NOAA_API_KEY environment variable")]
    MissingToken,

    #[error("Failed to read configuration file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse configuration file")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid station identifier")]
    Station(#[from] EmptyStationId),

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
