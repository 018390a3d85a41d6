use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to create output directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to write '{0}'")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("Failed to encode JSON for '{0}'")]
    Json(PathBuf, #[source] serde_json::Error),

    #[error("Failed to build or write CSV '{0}'")]
    Csv(PathBuf, #[source] PolarsError),
}
