use chrono::NaiveDate;
use thiserror::Error;

/// Failures of a single request or window.
///
/// None of these abort a fetch run: the affected window is recorded as failed and
/// the run moves on to the next one.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Rate limit still in effect for {url} after {attempts} attempts")]
    RateLimited { url: String, attempts: u32 },

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}: {body}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Unexpected response body from {url}")]
    DataFormat {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid fetch range: start {start} lies after {limit}")]
    InvalidRange { start: NaiveDate, limit: NaiveDate },
}
