//! HTTP access to the NOAA Climate Data Online (CDO) v2 API.

use crate::api::error::FetchError;
use crate::api::models::DataResponse;
use crate::config::{ApiSettings, ApiToken};
use crate::types::data_type::DataType;
use crate::types::station::{StationId, StationInfo};
use crate::types::window::FetchWindow;
use log::{debug, warn};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use std::time::Duration;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Result of requesting one page of data.
#[derive(Debug)]
pub enum Page {
    Data(DataResponse),
    /// The API answered 429. `retry_after` carries the server's hint, if any.
    Throttled { retry_after: Option<Duration> },
}

enum Reply {
    Body(String),
    Throttled { retry_after: Option<Duration> },
}

/// Client for the CDO endpoints used by the fetcher.
///
/// Every request carries the access token in the `token` header. The client issues
/// exactly one HTTP request per call; retrying and pacing are left to the caller.
pub struct CdoClient {
    client: Client,
    base_url: String,
    token: ApiToken,
    dataset: String,
    units: String,
    data_types: Vec<DataType>,
    page_limit: u32,
}

impl CdoClient {
    /// Creates a client from the API section of the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if the underlying HTTP client cannot be created.
    pub fn new(api: &ApiSettings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(api.timeout)
            .build()
            .map_err(FetchError::ClientBuild)?;

        Ok(Self {
            client,
            base_url: api.base_url.clone(),
            token: api.token.clone(),
            dataset: api.dataset.clone(),
            units: api.units.clone(),
            data_types: api.data_types.clone(),
            page_limit: api.page_limit,
        })
    }

    pub fn data_url(&self) -> String {
        format!("{}/data", self.base_url)
    }

    /// Requests one page of daily data for `station` within `window`.
    ///
    /// `offset` is 1-based, as in the CDO API.
    ///
    /// # Errors
    ///
    /// * [`FetchError::NetworkRequest`] when the request cannot be sent or the body read.
    /// * [`FetchError::HttpStatus`] for any non-success status other than 429.
    /// * [`FetchError::DataFormat`] when the body is not a CDO data document.
    pub async fn data_page(
        &self,
        station: &StationId,
        window: FetchWindow,
        offset: u32,
    ) -> Result<Page, FetchError> {
        let url = self.data_url();
        let data_types = self
            .data_types
            .iter()
            .map(DataType::code)
            .collect::<Vec<_>>()
            .join(",");
        let query = [
            ("datasetid", self.dataset.clone()),
            ("stationid", station.to_string()),
            ("startdate", window.start.format(DATE_FORMAT).to_string()),
            ("enddate", window.end.format(DATE_FORMAT).to_string()),
            ("datatypeid", data_types),
            ("units", self.units.clone()),
            ("limit", self.page_limit.to_string()),
            ("offset", offset.to_string()),
        ];

        match self.get(&url, &query).await? {
            Reply::Throttled { retry_after } => Ok(Page::Throttled { retry_after }),
            Reply::Body(body) if body.trim().is_empty() => Ok(Page::Data(DataResponse::default())),
            Reply::Body(body) => serde_json::from_str(&body)
                .map(Page::Data)
                .map_err(|source| FetchError::DataFormat { url, source }),
        }
    }

    /// Fetches the metadata of `station`.
    ///
    /// A 429 here is reported as [`FetchError::RateLimited`] without retrying.
    pub async fn station_info(&self, station: &StationId) -> Result<StationInfo, FetchError> {
        let url = format!("{}/stations/{}", self.base_url, station);

        match self.get(&url, &[]).await? {
            Reply::Throttled { .. } => Err(FetchError::RateLimited { url, attempts: 1 }),
            Reply::Body(body) => serde_json::from_str(&body)
                .map_err(|source| FetchError::DataFormat { url, source }),
        }
    }

    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<Reply, FetchError> {
        debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(url)
            .header("token", self.token.expose())
            .query(query)
            .send()
            .await
            .map_err(|e| FetchError::NetworkRequest(url.to_string(), e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Ok(Reply::Throttled {
                retry_after: parse_retry_after(response.headers()),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("HTTP error for {}: {} {}", url, status, body);
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status,
                body,
            });
        }

        response
            .text()
            .await
            .map(Reply::Body)
            .map_err(|e| FetchError::NetworkRequest(url.to_string(), e))
    }
}

/// Reads a `Retry-After` header given in seconds.
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}
