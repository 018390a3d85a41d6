use crate::api::client::{CdoClient, Page};
use crate::api::error::FetchError;
use crate::api::models::{pivot_records, DataRecord, DataResponse};
use crate::config::{Config, FetchSettings};
use crate::fetcher::checkpoint::CheckpointStore;
use crate::fetcher::report::{FetchReport, WindowOutcome, WindowStatus};
use crate::fetcher::retry::{RequestPacer, RetryPolicy};
use crate::types::observation::WeatherObservation;
use crate::types::result_set::ResultSet;
use crate::types::station::StationId;
use crate::types::window::FetchWindow;
use bon::bon;
use chrono::{Local, NaiveDate};
use log::{info, warn};
use tokio::time::sleep;

/// Fetches the daily history of a station window by window.
///
/// Requests are strictly sequential and spaced by the configured delay. A throttled
/// request is retried with exponential backoff; any other failure skips the window
/// and the run carries on, so a run always ends with whatever could be collected.
pub struct HistoricalFetcher {
    client: CdoClient,
    settings: FetchSettings,
    retry: RetryPolicy,
    checkpoints: Option<CheckpointStore>,
}

#[bon]
impl HistoricalFetcher {
    /// Creates a fetcher from the run configuration.
    ///
    /// Checkpointing is enabled when `fetch.checkpoint` is set and a checkpoint
    /// directory is configured or can be derived from the user cache directory.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if the HTTP client cannot be created.
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let checkpoints = if config.fetch.checkpoint {
            let dir = config.files.resolve_checkpoint_dir();
            if dir.is_none() {
                warn!("No cache directory available, window checkpoints disabled");
            }
            dir.map(|dir| CheckpointStore::new(dir, &config.api))
        } else {
            None
        };

        Ok(Self {
            client: CdoClient::new(&config.api)?,
            settings: config.fetch.clone(),
            retry: config.retry.clone(),
            checkpoints,
        })
    }

    pub fn client(&self) -> &CdoClient {
        &self.client
    }

    /// Fetches every day from `start` through `end` (today when not given) for `station`.
    ///
    /// An `end` in the future is clamped to today. A `start` after `end` yields an
    /// empty report.
    ///
    /// # Errors
    ///
    /// Only [`FetchError::InvalidRange`], when `start` lies in the future. Failures of
    /// individual windows are reported in [`FetchReport::windows`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use noaa_history::{Config, HistoricalFetcher, NoaaError};
    /// # use chrono::NaiveDate;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), NoaaError> {
    /// let config = Config::from_toml_str("[api]\ntoken = \"my-token\"")?;
    /// let fetcher = HistoricalFetcher::new(&config)?;
    ///
    /// let report = fetcher
    ///     .fetch()
    ///     .station(&config.station)
    ///     .start(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
    ///     .call()
    ///     .await?;
    /// println!("{} days", report.observations.len());
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn fetch(
        &self,
        station: &StationId,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<FetchReport, FetchError> {
        let today = Local::now().date_naive();
        if start > today {
            return Err(FetchError::InvalidRange {
                start,
                limit: today,
            });
        }
        let end = end.unwrap_or(today).min(today);

        let windows = FetchWindow::partition(start, end, self.settings.max_window_days);
        info!(
            "Fetching {} from {} to {} ({} days) in {} windows",
            station,
            start,
            end,
            windows.iter().map(FetchWindow::days).sum::<i64>(),
            windows.len()
        );

        let mut pacer = RequestPacer::new(self.settings.request_delay);
        let mut results = ResultSet::new();
        let mut outcomes = Vec::with_capacity(windows.len());

        for (index, window) in windows.iter().copied().enumerate() {
            let status = self
                .process_window(station, window, today, &mut pacer, &mut results)
                .await;

            match &status {
                WindowStatus::Fetched {
                    records,
                    observations,
                } => info!(
                    "Window {} of {} ({}): {} days from {} records, {} days so far",
                    index + 1,
                    windows.len(),
                    window,
                    observations,
                    records,
                    results.len()
                ),
                WindowStatus::Restored { observations } => info!(
                    "Window {} of {} ({}): {} days restored from checkpoint",
                    index + 1,
                    windows.len(),
                    window,
                    observations
                ),
                WindowStatus::Failed(e) => warn!(
                    "Window {} of {} ({}) skipped: {}",
                    index + 1,
                    windows.len(),
                    window,
                    e
                ),
            }

            outcomes.push(WindowOutcome { window, status });
        }

        if results.is_empty() {
            warn!("No observations collected for {} from {} to {}", station, start, end);
        }
        let observations = results.into_unique_sorted();
        info!(
            "Fetch finished: {} days, {} of {} windows failed",
            observations.len(),
            outcomes.iter().filter(|o| o.is_failed()).count(),
            outcomes.len()
        );

        Ok(FetchReport {
            observations,
            windows: outcomes,
        })
    }

    async fn process_window(
        &self,
        station: &StationId,
        window: FetchWindow,
        today: NaiveDate,
        pacer: &mut RequestPacer,
        results: &mut ResultSet,
    ) -> WindowStatus {
        // Only windows entirely in the past are final.
        let store = self.checkpoints.as_ref().filter(|_| window.end < today);

        if let Some(store) = store {
            match store.load(station, window).await {
                Ok(Some(observations)) => {
                    let count = observations.len();
                    results.extend(observations);
                    return WindowStatus::Restored {
                        observations: count,
                    };
                }
                Ok(None) => {}
                Err(e) => warn!("Ignoring checkpoint for {}: {}", window, e),
            }
        }

        let (records, observations) = match self.fetch_window(station, window, pacer).await {
            Ok(fetched) => fetched,
            Err(e) => return WindowStatus::Failed(e),
        };

        if let Some(store) = store {
            if let Err(e) = store.save(station, window, &observations).await {
                warn!("Failed to checkpoint {}: {}", window, e);
            }
        }

        let count = observations.len();
        results.extend(observations);
        WindowStatus::Fetched {
            records,
            observations: count,
        }
    }

    /// Collects all pages of one window and folds them into daily observations.
    async fn fetch_window(
        &self,
        station: &StationId,
        window: FetchWindow,
        pacer: &mut RequestPacer,
    ) -> Result<(usize, Vec<WeatherObservation>), FetchError> {
        let mut records: Vec<DataRecord> = Vec::new();
        let mut offset: u32 = 1;

        loop {
            let page = self.fetch_page(station, window, offset, pacer).await?;
            let page_len = page.results.len();
            let total = page.total_count() as usize;
            records.extend(page.results);

            if page_len == 0 || offset as usize - 1 + page_len >= total {
                break;
            }
            offset += page_len as u32;
        }

        let record_count = records.len();
        Ok((record_count, pivot_records(station, records)))
    }

    /// Requests one page, retrying while the API is throttling.
    async fn fetch_page(
        &self,
        station: &StationId,
        window: FetchWindow,
        offset: u32,
        pacer: &mut RequestPacer,
    ) -> Result<DataResponse, FetchError> {
        let mut attempts: u32 = 0;

        loop {
            pacer.wait().await;
            match self.client.data_page(station, window, offset).await? {
                Page::Data(data) => return Ok(data),
                Page::Throttled { retry_after } => {
                    attempts += 1;
                    if !self.retry.should_retry(attempts) {
                        return Err(FetchError::RateLimited {
                            url: self.client.data_url(),
                            attempts,
                        });
                    }
                    let backoff = self.retry.wait_for(attempts, retry_after);
                    warn!(
                        "Rate limit reached for {}, waiting {:.1}s (attempt {} of {})",
                        window,
                        backoff.as_secs_f64(),
                        attempts,
                        self.retry.max_attempts
                    );
                    sleep(backoff).await;
                }
            }
        }
    }
}
