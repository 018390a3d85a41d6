//! Fetches the complete daily weather history of a NOAA station from the Climate
//! Data Online (CDO) v2 API and stores it as JSON and CSV.
//!
//! The range is split into windows of at most a year, fetched one after the other
//! at no more than five requests per second. Throttled requests are retried with
//! exponential backoff; other failures skip the window, so a run always produces
//! whatever could be collected.

mod api;
mod config;
mod error;
mod fetcher;
mod output;
mod prompt;
mod types;
mod utils;

pub use error::NoaaError;

pub use api::client::{CdoClient, Page};
pub use api::error::FetchError;
pub use api::models::{pivot_records, DataRecord, DataResponse};

pub use config::error::ConfigError;
pub use config::{
    ApiSettings, ApiToken, Config, FetchSettings, FileSettings, DEFAULT_BASE_URL,
    DEFAULT_CONFIG_FILE, DEFAULT_EPOCH_YEAR, DEFAULT_STATION,
};

pub use fetcher::checkpoint::{CheckpointError, CheckpointStore};
pub use fetcher::historical::HistoricalFetcher;
pub use fetcher::report::{FetchReport, WindowOutcome, WindowStatus};
pub use fetcher::retry::{RequestPacer, RetryPolicy};

pub use output::csv::{observations_to_frame, write_csv, CSV_COLUMNS};
pub use output::error::OutputError;
pub use output::json::write_json;
pub use output::summary::{Extremes, PrecipitationTotals, Summary};
pub use output::{persist, persist_station_info, OutputKind, OutputPaths};

pub use prompt::{
    prompt_start, InputProvider, PromptError, ScriptedInput, StartChoice, StdinInput,
};

pub use types::data_type::DataType;
pub use types::observation::WeatherObservation;
pub use types::result_set::ResultSet;
pub use types::station::{EmptyStationId, StationId, StationInfo};
pub use types::window::{FetchWindow, DEFAULT_MAX_WINDOW_DAYS};
