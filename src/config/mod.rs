//! Loads the run configuration.
//!
//! Configuration is read once at startup from a TOML file, overridden by the
//! `NOAA_API_KEY` and `STATION_ID` environment variables, validated, and handed to
//! the fetcher as an immutable [`Config`].

pub mod error;

use crate::config::error::ConfigError;
use crate::fetcher::retry::RetryPolicy;
use crate::types::data_type::DataType;
use crate::types::station::StationId;
use crate::types::window::DEFAULT_MAX_WINDOW_DAYS;
use crate::utils::get_cache_dir;
use log::{debug, LevelFilter};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "noaa_history.toml";
pub const DEFAULT_BASE_URL: &str = "https://www.ncdc.noaa.gov/cdo-web/api/v2";
pub const DEFAULT_STATION: &str = "GHCND:USW00023160";
/// First year asked for when the full history is requested.
pub const DEFAULT_EPOCH_YEAR: i32 = 1946;
/// The CDO API returns at most 1000 results per page.
pub const MAX_PAGE_LIMIT: u32 = 1000;

const TOKEN_ENV: &str = "NOAA_API_KEY";
const STATION_ENV: &str = "STATION_ID";

/// The CDO access token. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub token: ApiToken,
    pub base_url: String,
    /// CDO dataset id, `GHCND` for daily summaries.
    pub dataset: String,
    /// `standard` (Fahrenheit, inches) or `metric`.
    pub units: String,
    pub data_types: Vec<DataType>,
    pub page_limit: u32,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub epoch_year: i32,
    pub max_window_days: u32,
    /// Minimum spacing between two consecutive requests.
    pub request_delay: Duration,
    /// Whether closed windows are checkpointed to disk and reused.
    pub checkpoint: bool,
}

#[derive(Debug, Clone)]
pub struct FileSettings {
    pub output_dir: PathBuf,
    pub file_prefix: Option<String>,
    pub checkpoint_dir: Option<PathBuf>,
}

impl FileSettings {
    /// The configured file prefix, or the station's file stem when none is set.
    pub fn prefix_for(&self, station: &StationId) -> String {
        self.file_prefix
            .clone()
            .unwrap_or_else(|| station.file_stem())
    }

    /// The configured checkpoint directory, falling back to the user cache directory.
    pub fn resolve_checkpoint_dir(&self) -> Option<PathBuf> {
        self.checkpoint_dir.clone().or_else(get_cache_dir)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiSettings,
    pub station: StationId,
    pub fetch: FetchSettings,
    pub retry: RetryPolicy,
    pub files: FileSettings,
    pub log_level: LevelFilter,
}

impl Config {
    /// Loads the configuration file at `config_path` and applies environment overrides.
    ///
    /// A missing file is not an error as long as the token is provided through the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingToken`] when no token is configured anywhere, and
    /// [`ConfigError::Read`]/[`ConfigError::Parse`] when the file cannot be used.
    pub fn load(config_path: &Path) -> Result<Config, ConfigError> {
        let file = if config_path.exists() {
            let toml = fs::read_to_string(config_path)
                .map_err(|e| ConfigError::Read(config_path.to_path_buf(), e))?;
            toml::from_str(&toml)?
        } else {
            debug!(
                "No configuration file at {}, using defaults",
                config_path.display()
            );
            ConfigFile::default()
        };

        Self::build(file, EnvOverrides::from_env())
    }

    /// Parses a configuration from TOML text without consulting the environment.
    pub fn from_toml_str(toml: &str) -> Result<Config, ConfigError> {
        Self::build(toml::from_str(toml)?, EnvOverrides::default())
    }

    fn build(file: ConfigFile, overrides: EnvOverrides) -> Result<Config, ConfigError> {
        let ConfigFile {
            api,
            station,
            fetch,
            retry,
            files,
            log,
        } = file;

        let token = overrides
            .token
            .or(api.token)
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::MissingToken)?;
        let station = StationId::new(overrides.station.unwrap_or(station.id))?;

        if api.base_url.trim().is_empty() {
            return Err(invalid("api.base_url", "must not be empty"));
        }
        if api.data_types.is_empty() {
            return Err(invalid("api.data_types", "at least one datatype is required"));
        }
        if !(1..=MAX_PAGE_LIMIT).contains(&api.page_limit) {
            return Err(invalid(
                "api.page_limit",
                format!("must be between 1 and {}", MAX_PAGE_LIMIT),
            ));
        }
        if fetch.max_window_days == 0 {
            return Err(invalid("fetch.max_window_days", "must be at least 1"));
        }
        if retry.max_attempts == 0 {
            return Err(invalid("retry.max_attempts", "must be at least 1"));
        }
        if !retry.multiplier.is_finite() || retry.multiplier < 1.0 {
            return Err(invalid("retry.multiplier", "must be a number >= 1.0"));
        }

        Ok(Config {
            api: ApiSettings {
                token: ApiToken(token.trim().to_string()),
                base_url: api.base_url.trim_end_matches('/').to_string(),
                dataset: api.dataset,
                units: api.units,
                data_types: api.data_types,
                page_limit: api.page_limit,
                timeout: Duration::from_secs(api.timeout_secs),
            },
            station,
            fetch: FetchSettings {
                epoch_year: fetch.epoch_year,
                max_window_days: fetch.max_window_days,
                request_delay: Duration::from_millis(fetch.request_delay_ms),
                checkpoint: fetch.checkpoint,
            },
            retry: RetryPolicy::builder()
                .max_attempts(retry.max_attempts)
                .initial_backoff(Duration::from_millis(retry.initial_backoff_ms))
                .multiplier(retry.multiplier)
                .max_backoff(Duration::from_millis(retry.max_backoff_ms))
                .build(),
            files: FileSettings {
                output_dir: files.output_dir,
                file_prefix: files.file_prefix.filter(|p| !p.trim().is_empty()),
                checkpoint_dir: files.checkpoint_dir,
            },
            log_level: log.level,
        })
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.into(),
    }
}

#[derive(Debug, Default)]
struct EnvOverrides {
    token: Option<String>,
    station: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        let read = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self {
            token: read(TOKEN_ENV),
            station: read(STATION_ENV),
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    api: ApiSection,
    station: StationSection,
    fetch: FetchSection,
    retry: RetrySection,
    files: FilesSection,
    log: LogSection,
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ApiSection {
    token: Option<String>,
    base_url: String,
    dataset: String,
    units: String,
    data_types: Vec<DataType>,
    page_limit: u32,
    timeout_secs: u64,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            dataset: "GHCND".to_string(),
            units: "standard".to_string(),
            data_types: DataType::ALL.to_vec(),
            page_limit: MAX_PAGE_LIMIT,
            timeout_secs: 30,
        }
    }
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct StationSection {
    id: String,
}

impl Default for StationSection {
    fn default() -> Self {
        Self {
            id: DEFAULT_STATION.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FetchSection {
    epoch_year: i32,
    max_window_days: u32,
    request_delay_ms: u64,
    checkpoint: bool,
}

impl Default for FetchSection {
    fn default() -> Self {
        Self {
            epoch_year: DEFAULT_EPOCH_YEAR,
            max_window_days: DEFAULT_MAX_WINDOW_DAYS,
            // 5 requests per second, with a little headroom
            request_delay_ms: 210,
            checkpoint: true,
        }
    }
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RetrySection {
    max_attempts: u32,
    initial_backoff_ms: u64,
    multiplier: f64,
    max_backoff_ms: u64,
}

impl Default for RetrySection {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            initial_backoff_ms: policy.initial_backoff.as_millis() as u64,
            multiplier: policy.multiplier,
            max_backoff_ms: policy.max_backoff.as_millis() as u64,
        }
    }
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FilesSection {
    output_dir: PathBuf,
    file_prefix: Option<String>,
    checkpoint_dir: Option<PathBuf>,
}

impl Default for FilesSection {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("data"),
            file_prefix: None,
            checkpoint_dir: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct LogSection {
    level: LevelFilter,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_with_token_only() -> Result<(), ConfigError> {
        let config = Config::from_toml_str("[api]\ntoken = \"abc\"\n")?;
        assert_eq!(config.api.token.expose(), "abc");
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.dataset, "GHCND");
        assert_eq!(config.api.data_types, DataType::ALL.to_vec());
        assert_eq!(config.api.page_limit, 1000);
        assert_eq!(config.station.as_str(), DEFAULT_STATION);
        assert_eq!(config.fetch.epoch_year, 1946);
        assert_eq!(config.fetch.max_window_days, 366);
        assert_eq!(config.fetch.request_delay, Duration::from_millis(210));
        assert_eq!(config.files.output_dir, PathBuf::from("data"));
        assert_eq!(config.files.prefix_for(&config.station), "ghcnd_usw00023160");
        assert_eq!(config.log_level, LevelFilter::Info);
        Ok(())
    }

    #[test]
    fn test_missing_token_is_fatal() {
        assert!(matches!(
            Config::from_toml_str(""),
            Err(ConfigError::MissingToken)
        ));
        assert!(matches!(
            Config::from_toml_str("[api]\ntoken = \"   \"\n"),
            Err(ConfigError::MissingToken)
        ));
    }

    #[test]
    fn test_env_overrides_file() -> Result<(), ConfigError> {
        let file: ConfigFile = toml::from_str(
            "[api]\ntoken = \"from-file\"\n[station]\nid = \"GHCND:USW00023160\"\n",
        )?;
        let config = Config::build(
            file,
            EnvOverrides {
                token: Some("from-env".to_string()),
                station: Some("GHCND:USC00023160".to_string()),
            },
        )?;
        assert_eq!(config.api.token.expose(), "from-env");
        assert_eq!(config.station.as_str(), "GHCND:USC00023160");
        Ok(())
    }

    #[test]
    fn test_token_from_env_without_file_section() -> Result<(), ConfigError> {
        let config = Config::build(
            ConfigFile::default(),
            EnvOverrides {
                token: Some("env-only".to_string()),
                station: None,
            },
        )?;
        assert_eq!(config.api.token.expose(), "env-only");
        Ok(())
    }

    #[test]
    fn test_full_file() -> Result<(), ConfigError> {
        let config = Config::from_toml_str(
            r#"
            [api]
            token = "abc"
            base_url = "http://localhost:8080/cdo/"
            units = "metric"
            data_types = ["TMAX", "PRCP"]
            page_limit = 250

            [station]
            id = "GHCND:USC00023160"

            [fetch]
            epoch_year = 1990
            max_window_days = 30
            request_delay_ms = 0
            checkpoint = false

            [retry]
            max_attempts = 3
            initial_backoff_ms = 100
            multiplier = 3.0
            max_backoff_ms = 1000

            [files]
            output_dir = "out"
            file_prefix = "tucson_weather"
            checkpoint_dir = "cache"

            [log]
            level = "debug"
            "#,
        )?;
        assert_eq!(config.api.base_url, "http://localhost:8080/cdo");
        assert_eq!(config.api.units, "metric");
        assert_eq!(
            config.api.data_types,
            vec![DataType::MaxTemperature, DataType::Precipitation]
        );
        assert_eq!(config.api.page_limit, 250);
        assert_eq!(config.fetch.epoch_year, 1990);
        assert!(!config.fetch.checkpoint);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.initial_backoff, Duration::from_millis(100));
        assert_eq!(config.files.prefix_for(&config.station), "tucson_weather");
        assert_eq!(
            config.files.resolve_checkpoint_dir(),
            Some(PathBuf::from("cache"))
        );
        assert_eq!(config.log_level, LevelFilter::Debug);
        Ok(())
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let cases = [
            "[api]\ntoken = \"a\"\npage_limit = 0\n",
            "[api]\ntoken = \"a\"\npage_limit = 1001\n",
            "[api]\ntoken = \"a\"\ndata_types = []\n",
            "[api]\ntoken = \"a\"\n[retry]\nmax_attempts = 0\n",
            "[api]\ntoken = \"a\"\n[retry]\nmultiplier = 0.5\n",
            "[api]\ntoken = \"a\"\n[fetch]\nmax_window_days = 0\n",
        ];
        for case in cases {
            assert!(
                matches!(
                    Config::from_toml_str(case),
                    Err(ConfigError::InvalidValue { .. })
                ),
                "accepted: {}",
                case
            );
        }
        assert!(matches!(
            Config::from_toml_str("[api]\ntoken = \"a\"\n[station]\nid = \"\"\n"),
            Err(ConfigError::Station(_))
        ));
        assert!(matches!(
            Config::from_toml_str("[api]\ntoken = \"a\"\nunknown = 1\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "[api]\ntoken = \"file-token\"")?;
        let config = Config::load(file.path())?;
        // The environment may override the token, but one is always present.
        assert!(!config.api.token.expose().is_empty());
        Ok(())
    }

    #[test]
    fn test_token_is_redacted_in_debug() -> Result<(), ConfigError> {
        let config = Config::from_toml_str("[api]\ntoken = \"super-secret\"\n")?;
        assert!(!format!("{:?}", config).contains("super-secret"));
        Ok(())
    }
}
