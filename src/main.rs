//! Command-line entry point: fetches a station's history and writes it to disk.
//!
//! Set `RUST_LOG` (e.g. `RUST_LOG=debug`) to override the configured log level.

use chrono::{Datelike, Days, Local, NaiveDate};
use clap::Parser;
use log::{error, warn};
use noaa_history::{
    persist, persist_station_info, prompt_start, Config, ConfigError, HistoricalFetcher,
    NoaaError, OutputKind, StartChoice, StationId, StdinInput, Summary, DEFAULT_CONFIG_FILE,
};
use std::path::PathBuf;
use std::process::ExitCode;

const RULE: &str = "============================================================";

#[derive(Debug, Parser)]
#[command(version, about = "Fetch the daily weather history of a NOAA station")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Station to fetch, overriding the configuration.
    #[arg(short, long)]
    station: Option<String>,

    /// First year to fetch; skips the interactive question.
    #[arg(long, conflicts_with = "recent")]
    start_year: Option<i32>,

    /// Only fetch the most recent DAYS days.
    #[arg(long, value_name = "DAYS")]
    recent: Option<u64>,

    /// Directory the JSON and CSV files are written to.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Configuration problems are fatal and reported before any request is made.
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            eprintln!(
                "Please make sure {} exists with your API token.",
                args.config.display()
            );
            return ExitCode::FAILURE;
        }
    };

    env_logger::Builder::new()
        .filter_level(config.log_level)
        .parse_default_env()
        .init();

    match run(&args, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &Args) -> Result<Config, NoaaError> {
    let mut config = Config::load(&args.config)?;
    if let Some(station) = &args.station {
        config.station = StationId::new(station.as_str()).map_err(ConfigError::from)?;
    }
    if let Some(dir) = &args.output_dir {
        config.files.output_dir = dir.clone();
    }
    Ok(config)
}

async fn run(args: &Args, config: &Config) -> Result<(), NoaaError> {
    println!("{}", RULE);
    println!("NOAA HISTORICAL DATA FETCHER");
    println!("{}", RULE);
    println!("Using station: {}", config.station);

    let fetcher = HistoricalFetcher::new(config)?;

    match fetcher.client().station_info(&config.station).await {
        Ok(info) => {
            println!("Station: {}", info.name.as_deref().unwrap_or("N/A"));
            println!("Elevation: {} meters", or_na(info.elevation));
            println!(
                "Location: {}, {}",
                or_na(info.latitude),
                or_na(info.longitude)
            );
            if let (Some(min), Some(max)) = (info.mindate, info.maxdate) {
                println!("Data available from {} to {}", min, max);
            }
            match persist_station_info(&config.files, &config.station, &info).await {
                Ok(path) => println!("Station information saved to: {}", path.display()),
                Err(e) => warn!("Could not save station information: {}", e),
            }
        }
        Err(e) => warn!("Could not fetch station information: {}", e),
    }
    println!();

    let today = Local::now().date_naive();
    let (start, kind) = match args.recent {
        Some(days) => (
            today.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN),
            OutputKind::Recent,
        ),
        None => (start_date(args, config, today)?, OutputKind::Complete),
    };

    println!("Fetching data from {} to {}", start, today);
    println!("This may take several minutes due to API rate limits...");
    println!();

    let report = fetcher
        .fetch()
        .station(&config.station)
        .start(start)
        .call()
        .await?;

    println!();
    println!("{}", RULE);
    println!(
        "TOTAL: {} records retrieved, {} days",
        report.records_fetched(),
        report.observations.len()
    );
    println!("{}", RULE);
    for failed in report.failed_windows() {
        println!("  Failed window {}", failed.window);
    }
    if report.is_empty() {
        println!("0 records retrieved. Please check your API key and station ID.");
    }

    let paths = persist(&config.files, &config.station, kind, &report.observations).await?;
    println!("Data saved to: {}", paths.json.display());
    println!("Data saved to: {}", paths.csv.display());

    if !report.is_empty() {
        println!();
        println!("{}", RULE);
        println!("DATASET STATISTICS");
        println!("{}", RULE);
        print!("{}", Summary::from_observations(&report.observations));
        println!("{}", RULE);
    }

    Ok(())
}

fn or_na(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

/// The start date from `--start-year`, or from asking the user.
fn start_date(args: &Args, config: &Config, today: NaiveDate) -> Result<NaiveDate, NoaaError> {
    let epoch_year = config.fetch.epoch_year;
    let choice = match args.start_year {
        Some(year) => StartChoice::parse(&year.to_string(), epoch_year, today.year()).ok_or(
            ConfigError::InvalidValue {
                field: "start_year",
                reason: format!("must be between {} and {}", epoch_year, today.year()),
            },
        )?,
        None => {
            println!("This will fetch ALL historical data, which may take a while.");
            prompt_start(&mut StdinInput, epoch_year, today.year())?
        }
    };

    let year = choice.start_year(epoch_year);
    NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| {
        ConfigError::InvalidValue {
            field: "start_year",
            reason: format!("{} is not a valid year", year),
        }
        .into()
    })
}
