//! Persisting fetched observations.

pub mod csv;
pub mod error;
pub mod json;
pub mod summary;

use crate::config::FileSettings;
use crate::output::error::OutputError;
use crate::types::observation::WeatherObservation;
use crate::types::station::{StationId, StationInfo};
use crate::utils::ensure_dir_exists;
use log::info;
use std::path::{Path, PathBuf};

/// Which kind of run produced the files; selects the file name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// Full history, `<prefix>_complete.{json,csv}`.
    Complete,
    /// Most recent days only, `<prefix>_recent.{json,csv}`.
    Recent,
}

impl OutputKind {
    fn suffix(&self) -> &'static str {
        match self {
            OutputKind::Complete => "complete",
            OutputKind::Recent => "recent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub json: PathBuf,
    pub csv: PathBuf,
}

async fn ensure_output_dir(dir: &Path) -> Result<(), OutputError> {
    ensure_dir_exists(dir)
        .await
        .map_err(|e| OutputError::DirCreation(dir.to_path_buf(), e))
}

/// Writes `observations` to the JSON and CSV files of `station` in the output directory.
///
/// Both files are written even when there are no observations.
pub async fn persist(
    files: &FileSettings,
    station: &StationId,
    kind: OutputKind,
    observations: &[WeatherObservation],
) -> Result<OutputPaths, OutputError> {
    ensure_output_dir(&files.output_dir).await?;

    let stem = format!("{}_{}", files.prefix_for(station), kind.suffix());
    let paths = OutputPaths {
        json: files.output_dir.join(format!("{}.json", stem)),
        csv: files.output_dir.join(format!("{}.csv", stem)),
    };

    json::write_json(&paths.json, observations)?;
    info!("JSON saved to {}", paths.json.display());
    csv::write_csv(&paths.csv, observations)?;
    info!("CSV saved to {}", paths.csv.display());

    Ok(paths)
}

/// Writes the station metadata to `<prefix>_station_info.json` and returns its path.
pub async fn persist_station_info(
    files: &FileSettings,
    station: &StationId,
    info: &StationInfo,
) -> Result<PathBuf, OutputError> {
    ensure_output_dir(&files.output_dir).await?;

    let path = files
        .output_dir
        .join(format!("{}_station_info.json", files.prefix_for(station)));
    json::write_json(&path, info)?;
    info!("Station information saved to {}", path.display());
    Ok(path)
}
