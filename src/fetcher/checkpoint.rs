//! On-disk checkpoints of completed windows.
//!
//! Fetching the full history of a station takes a long time. A window that lies
//! entirely in the past cannot change anymore, so once fetched its observations are
//! written to `<dir>/<station>/<start>_<end>.json` and a later run reads them back
//! instead of asking the API again.
//!
//! Checkpoints are kept apart per request variant (dataset, units and datatypes),
//! so changing any of them never restores values fetched under the old settings.

use crate::config::ApiSettings;
use crate::types::observation::WeatherObservation;
use crate::types::station::StationId;
use crate::types::window::FetchWindow;
use crate::utils::ensure_dir_exists;
use log::debug;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::task;

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("Failed to create checkpoint directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to read checkpoint '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to write checkpoint '{0}'")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("Corrupt checkpoint '{0}'")]
    Decode(PathBuf, #[source] serde_json::Error),

    #[error("Failed to encode checkpoint '{0}'")]
    Encode(PathBuf, #[source] serde_json::Error),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] task::JoinError),
}

pub struct CheckpointStore {
    dir: PathBuf,
    variant: String,
}

impl CheckpointStore {
    /// Creates a store below `dir` for requests made with `api`.
    pub fn new(dir: impl Into<PathBuf>, api: &ApiSettings) -> Self {
        Self {
            dir: dir.into(),
            variant: request_variant(api),
        }
    }

    fn station_dir(&self, station: &StationId) -> PathBuf {
        self.dir.join(station.file_stem()).join(&self.variant)
    }

    fn path(&self, station: &StationId, window: FetchWindow) -> PathBuf {
        self.station_dir(station).join(format!(
            "{}_{}.json",
            window.start.format("%Y%m%d"),
            window.end.format("%Y%m%d")
        ))
    }

    /// Reads the checkpoint of `window`, `None` when there is none.
    pub async fn load(
        &self,
        station: &StationId,
        window: FetchWindow,
    ) -> Result<Option<Vec<WeatherObservation>>, CheckpointError> {
        let path = self.path(station, window);
        let json = match tokio::fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CheckpointError::Read(path, e)),
        };

        let observations =
            serde_json::from_str(&json).map_err(|e| CheckpointError::Decode(path.clone(), e))?;
        debug!("Loaded checkpoint {}", path.display());
        Ok(Some(observations))
    }

    /// Stores the observations of `window`, replacing any previous checkpoint.
    ///
    /// The file is written to a temporary file first and renamed into place, so a
    /// checkpoint is either complete or absent.
    pub async fn save(
        &self,
        station: &StationId,
        window: FetchWindow,
        observations: &[WeatherObservation],
    ) -> Result<(), CheckpointError> {
        let station_dir = self.station_dir(station);
        ensure_dir_exists(&station_dir)
            .await
            .map_err(|e| CheckpointError::DirCreation(station_dir.clone(), e))?;

        let path = self.path(station, window);
        let observations = observations.to_vec();

        task::spawn_blocking(move || {
            let temp_file = NamedTempFile::new_in(&station_dir)
                .map_err(|e| CheckpointError::Write(path.clone(), e))?;
            let mut writer = BufWriter::new(temp_file);
            serde_json::to_writer(&mut writer, &observations)
                .map_err(|e| CheckpointError::Encode(path.clone(), e))?;
            writer
                .flush()
                .map_err(|e| CheckpointError::Write(path.clone(), e))?;
            let temp_file = writer
                .into_inner()
                .map_err(|e| CheckpointError::Write(path.clone(), e.into_error()))?;
            temp_file
                .persist(&path)
                .map_err(|e| CheckpointError::Write(path.clone(), e.error))?;
            debug!("Wrote checkpoint {}", path.display());
            Ok::<(), CheckpointError>(())
        })
        .await??;

        Ok(())
    }
}

/// Directory name identifying the request parameters that shape the data,
/// e.g. `ghcnd_standard_prcp-tmax`. Datatype order does not matter.
fn request_variant(api: &ApiSettings) -> String {
    let mut codes: Vec<&str> = api.data_types.iter().map(|t| t.code()).collect();
    codes.sort_unstable();
    codes.dedup();

    let sanitize = |part: &str| -> String {
        part.trim()
            .to_ascii_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    };
    format!(
        "{}_{}_{}",
        sanitize(&api.dataset),
        sanitize(&api.units),
        codes.join("-").to_ascii_lowercase()
    )
}
