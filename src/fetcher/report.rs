use crate::api::error::FetchError;
use crate::types::observation::WeatherObservation;
use crate::types::window::FetchWindow;

/// What happened to one window during a run.
#[derive(Debug)]
pub enum WindowStatus {
    /// Fetched from the API: `records` raw values folded into `observations` days.
    Fetched { records: usize, observations: usize },
    /// Read back from a checkpoint without contacting the API.
    Restored { observations: usize },
    /// Skipped after an error; the run continued with the next window.
    Failed(FetchError),
}

#[derive(Debug)]
pub struct WindowOutcome {
    pub window: FetchWindow,
    pub status: WindowStatus,
}

impl WindowOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, WindowStatus::Failed(_))
    }
}

/// Result of a complete fetch run.
#[derive(Debug)]
pub struct FetchReport {
    /// One observation per date, ascending.
    pub observations: Vec<WeatherObservation>,
    /// One entry per window, in fetch order.
    pub windows: Vec<WindowOutcome>,
}

impl FetchReport {
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn failed_windows(&self) -> impl Iterator<Item = &WindowOutcome> {
        self.windows.iter().filter(|w| w.is_failed())
    }

    /// Raw API values received during this run, checkpointed windows excluded.
    pub fn records_fetched(&self) -> usize {
        self.windows
            .iter()
            .map(|w| match w.status {
                WindowStatus::Fetched { records, .. } => records,
                _ => 0,
            })
            .sum()
    }
}
