//! Flattened CSV output: one row per date, one column per datatype.

use crate::output::error::OutputError;
use crate::types::data_type::DataType;
use crate::types::observation::WeatherObservation;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Column order of the CSV file.
pub const CSV_COLUMNS: [&str; 7] = ["date", "TMAX", "TMIN", "PRCP", "AWND", "SNOW", "SNWD"];

/// Builds a `DataFrame` with a `date` column followed by one nullable `f64` column
/// per [`DataType`], in the order of [`CSV_COLUMNS`].
pub fn observations_to_frame(observations: &[WeatherObservation]) -> PolarsResult<DataFrame> {
    let dates: Vec<String> = observations
        .iter()
        .map(|o| o.date.format("%Y-%m-%d").to_string())
        .collect();

    let mut columns = Vec::with_capacity(CSV_COLUMNS.len());
    columns.push(Column::new("date".into(), dates));
    for data_type in DataType::ALL {
        let values: Vec<Option<f64>> = observations.iter().map(|o| o.get(data_type)).collect();
        columns.push(Column::new(data_type.code().into(), values));
    }

    DataFrame::new(columns)
}

/// Writes `observations` to `path`. Missing values become empty fields.
pub fn write_csv(path: &Path, observations: &[WeatherObservation]) -> Result<(), OutputError> {
    let mut df =
        observations_to_frame(observations).map_err(|e| OutputError::Csv(path.to_path_buf(), e))?;
    let mut file = File::create(path).map_err(|e| OutputError::Write(path.to_path_buf(), e))?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .map_err(|e| OutputError::Csv(path.to_path_buf(), e))
}
