use crate::output::error::OutputError;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes `value` as pretty-printed JSON.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), OutputError> {
    let file = File::create(path).map_err(|e| OutputError::Write(path.to_path_buf(), e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .map_err(|e| OutputError::Json(path.to_path_buf(), e))?;
    writer
        .flush()
        .map_err(|e| OutputError::Write(path.to_path_buf(), e))
}
