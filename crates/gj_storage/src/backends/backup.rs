use gj_core::{Error, JobBatch, JobRecord, Result};
use std::path::Path;

/// Writes the batch as comma separated rows under the usual header.
pub fn write_csv_backup(path: &Path, batch: &JobBatch) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    writer.write_record(JobRecord::HEADERS).map_err(csv_error)?;
    for row in batch.rows() {
        writer.write_record(&row).map_err(csv_error)?;
    }
    writer.flush()?;
    Ok(())
}

fn csv_error(e: csv::Error) -> Error {
    Error::Sink(format!("CSV backup failed: {}", e))
}
