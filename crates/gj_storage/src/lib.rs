use clap::ValueEnum;
use gj_core::{Error, JobSink, Result};
use std::path::PathBuf;
use tracing::info;

pub mod backends;

pub use backends::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SinkKind {
    /// Pretty-printed jobs.json in the working directory
    #[default]
    Json,
    /// The "Jobs" worksheet of a Google spreadsheet, CSV backup on failure
    Sheets,
}

/// Where a run's output goes. `sheets` must be set for [`SinkKind::Sheets`].
#[derive(Debug, Clone)]
pub struct SinkOptions {
    pub kind: SinkKind,
    pub output: PathBuf,
    pub backup: PathBuf,
    pub sheets: Option<SheetsConfig>,
}

impl Default for SinkOptions {
    fn default() -> Self {
        Self {
            kind: SinkKind::Json,
            output: PathBuf::from(json::DEFAULT_JSON_PATH),
            backup: PathBuf::from(sheets::DEFAULT_BACKUP_PATH),
            sheets: None,
        }
    }
}

pub fn create_sink(options: &SinkOptions) -> Result<Box<dyn JobSink>> {
    let sink: Box<dyn JobSink> = match options.kind {
        SinkKind::Json => Box::new(JsonFileSink::new(&options.output)),
        SinkKind::Sheets => {
            let config = options.sheets.as_ref().ok_or_else(|| {
                Error::Config("the sheets sink needs GOOGLE_CREDENTIALS and SPREADSHEET_ID".to_string())
            })?;
            Box::new(SheetsSink::new(config)?.with_backup_path(&options.backup))
        }
    };
    info!("🏦 Output sink ready (using {})", sink.name());
    Ok(sink)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_json_sink() {
        let options = SinkOptions {
            output: PathBuf::from("out/jobs.json"),
            ..Default::default()
        };
        let sink = create_sink(&options).unwrap();
        assert_eq!(sink.name(), "out/jobs.json");
    }

    #[test]
    fn test_sheets_sink_needs_config() {
        let options = SinkOptions {
            kind: SinkKind::Sheets,
            ..Default::default()
        };
        assert!(matches!(create_sink(&options), Err(Error::Config(_))));
    }
}
