use async_trait::async_trait;
use gj_core::{JobBatch, JobSink, Result};
use std::path::PathBuf;

pub const DEFAULT_JSON_PATH: &str = "jobs.json";

/// Overwrites a single pretty-printed JSON document per run.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
    name: String,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }
}

impl Default for JsonFileSink {
    fn default() -> Self {
        Self::new(DEFAULT_JSON_PATH)
    }
}

#[async_trait]
impl JobSink for JsonFileSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn write_batch(&self, batch: &JobBatch) -> Result<()> {
        // serde_json leaves non-ASCII text unescaped
        let json = serde_json::to_vec_pretty(batch)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}
