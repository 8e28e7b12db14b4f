use async_trait::async_trait;
use crate::models::JobBatch;
use crate::Result;

#[async_trait]
pub trait JobSink: Send + Sync {
    /// Short human readable name used in log lines
    fn name(&self) -> &str;

    /// Persists a whole batch, replacing whatever the destination held before
    async fn write_batch(&self, batch: &JobBatch) -> Result<()>;
}
