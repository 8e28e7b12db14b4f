pub mod error;
pub mod fetch;
pub mod models;
pub mod sink;

pub use error::{Error, Result};
pub use fetch::PageFetcher;
pub use models::{ExtractionOutcome, JobBatch, JobRecord, JobSource, NOT_AVAILABLE, TIMESTAMP_FORMAT};
pub use sink::JobSink;
